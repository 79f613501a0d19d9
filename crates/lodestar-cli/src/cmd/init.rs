use anyhow::Context;
use lodestar_core::config::Config;
use lodestar_core::io;
use lodestar_core::store::Store;
use std::path::Path;

pub fn run(home: &Path) -> anyhow::Result<()> {
    println!("Initializing lodestar in: {}", home.display());

    io::ensure_dir(home).with_context(|| format!("failed to create {}", home.display()))?;

    let config_path = Config::config_path(home);
    let config = if config_path.exists() {
        println!("  exists:  config.yaml");
        Config::load(home)?
    } else {
        let config = Config::default();
        config.save(home).context("failed to write config.yaml")?;
        println!("  created: config.yaml");
        config
    };

    // Opening the database creates it (and its tables) if missing.
    let data_path = config.data_path(home);
    Store::open(&data_path).context("failed to open database")?;
    println!("  ready:   {}", config.data.file);

    println!("\nNext steps:");
    println!("  lodestar profile create --name <you>");
    println!("  lodestar serve");
    Ok(())
}
