use lodestar_core::config::Config;
use std::path::Path;

pub fn run(home: &Path, port: Option<u16>, no_open: bool) -> anyhow::Result<()> {
    let config = Config::load(home)?;
    let port = port.unwrap_or(config.server.port);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(lodestar_server::serve(
        home.to_path_buf(),
        config,
        port,
        !no_open,
    ))
}
