use clap::Subcommand;
use lodestar_core::config::Config;
use lodestar_core::profile::Profile;
use lodestar_core::store::Store;
use std::path::Path;
use uuid::Uuid;

use crate::output;

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Create a profile
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// IANA timezone name, e.g. Europe/Lisbon
        #[arg(long)]
        timezone: Option<String>,
    },

    /// List all profiles
    List,

    /// Show one profile
    Show { id: Uuid },
}

fn open_store(home: &Path) -> anyhow::Result<Store> {
    let config = Config::load(home)?;
    Ok(Store::open(&config.data_path(home))?)
}

pub fn run(home: &Path, subcommand: ProfileSubcommand, json: bool) -> anyhow::Result<()> {
    let store = open_store(home)?;
    match subcommand {
        ProfileSubcommand::Create { name, timezone } => {
            let profile = Profile::new(name.trim(), timezone);
            store.create_profile(&profile)?;
            if json {
                output::print_json(&profile)?;
            } else {
                println!("created profile {} ({})", profile.display_name, profile.id);
            }
        }
        ProfileSubcommand::List => {
            let profiles = store.list_profiles()?;
            if json {
                output::print_json(&profiles)?;
            } else {
                let rows = profiles
                    .iter()
                    .map(|p| {
                        vec![
                            p.id.to_string(),
                            p.display_name.clone(),
                            p.timezone.clone().unwrap_or_default(),
                            p.created_at.format("%Y-%m-%d").to_string(),
                        ]
                    })
                    .collect();
                output::print_table(&["id", "name", "timezone", "created"], rows);
            }
        }
        ProfileSubcommand::Show { id } => {
            let profile = store.profile(id)?;
            output::print_json(&profile)?;
        }
    }
    Ok(())
}
