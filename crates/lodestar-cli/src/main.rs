mod cmd;
mod home;
mod output;

use clap::{Parser, Subcommand};
use cmd::{checkin::CheckinSubcommand, profile::ProfileSubcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "lodestar",
    about = "Daily check-in and streak companion — profiles, check-ins, blueprints, and pulses",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data directory (default: ~/.lodestar)
    #[arg(long, global = true, env = "LODESTAR_HOME")]
    home: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and config
    Init,

    /// Run the API server
    Serve {
        /// Port to listen on (default: from config)
        #[arg(long)]
        port: Option<u16>,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },

    /// Manage profiles
    Profile {
        #[command(subcommand)]
        subcommand: ProfileSubcommand,
    },

    /// Record and inspect daily check-ins
    Checkin {
        #[command(subcommand)]
        subcommand: CheckinSubcommand,
    },

    /// Show a profile's streak
    Streak {
        #[arg(long)]
        user: Uuid,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = home::resolve_home(cli.home.as_deref()).and_then(|home| match cli.command {
        Commands::Init => cmd::init::run(&home),
        Commands::Serve { port, no_open } => cmd::serve::run(&home, port, no_open),
        Commands::Profile { subcommand } => cmd::profile::run(&home, subcommand, cli.json),
        Commands::Checkin { subcommand } => cmd::checkin::run(&home, subcommand, cli.json),
        Commands::Streak { user } => cmd::streak::run(&home, user, cli.json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
