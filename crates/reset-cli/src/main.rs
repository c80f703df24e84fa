mod cmd;
mod config;
mod output;

use clap::{Parser, Subcommand};
use config::ConfigArgs;

#[derive(Parser)]
#[command(
    name = "ctf-reset",
    about = "CTF database reset & watchdog service — reloads the seed script on a timer or on demand",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the watchdog and the HTTP API (default)
    Serve,

    /// Reset the database once against the configured server
    Once {
        /// Keep resetting every interval until interrupted
        #[arg(long = "loop", short = 'l')]
        repeat: bool,
    },

    /// Wait for the database to accept connections, then exit
    Check,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        None | Some(Commands::Serve) => tracing::Level::INFO,
        Some(_) => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.into_config();

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd::serve::run(config),
        Commands::Once { repeat } => cmd::once::run(config, repeat, cli.json),
        Commands::Check => cmd::check::run(config, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
