use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagefx_core::AppConfig;

mod commands;
mod session;

#[derive(Parser)]
#[command(name = "pagefx")]
#[command(author, version, about = "Replay page sessions against the pagefx controllers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of ~/.config/pagefx/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the script of a scene file
    Simulate {
        /// Scene description (TOML)
        scene: PathBuf,
        /// Print the session report as JSON
        #[arg(long)]
        json: bool,
        /// Run timers on the wall clock instead of a virtual one
        #[arg(long)]
        realtime: bool,
    },
    /// Check whether values are accepted as colors
    CheckColor {
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration if no file exists
    Init,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Simulate {
            scene,
            json,
            realtime,
        } => commands::simulate::run(&config, &scene, json, realtime).await,
        Commands::CheckColor { values } => commands::check_color::run(&values),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init => commands::config::init(&config_path),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
