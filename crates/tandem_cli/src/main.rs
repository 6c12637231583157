//! Tandem CLI
//!
//! Replays scripted gestures against a collapsing header and an in-memory
//! body, printing both positions and the fling state for every frame. Used
//! to inspect hand-off behaviour and to tune `tandem.toml`.

mod script;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use tandem_scroll::CoordinatorConfig;
use tracing_subscriber::EnvFilter;

use crate::script::{Replay, Script};

/// Headless replay for nested header/body scrolling
#[derive(Parser, Debug)]
#[command(name = "tandem")]
#[command(about = "Replay gestures against a collapsing header and its body")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a gesture script and print every frame
    Replay {
        /// Gesture script (TOML)
        script: PathBuf,

        /// Coordinator configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Frame duration in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
    },

    /// Print the default configuration as TOML
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { script, config, dt } => cmd_replay(script, config, dt),
        Commands::Config => cmd_config(),
    }
}

fn cmd_replay(script_path: PathBuf, config_path: Option<PathBuf>, dt: f32) -> Result<()> {
    ensure!(
        dt.is_finite() && dt > 0.0,
        "--dt must be a positive number of seconds, got {dt}"
    );

    let config = match config_path {
        Some(path) => CoordinatorConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CoordinatorConfig::default(),
    };
    let script = Script::load(&script_path)?;

    tracing::info!(
        "Replaying {} ({} steps, dt={dt}s, handoff={:?})",
        script_path.display(),
        script.steps.len(),
        config.handoff
    );

    for record in Replay::new(config, &script, dt).run(&script.steps) {
        println!("{record}");
    }
    Ok(())
}

fn cmd_config() -> Result<()> {
    let text = CoordinatorConfig::default().to_toml_string()?;
    print!("{text}");
    Ok(())
}
