//! Vigil CLI — Command-line interface for the attention engine.
//!
//! Usage:
//!   vigil replay <FRAMES>      Replay a recorded frame stream through the engine
//!   vigil classify [OPTIONS]   Classify a single head pose
//!   vigil config [OPTIONS]     Show or write the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "vigil",
    about = "Attention scoring and violation detection for proctored sessions",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/vigil/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded JSONL frame stream
    Replay {
        /// Path to the frames file
        path: PathBuf,

        /// Emit one JSON object per frame instead of a table
        #[arg(long)]
        json: bool,

        /// Number of most recent violations to list at the end
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Only print frames that raised a violation
        #[arg(long)]
        violations_only: bool,
    },

    /// Classify a single head pose
    Classify {
        /// Pitch in degrees (positive = looking down)
        #[arg(long, allow_hyphen_values = true)]
        pitch: f64,

        /// Yaw in degrees
        #[arg(long, allow_hyphen_values = true)]
        yaw: f64,

        /// Roll in degrees
        #[arg(long, allow_hyphen_values = true, default_value = "0.0")]
        roll: f64,

        /// Eye aspect ratio
        #[arg(long)]
        eye_openness: f64,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration to this path instead
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    vigil_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            path,
            json,
            limit,
            violations_only,
        } => commands::replay::run(&config, path, json, limit, violations_only),
        Commands::Classify {
            pitch,
            yaw,
            roll,
            eye_openness,
        } => commands::classify::run(&config, pitch, yaw, roll, eye_openness),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
