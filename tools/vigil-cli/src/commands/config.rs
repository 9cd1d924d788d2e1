//! Show or write configuration.

use std::path::PathBuf;

use vigil_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, write: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(path) = write {
        AppConfig::default()
            .save_to(&path)
            .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
        println!("Default configuration written to: {}", path.display());
        return Ok(());
    }

    println!("# Standard location: {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
