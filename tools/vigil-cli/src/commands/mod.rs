pub mod classify;
pub mod config;
pub mod replay;

use std::path::Path;

use vigil_common::config::AppConfig;

/// Load configuration from an explicit path, or the standard location.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display())),
        None => {
            let config = AppConfig::load();
            config
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
            Ok(config)
        }
    }
}
