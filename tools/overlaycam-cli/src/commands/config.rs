//! Show or write the effective configuration.

use overlaycam_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let path = config_file_path();
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        config
            .save_to(&path)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration written");
    }
    Ok(())
}
