use std::fs;
use std::path::Path;

use log::debug;

use super::session::RawSessionConfig;
use super::{Result, SessionConfig};

fn is_yaml(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(extension.as_str(), "yaml" | "yml")
}

pub fn load_config(path: impl AsRef<Path>) -> Result<SessionConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let parsed = if is_yaml(path) {
        serde_yaml::from_str::<RawSessionConfig>(&raw)?
    } else {
        serde_json::from_str::<RawSessionConfig>(&raw)?
    };
    let config = SessionConfig::from_raw(parsed)?;
    debug!("loaded session config from {}", path.display());
    Ok(config)
}

pub fn save_config(path: impl AsRef<Path>, config: &SessionConfig) -> Result<()> {
    let path = path.as_ref();
    let raw = config.to_raw()?;
    let serialized = if is_yaml(path) {
        serde_yaml::to_string(&raw)?
    } else {
        serde_json::to_string_pretty(&raw)?
    };
    fs::write(path, serialized)?;
    Ok(())
}
