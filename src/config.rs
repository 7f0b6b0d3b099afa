//! Quill Configuration
//!
//! Loads and saves the assistant's configuration from `~/.quill/quill.json`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::types::{default_config, QuillConfig};

/// Config file name within the quill directory.
const CONFIG_FILENAME: &str = "quill.json";

/// Returns the quill configuration directory: `~/.quill`.
pub fn get_quill_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
    home.join(".quill")
}

/// Returns the full path to the config file: `~/.quill/quill.json`.
pub fn get_config_path() -> PathBuf {
    get_quill_dir().join(CONFIG_FILENAME)
}

/// Load the config from disk, merging missing fields with defaults.
///
/// Returns `None` if the config file does not exist or cannot be parsed;
/// callers then fall back to `default_config()`.
pub fn load_config() -> Option<QuillConfig> {
    let config_path = get_config_path();
    if !config_path.exists() {
        return None;
    }

    let contents = fs::read_to_string(&config_path).ok()?;
    let mut config: QuillConfig = serde_json::from_str(&contents).ok()?;

    // Merge defaults for unset fields
    let defaults = default_config();

    if config.model.is_empty() {
        config.model = defaults.model;
    }
    if config.base_url.is_empty() {
        config.base_url = defaults.base_url;
    }
    if config.timeout_secs == 0 {
        config.timeout_secs = defaults.timeout_secs;
    }

    Some(config)
}

/// Save the config to disk at `~/.quill/quill.json`, creating the
/// directory if needed.
pub fn save_config(config: &QuillConfig) -> Result<()> {
    let dir = get_quill_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create quill directory")?;
    }

    let config_path = get_config_path();
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&config_path, &json).context("Failed to write config file")?;

    Ok(())
}
