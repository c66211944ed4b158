//! Application configuration for Tax Companion.
//!
//! User config lives at `~/.taxcompanion/taxcompanion.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxCompanionError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "taxcompanion.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".taxcompanion";

// ---------------------------------------------------------------------------
// Config structs (matching taxcompanion.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Terminal UI settings.
    #[serde(default)]
    pub tui: TuiConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Where "export as text" writes the checklist.
    #[serde(default = "default_export_path")]
    pub export_path: String,

    /// Whether exports include the conversation transcript.
    #[serde(default)]
    pub include_transcript: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            export_path: default_export_path(),
            include_transcript: false,
        }
    }
}

fn default_export_path() -> String {
    "tax-checklist.txt".into()
}

/// `[tui]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Event poll interval in milliseconds.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Log file name, relative to the config directory. Empty disables logging.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            log_file: default_log_file(),
        }
    }
}

fn default_tick_rate() -> u64 {
    100
}
fn default_log_file() -> String {
    "tui.log".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.taxcompanion/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TaxCompanionError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.taxcompanion/taxcompanion.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TaxCompanionError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        TaxCompanionError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| TaxCompanionError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| TaxCompanionError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| TaxCompanionError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Resolve the TUI log file, or `None` when logging is switched off.
pub fn tui_log_path(config: &AppConfig) -> Result<Option<PathBuf>> {
    if config.tui.log_file.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(config_dir()?.join(&config.tui.log_file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("export_path"));
        assert!(toml_str.contains("tick_rate_ms"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
include_transcript = true
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(config.defaults.include_transcript);
        assert_eq!(config.defaults.export_path, "tax-checklist.txt");
        assert_eq!(config.tui.tick_rate_ms, 100);
    }

    #[test]
    fn bad_config_is_a_config_error() {
        let dir = std::env::temp_dir().join(format!("taxcompanion-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[tui]\ntick_rate_ms = \"fast\"\n").expect("write");

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_log_file_disables_logging() {
        let mut config = AppConfig::default();
        config.tui.log_file = String::new();
        assert!(tui_log_path(&config).expect("resolve").is_none());
    }
}
