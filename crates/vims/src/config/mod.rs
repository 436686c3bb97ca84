//! Configuration module for vims.
//!
//! Handles loading configuration from:
//! - Default values
//! - Config file (~/.config/vims/config.toml)
//! - An explicit path given on the command line

mod schema;

pub use schema::{
    ClipboardBackend, ClipboardConfig, Config, CursorStyle, EditorConfig, SuggestionsConfig,
};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Returns the config directory path.
///
/// Checks `VIMS_CONFIG_DIR` environment variable first, then falls back
/// to the system default (~/.config/vims on Linux).
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("VIMS_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|p| p.join("vims"))
}

/// Returns the default config file path (~/.config/vims/config.toml)
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Load configuration from the default path or return defaults
pub fn load_config() -> Result<Config> {
    if let Some(path) = config_path() {
        if path.exists() {
            return load_config_from(&path);
        }
    }
    Ok(Config::default())
}

/// Load configuration from a specific path
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vim::ModeId;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.default_mode, ModeId::Normal);
        assert_eq!(config.editor.tab_size, 4);
        assert_eq!(config.editor.cursor_style, CursorStyle::Block);
        assert!(!config.suggestions.enabled);
    }

    #[test]
    fn test_config_paths() {
        if let (Some(dir), Some(cfg)) = (config_dir(), config_path()) {
            assert!(cfg.starts_with(&dir));
            assert!(cfg.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[suggestions]
enabled = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.suggestions.enabled);
        // Other fields should be default
        assert_eq!(config.editor.tab_size, 4);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor]\nsmart_relative_line_numbers = true\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert!(config.editor.smart_relative_line_numbers);
    }

    #[test]
    fn test_load_config_reports_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
