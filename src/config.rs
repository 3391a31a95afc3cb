//! Engine configuration.
//!
//! Loaded from `~/.waypoint/config.toml` when present. A missing file means
//! defaults: playback must work unconfigured.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Panel dimensions and timing knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Fixed width of the explanatory panel, in page units.
    pub panel_width: f64,

    /// Fixed height of the explanatory panel, in page units.
    pub panel_height: f64,

    /// Gap between the target and the panel.
    pub panel_padding: f64,

    /// How long to let a smooth scroll settle before highlighting and
    /// placing the panel.
    pub settle_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            panel_width: 400.0,
            panel_height: 200.0,
            panel_padding: 16.0,
            settle_delay_ms: 300,
        }
    }
}

/// Errors from reading an explicit config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    /// Loads config from the default path, falling back to defaults when the
    /// file is missing or unreadable. An unreadable file is logged, not
    /// fatal.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring config: {e}");
                Self::default()
            }
        }
    }

    /// Loads config from an explicit file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The config file path: `~/.waypoint/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".waypoint").join("config.toml"))
    }

    /// Panel dimensions as a size.
    pub fn panel_size(&self) -> Size {
        Size::new(self.panel_width, self.panel_height)
    }

    /// The settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn defaults_match_the_panel_contract() {
        let config = Config::default();
        assert_eq!(config.panel_size(), Size::new(400.0, 200.0));
        assert_eq!(config.panel_padding, 16.0);
        assert_eq!(config.settle_delay(), Duration::from_millis(300));
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "panel-width = 320.0\nsettle-delay-ms = 0\n").unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.panel_width, 320.0);
        assert_eq!(config.settle_delay_ms, 0);
        // Unnamed keys keep their defaults.
        assert_eq!(config.panel_height, 200.0);
        assert_eq!(config.panel_padding, 16.0);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "panel-width = \"wide\"\n").unwrap();

        let err = Config::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
