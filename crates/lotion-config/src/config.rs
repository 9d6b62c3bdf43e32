//! Configuration types and loading.
//!
//! The main entry point is [`LotionConfig`]. Configuration is loaded with
//! [`load_config`] and saved with [`save_config`].

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use lotion_core::StoreOffset;
use lotion_core::time::STORE_OFFSET_HOURS;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "LOTION_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// The configuration could not be serialized as YAML.
    #[error("failed to encode config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The merged layers did not form a valid configuration.
    #[error("failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// A configuration value was out of range.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(Box::new(err))
    }
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The lotion configuration, corresponding to `lotion.yaml`.
///
/// All fields have defaults so a partial file (or none) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotionConfig {
    /// Offset, in whole hours east of UTC, that timestamps are normalized to.
    pub timezone_offset_hours: i32,

    /// Drop read-only properties before printing.
    pub submittable_only: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for LotionConfig {
    fn default() -> Self {
        Self {
            timezone_offset_hours: STORE_OFFSET_HOURS,
            submittable_only: false,
            pretty: true,
        }
    }
}

impl LotionConfig {
    /// The configured store offset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the offset is not within a day.
    pub fn store_offset(&self) -> Result<StoreOffset> {
        StoreOffset::from_hours(self.timezone_offset_hours).ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "timezone_offset_hours".to_string(),
                reason: format!(
                    "{} is not a valid UTC offset in hours (expected -23..=23)",
                    self.timezone_offset_hours
                ),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from defaults, then `path` (if given and present),
/// then `LOTION_*` environment variables.
///
/// A missing or empty file contributes nothing.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file exists but cannot be read,
/// [`ConfigError::Extract`] if a layer holds a value of the wrong type, or
/// [`ConfigError::InvalidValue`] if the timezone offset is out of range.
pub fn load_config(path: Option<&Path>) -> Result<LotionConfig> {
    let config: LotionConfig = figment(path)?
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
        .extract()?;
    config.store_offset()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

/// Defaults merged with the file layer.
fn figment(path: Option<&Path>) -> Result<Figment> {
    let figment = Figment::from(Serialized::defaults(LotionConfig::default()));
    let Some(path) = path.filter(|p| p.exists()) else {
        return Ok(figment);
    };

    let content = std::fs::read_to_string(path)?;
    // An empty file is valid and yields defaults.
    if content.trim().is_empty() {
        return Ok(figment);
    }
    debug!(path = %path.display(), "merging config file");
    Ok(figment.merge(Yaml::string(&content)))
}

/// Save configuration as YAML to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] on I/O failure or [`ConfigError::Parse`]
/// if serialization fails.
pub fn save_config(path: &Path, config: &LotionConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file_only(path: &Path) -> LotionConfig {
        figment(Some(path)).unwrap().extract().unwrap()
    }

    #[test]
    fn test_default_config() {
        let cfg = LotionConfig::default();
        assert_eq!(cfg.timezone_offset_hours, 9);
        assert!(!cfg.submittable_only);
        assert!(cfg.pretty);
        assert_eq!(cfg.store_offset().unwrap(), StoreOffset::default());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = file_only(&dir.path().join("lotion.yaml"));
        assert_eq!(cfg, LotionConfig::default());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lotion.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(file_only(&path), LotionConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lotion.yaml");
        std::fs::write(&path, "timezone_offset_hours: 0\n").unwrap();

        let cfg = file_only(&path);
        assert_eq!(cfg.timezone_offset_hours, 0);
        assert!(cfg.pretty);
        assert_eq!(cfg.store_offset().unwrap(), StoreOffset::utc());
    }

    #[test]
    fn test_roundtrip_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lotion.yaml");
        let cfg = LotionConfig {
            timezone_offset_hours: -5,
            submittable_only: true,
            pretty: false,
        };

        save_config(&path, &cfg).unwrap();
        assert_eq!(file_only(&path), cfg);
    }

    #[test]
    fn test_wrong_type_is_an_extract_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lotion.yaml");
        std::fs::write(&path, "pretty: sometimes\n").unwrap();

        let err = figment(Some(&path))
            .unwrap()
            .extract::<LotionConfig>()
            .map_err(ConfigError::from)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Extract(_)));
    }

    #[test]
    fn test_out_of_range_offset_is_rejected() {
        let cfg = LotionConfig {
            timezone_offset_hours: 24,
            ..LotionConfig::default()
        };
        let err = cfg.store_offset().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "timezone_offset_hours"));
    }
}
