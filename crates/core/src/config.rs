//! TOML-based configuration for the draftsync service and CLI.
//!
//! The merge and patch engines take no configuration. These settings only
//! govern where drafts live, how the reconciler reports conflicts, and how
//! loudly the binaries log.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;

/// Overrides `store.root` when set.
pub const ENV_STORE_ROOT: &str = "DRAFTSYNC_STORE_ROOT";
/// Overrides `logging.level` when set.
pub const ENV_LOG_LEVEL: &str = "DRAFTSYNC_LOG_LEVEL";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Draft store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one file per draft.
    #[serde(default = "default_store_root")]
    pub root: PathBuf,

    /// File extension for draft files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_store_root() -> PathBuf {
    PathBuf::from("./drafts")
}
fn default_extension() -> String {
    "md".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
            extension: default_extension(),
        }
    }
}

/// Conflict reporting behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Write a JSON conflict report for every conflicted merge.
    #[serde(default = "default_true")]
    pub write_reports: bool,

    /// Directory receiving conflict reports.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Include a diff3-style rendering in each report.
    #[serde(default)]
    pub annotate: bool,
}

fn default_true() -> bool {
    true
}
fn default_report_dir() -> PathBuf {
    PathBuf::from("./reports")
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            write_reports: true,
            report_dir: default_report_dir(),
            annotate: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    ///
    /// Environment overrides are **not** applied -- call
    /// [`apply_env_overrides`](Self::apply_env_overrides) afterwards.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Apply `DRAFTSYNC_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_STORE_ROOT).filter(|v| !v.is_empty()) {
            debug!(env = ENV_STORE_ROOT, %root, "overriding store root");
            self.store.root = PathBuf::from(root);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            debug!(env = ENV_LOG_LEVEL, %level, "overriding log level");
            self.logging.level = level;
        }
    }

    /// Validate that all fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".into(),
                detail: format!(
                    "'{}' is not one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        if self.store.root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.root".into(),
                detail: "store root must not be empty".into(),
            });
        }
        if self.store.extension.is_empty()
            || !self.store.extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ConfigError::InvalidValue {
                field: "store.extension".into(),
                detail: "extension must be non-empty and alphanumeric".into(),
            });
        }
        if self.reconcile.write_reports && self.reconcile.report_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "reconcile.report_dir".into(),
                detail: "report directory must not be empty when write_reports is on".into(),
            });
        }

        Ok(())
    }

    /// Convenience: load, apply overrides, and validate in one call.
    pub fn load_and_resolve<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn sample_toml() -> &'static str {
        r#"
[logging]
level = "debug"

[store]
root = "/srv/drafts"
extension = "txt"

[reconcile]
write_reports = false
report_dir = "/srv/reports"
annotate = true
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(sample_toml()).expect("failed to parse toml");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.store.root, PathBuf::from("/srv/drafts"));
        assert_eq!(config.store.extension, "txt");
        assert!(!config.reconcile.write_reports);
        assert!(config.reconcile.annotate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.store.root, PathBuf::from("./drafts"));
        assert_eq!(config.store.extension, "md");
        assert!(config.reconcile.write_reports);
        assert_eq!(config.reconcile.report_dir, PathBuf::from("./reports"));
        assert!(!config.reconcile.annotate);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draftsync.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(sample_toml().as_bytes()).unwrap();

        let config = AppConfig::load_from_file(&path).expect("load_from_file failed");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_file_not_found() {
        let result = AppConfig::load_from_file("/nonexistent/draftsync.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[store\nroot = ").unwrap();
        assert!(matches!(
            AppConfig::load_from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "logging.level"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_extension() {
        let mut config = AppConfig::default();
        config.store.extension = "../md".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "store.extension"
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_STORE_ROOT, "/tmp/other-drafts"),
            (ENV_LOG_LEVEL, ""),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.store.root, PathBuf::from("/tmp/other-drafts"));
        // Empty values leave the setting alone.
        assert_eq!(config.logging.level, "warn");
    }
}
