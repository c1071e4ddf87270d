use std::time::Duration;

use serde::{Deserialize, Serialize};
use tagsync_core::{DEFAULT_REQUEUE_INTERVAL, TagSet, merge};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub tags: TagsConfig,
    #[serde(default)]
    pub reconcile: ReconcileSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.tags.additional.keys().any(|k| k.trim().is_empty()) {
            return Err("tags.additional keys must not be empty".into());
        }
        if self.reconcile.requeue_interval_secs == 0 {
            return Err("reconcile.requeue_interval_secs must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    pub fn requeue_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile.requeue_interval_secs)
    }

    /// Configured additional tags with command-line overrides layered on top.
    pub fn additional_tags_with(&self, overrides: &[(String, String)]) -> TagSet {
        let overrides: TagSet = overrides.iter().cloned().collect();
        merge([&self.tags.additional, &overrides])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TagsConfig {
    /// Tags applied to every reconciled resource.
    ///
    /// Keys keep their case when read from the config file or `--additional`.
    /// Keys set through `TAGSYNC__TAGS__ADDITIONAL__<KEY>` are lowercased by the
    /// environment source, so mixed-case keys must come from the file or the flag.
    #[serde(default)]
    pub additional: TagSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileSettings {
    #[serde(default = "default_requeue_interval_secs")]
    pub requeue_interval_secs: u64,
}
fn default_requeue_interval_secs() -> u64 {
    DEFAULT_REQUEUE_INTERVAL.as_secs()
}
impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            requeue_interval_secs: default_requeue_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if !pathbuf.exists() {
                    return Err(format!("config file not found: {p}"));
                }
                builder = builder.add_source(File::from(pathbuf));
            }
            None => {
                let default_path = PathBuf::from("tagsync.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., TAGSYNC__RECONCILE__REQUEUE_INTERVAL_SECS=5.
        // Keys from this source are lowercased, including tag keys.
        builder = builder.add_source(
            Environment::with_prefix("TAGSYNC")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
