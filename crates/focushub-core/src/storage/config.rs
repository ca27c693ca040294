//! TOML-based application configuration.
//!
//! Stores host preferences:
//! - Initial Pomodoro cycle lengths (used when no snapshot exists yet)
//! - Quote feed URL
//! - Log level
//! - Autosave behavior
//!
//! Configuration is stored at `~/.config/focushub/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::quote::DEFAULT_QUOTE_FEED;
use crate::timer::PomodoroSettings;

/// Quote feed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Endpoint answering a ZenQuotes-shaped JSON array.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Tracing filter directive, e.g. `info` or `focushub_core=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Snapshot persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Persist on every watch tick, not just on completed intervals.
    /// Mutating commands save regardless.
    #[serde(default = "default_true")]
    pub autosave: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focushub/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Cycle lengths for a hub without a snapshot; afterwards the snapshot
    /// carries the live settings.
    #[serde(default)]
    pub pomodoro: PomodoroSettings,
    #[serde(default)]
    pub quote: QuoteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

// Default functions
fn default_feed_url() -> String {
    DEFAULT_QUOTE_FEED.into()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_true() -> bool {
    true
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { autosave: true }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            pomodoro: PomodoroSettings::default(),
            quote: QuoteConfig::default(),
            logging: LoggingConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl HubConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(String::new()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| ConfigError::InvalidValue {
                                    key: key.to_string(),
                                    message: format!("cannot parse '{value}' as number"),
                                })?
                        } else {
                            return Err(ConfigError::InvalidValue {
                                key: key.to_string(),
                                message: format!("cannot parse '{value}' as number"),
                            });
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::Dir(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing (and returning) the default when the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist. Returns an error if the key is
    /// unknown or the value cannot be parsed into the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        self.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = HubConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: HubConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.pomodoro.work_min, 25);
        assert_eq!(parsed.quote.feed_url, DEFAULT_QUOTE_FEED);
        assert!(parsed.storage.autosave);
    }

    #[test]
    fn empty_toml_fills_every_section() {
        let parsed: HubConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, HubConfig::default());
    }

    #[test]
    fn partial_section_keeps_field_defaults() {
        let parsed: HubConfig = toml::from_str("[pomodoro]\nwork_min = 50\n").unwrap();
        assert_eq!(parsed.pomodoro.work_min, 50);
        assert_eq!(parsed.pomodoro.short_break_min, 5);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = HubConfig::default();
        assert_eq!(cfg.get("pomodoro.work_min").as_deref(), Some("25"));
        assert_eq!(cfg.get("storage.autosave").as_deref(), Some("true"));
        assert_eq!(
            cfg.get("quote.feed_url").as_deref(),
            Some(DEFAULT_QUOTE_FEED)
        );
        assert!(cfg.get("quote.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(HubConfig::default()).unwrap();
        HubConfig::set_json_value_by_path(&mut json, "pomodoro.long_break_every", "6").unwrap();
        assert_eq!(
            HubConfig::get_json_value_by_path(&json, "pomodoro.long_break_every").unwrap(),
            &serde_json::Value::Number(6.into())
        );
    }

    #[test]
    fn set_json_value_by_path_updates_nested_bool_and_string() {
        let mut json = serde_json::to_value(HubConfig::default()).unwrap();
        HubConfig::set_json_value_by_path(&mut json, "storage.autosave", "false").unwrap();
        HubConfig::set_json_value_by_path(&mut json, "logging.level", "debug").unwrap();
        assert_eq!(
            HubConfig::get_json_value_by_path(&json, "storage.autosave").unwrap(),
            &serde_json::Value::Bool(false)
        );
        assert_eq!(
            HubConfig::get_json_value_by_path(&json, "logging.level").unwrap(),
            &serde_json::Value::String("debug".to_string())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(HubConfig::default()).unwrap();
        let result = HubConfig::set_json_value_by_path(&mut json, "pomodoro.nonexistent", "1");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(HubConfig::default()).unwrap();
        let result = HubConfig::set_json_value_by_path(&mut json, "storage.autosave", "maybe");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        let result = HubConfig::set_json_value_by_path(&mut json, "pomodoro.work_min", "soon");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
