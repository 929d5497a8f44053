//! TOML-based application configuration.
//!
//! Stores tuning knobs including:
//! - Timer defaults used by `reset()`
//! - Reminder poll interval
//! - Dialogue flourish probabilities and cooldowns
//! - XP amounts for keyword hints
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::TimerMode;

/// Timer defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_timer_seconds")]
    pub default_seconds: u64,
    #[serde(default = "default_timer_mode")]
    pub default_mode: TimerMode,
}

/// Reminder scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

/// Dialogue decoration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    /// Force a persona rotation once this many seconds have passed.
    #[serde(default = "default_persona_shift_secs")]
    pub persona_shift_secs: i64,
    #[serde(default = "default_persona_shift_chance")]
    pub persona_shift_chance: f64,
    /// Minimum gap between two chaos frames, and between two event vignettes.
    #[serde(default = "default_flourish_cooldown")]
    pub flourish_cooldown_secs: i64,
    #[serde(default = "default_chaos_chance")]
    pub chaos_chance: f64,
    #[serde(default = "default_event_chance")]
    pub event_chance: f64,
    #[serde(default = "default_time_theme_interval")]
    pub time_theme_interval_secs: i64,
    #[serde(default = "default_recent_intents_cap")]
    pub recent_intents_cap: usize,
    /// Directory of `<topic>.txt` files appended to homework answers.
    #[serde(default)]
    pub knowledge_dir: Option<String>,
}

/// XP granted by keyword hints on every message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintsConfig {
    #[serde(default = "default_hint_xp")]
    pub study_xp: i64,
    #[serde(default = "default_hint_xp")]
    pub coding_xp: i64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub dialogue: DialogueConfig,
    #[serde(default)]
    pub hints: HintsConfig,
}

// Default functions
fn default_timer_seconds() -> u64 {
    25 * 60
}
fn default_timer_mode() -> TimerMode {
    TimerMode::Focus
}
fn default_poll_interval() -> u64 {
    6
}
fn default_persona_shift_secs() -> i64 {
    60
}
fn default_persona_shift_chance() -> f64 {
    0.2
}
fn default_flourish_cooldown() -> i64 {
    20
}
fn default_chaos_chance() -> f64 {
    0.08
}
fn default_event_chance() -> f64 {
    0.18
}
fn default_time_theme_interval() -> i64 {
    300
}
fn default_recent_intents_cap() -> usize {
    20
}
fn default_hint_xp() -> i64 {
    5
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_seconds: default_timer_seconds(),
            default_mode: default_timer_mode(),
        }
    }
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl RemindersConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            persona_shift_secs: default_persona_shift_secs(),
            persona_shift_chance: default_persona_shift_chance(),
            flourish_cooldown_secs: default_flourish_cooldown(),
            chaos_chance: default_chaos_chance(),
            event_chance: default_event_chance(),
            time_theme_interval_secs: default_time_theme_interval(),
            recent_intents_cap: default_recent_intents_cap(),
            knowledge_dir: None,
        }
    }
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            study_xp: default_hint_xp(),
            coding_xp: default_hint_xp(),
        }
    }
}

impl Config {
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
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return (and write) the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a config value by key without saving. Returns error if the key
    /// is unknown or the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.default_seconds, 1500);
        assert_eq!(parsed.timer.default_mode, TimerMode::Focus);
        assert_eq!(parsed.reminders.poll_interval_secs, 6);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[dialogue]\nchaos_chance = 0.5\n").unwrap();
        assert_eq!(parsed.dialogue.chaos_chance, 0.5);
        assert_eq!(parsed.dialogue.persona_shift_secs, 60);
        assert_eq!(parsed.hints.study_xp, 5);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.default_mode").as_deref(), Some("focus"));
        assert_eq!(cfg.get("reminders.poll_interval_secs").as_deref(), Some("6"));
        assert!(cfg.get("timer.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("dialogue.persona_shift_secs", "90").unwrap();
        assert_eq!(cfg.dialogue.persona_shift_secs, 90);
        cfg.set("dialogue.event_chance", "0.5").unwrap();
        assert_eq!(cfg.dialogue.event_chance, 0.5);
    }

    #[test]
    fn set_updates_enum_string() {
        let mut cfg = Config::default();
        cfg.set("timer.default_mode", "break").unwrap();
        assert_eq!(cfg.timer.default_mode, TimerMode::Break);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("timer.nonexistent", "1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn set_rejects_invalid_number() {
        let mut cfg = Config::default();
        let err = cfg.set("reminders.poll_interval_secs", "soon").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn set_rejects_unknown_enum_variant() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.default_mode", "nap").is_err());
        assert_eq!(cfg.timer.default_mode, TimerMode::Focus);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.dialogue.recent_intents_cap, 20);
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.set("hints.coding_xp", "8").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().hints.coding_xp, 8);
    }

    #[test]
    fn poll_interval_is_at_least_one_second() {
        let cfg = RemindersConfig {
            poll_interval_secs: 0,
        };
        assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
    }
}
