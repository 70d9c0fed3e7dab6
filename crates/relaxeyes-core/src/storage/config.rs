//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Break cadence, length and snooze
//! - Metrics simulation seeds and tick rate
//! - Notification preferences
//! - Default guided activity
//! - Hydration and stretch reminder intervals
//!
//! Configuration is stored at `~/.config/relaxeyes/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::data_dir;
use crate::activity::{ActivityKind, ActivitySettings, BreathingLevel, Therapy, WellnessIntervals};
use crate::error::{ConfigError, CoreError, Result, ValidationError};
use crate::metrics::MetricsConfig;
use crate::session::{NotificationPermission, NotificationPolicy, SessionConfig};
use crate::timer::SchedulerConfig;

/// Break schedule configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreaksSection {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: f64,
    #[serde(default = "default_initial_minutes")]
    pub initial_minutes: f64,
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    #[serde(default = "default_snooze_minutes")]
    pub snooze_minutes: f64,
    #[serde(default = "default_reminder_timeout_secs")]
    pub reminder_timeout_secs: u64,
    #[serde(default = "default_scheduler_tick_secs")]
    pub tick_secs: u64,
    /// Countdown minutes consumed per real minute. Above 1 speeds up demos.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

/// Metrics simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSection {
    #[serde(default = "default_metrics_tick_secs")]
    pub tick_secs: u64,
    #[serde(default = "default_seed_screen_minutes")]
    pub seed_screen_minutes: f64,
    #[serde(default = "default_seed_blink_rate")]
    pub seed_blink_rate: f64,
    #[serde(default = "default_seed_eye_strain")]
    pub seed_eye_strain: f64,
    #[serde(default = "default_max_gap_minutes")]
    pub max_gap_minutes: f64,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Last known answer to the host permission prompt.
    #[serde(default)]
    pub permission: NotificationPermission,
}

/// Guided activity configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySection {
    /// Activity a break opens with.
    #[serde(default)]
    pub default_activity: ActivityKind,
    #[serde(default)]
    pub breathing_level: BreathingLevel,
    #[serde(default)]
    pub default_therapy: Therapy,
}

/// Recurring wellness reminders. Zero minutes turns one off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessSection {
    #[serde(default = "default_wellness_minutes")]
    pub hydration_minutes: u64,
    #[serde(default = "default_wellness_minutes")]
    pub stretch_minutes: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/relaxeyes/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub breaks: BreaksSection,
    #[serde(default)]
    pub metrics: MetricsSection,
    #[serde(default)]
    pub notifications: NotificationsSection,
    #[serde(default)]
    pub activity: ActivitySection,
    #[serde(default)]
    pub wellness: WellnessSection,
}

// Default functions
fn default_interval_minutes() -> f64 {
    20.0
}
fn default_initial_minutes() -> f64 {
    18.0
}
fn default_duration_secs() -> u64 {
    300
}
fn default_snooze_minutes() -> f64 {
    5.0
}
fn default_reminder_timeout_secs() -> u64 {
    30
}
fn default_scheduler_tick_secs() -> u64 {
    60
}
fn default_time_scale() -> f64 {
    1.0
}
fn default_metrics_tick_secs() -> u64 {
    30
}
fn default_seed_screen_minutes() -> f64 {
    127.0
}
fn default_seed_blink_rate() -> f64 {
    18.0
}
fn default_seed_eye_strain() -> f64 {
    35.0
}
fn default_max_gap_minutes() -> f64 {
    2.0
}
fn default_wellness_minutes() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for BreaksSection {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            initial_minutes: default_initial_minutes(),
            duration_secs: default_duration_secs(),
            snooze_minutes: default_snooze_minutes(),
            reminder_timeout_secs: default_reminder_timeout_secs(),
            tick_secs: default_scheduler_tick_secs(),
            time_scale: default_time_scale(),
        }
    }
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            tick_secs: default_metrics_tick_secs(),
            seed_screen_minutes: default_seed_screen_minutes(),
            seed_blink_rate: default_seed_blink_rate(),
            seed_eye_strain: default_seed_eye_strain(),
            max_gap_minutes: default_max_gap_minutes(),
        }
    }
}

impl Default for WellnessSection {
    fn default() -> Self {
        Self {
            hydration_minutes: default_wellness_minutes(),
            stretch_minutes: default_wellness_minutes(),
        }
    }
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            permission: NotificationPermission::Granted,
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
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .trim()
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as true/false")))?,
                ),
                serde_json::Value::Number(_) => {
                    let value = value.trim();
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else {
                        value
                            .parse::<f64>()
                            .ok()
                            .and_then(serde_json::Number::from_f64)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    }
                }
                serde_json::Value::Object(_) => return Err(unknown()),
                _ => serde_json::Value::String(value.trim().to_ascii_lowercase()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn collect_entries(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
        match value {
            serde_json::Value::Object(map) => {
                for (k, v) in map {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    Self::collect_entries(&key, v, out);
                }
            }
            serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
            other => out.push((prefix.to_string(), other.to_string())),
        }
    }

    /// Location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults first if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds invalid values, or if the default config cannot be written.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            debug!(path = %path.display(), "wrote default configuration");
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load and validate a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::get_json_value_by_path(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The change is validated but
    /// not saved; call [`Config::save`] to persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation. On error `self` is unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        *self = updated;
        Ok(())
    }

    /// Every leaf setting as `(dotted_key, value)`.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let json = serde_json::to_value(self)?;
        let mut out = Vec::new();
        Self::collect_entries("", &json, &mut out);
        Ok(out)
    }

    /// Intervals, durations and the time scale must be positive and finite;
    /// metric seeds must be finite; tick periods are at most a day.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.to_session_config().validate()
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            interval_minutes: self.breaks.interval_minutes,
            initial_minutes: self.breaks.initial_minutes,
            tick_secs: self.breaks.tick_secs,
            time_scale: self.breaks.time_scale,
        }
    }

    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            tick_secs: self.metrics.tick_secs,
            seed_screen_minutes: self.metrics.seed_screen_minutes,
            seed_blink_rate: self.metrics.seed_blink_rate,
            seed_eye_strain: self.metrics.seed_eye_strain,
            max_gap_minutes: self.metrics.max_gap_minutes,
        }
    }

    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            scheduler: self.scheduler_config(),
            metrics: self.metrics_config(),
            break_duration_secs: self.breaks.duration_secs,
            reminder_timeout_secs: self.breaks.reminder_timeout_secs,
            dismiss_snooze_minutes: self.breaks.snooze_minutes,
            notifications: NotificationPolicy {
                enabled: self.notifications.enabled,
                permission: self.notifications.permission,
            },
            activity: ActivitySettings {
                default_activity: self.activity.default_activity,
                breathing_level: self.activity.breathing_level,
                therapy: self.activity.default_therapy,
            },
            wellness: WellnessIntervals {
                hydration_minutes: self.wellness.hydration_minutes,
                stretch_minutes: self.wellness.stretch_minutes,
            },
        }
    }
}

impl TryFrom<&Config> for SessionConfig {
    type Error = CoreError;

    fn try_from(cfg: &Config) -> Result<Self> {
        let session = cfg.to_session_config();
        session.validate()?;
        Ok(session)
    }
}
