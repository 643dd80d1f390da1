//! Widget configuration.
//!
//! Every field has a default, so hosts can pass a partial JSON document:
//!
//! ```
//! use tally_core::WidgetConfig;
//!
//! let config = WidgetConfig::from_json(r#"{"auto_interval_ms": 250}"#).unwrap();
//! assert_eq!(config.auto_interval_ms, 250);
//! assert_eq!(config.history_capacity, 20);
//! ```

use crate::bounce::BounceConfig;
use crate::error::ConfigError;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::presentation::{default_emoji, default_messages, ThresholdTable, DEFAULT_COLOR_RANGE};
use crate::state::CounterSettings;
use serde::{Deserialize, Serialize};

/// Upper bound on any configured delay, one hour.
const MAX_DELAY_MS: u32 = 3_600_000;

/// Complete widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// History entries kept
    pub history_capacity: usize,
    /// Auto-mode tick period
    pub auto_interval_ms: u32,
    /// How long the copied flag stays up
    pub copied_flash_ms: u32,
    /// Floor of the lower soft limit
    pub lower_bound: i64,
    /// Ceiling of the upper soft limit
    pub upper_bound: i64,
    /// Half-width of the green-to-red color range
    pub color_range: i64,
    /// Emoji by count
    pub emoji: ThresholdTable<String>,
    /// Message by count
    pub messages: ThresholdTable<String>,
    /// Card animation
    pub bounce: BounceConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        let settings = CounterSettings::default();
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            auto_interval_ms: settings.auto_interval_ms,
            copied_flash_ms: settings.copied_flash_ms,
            lower_bound: settings.lower_bound,
            upper_bound: settings.upper_bound,
            color_range: DEFAULT_COLOR_RANGE,
            emoji: default_emoji(),
            messages: default_messages(),
            bounce: BounceConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check that every field holds a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::invalid("history_capacity", "must be at least 1"));
        }
        check_delay("auto_interval_ms", self.auto_interval_ms)?;
        check_delay("copied_flash_ms", self.copied_flash_ms)?;
        if self.lower_bound >= self.upper_bound {
            return Err(ConfigError::invalid(
                "upper_bound",
                format!(
                    "must exceed lower_bound ({} >= {})",
                    self.lower_bound, self.upper_bound
                ),
            ));
        }
        if self.color_range <= 0 {
            return Err(ConfigError::invalid("color_range", "must be positive"));
        }

        let b = &self.bounce;
        for (field, value) in [
            ("bounce.card_width", b.card_width),
            ("bounce.card_height", b.card_height),
            ("bounce.speed_x", b.speed_x),
            ("bounce.speed_y", b.speed_y),
            ("bounce.spin", b.spin),
            ("bounce.max_frame_ratio", b.max_frame_ratio),
            ("bounce.spawn_fraction", b.spawn_fraction),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a finite, non-negative number (got {value})"),
                ));
            }
        }
        if b.max_frame_ratio == 0.0 {
            return Err(ConfigError::invalid("bounce.max_frame_ratio", "must be positive"));
        }
        if b.spawn_fraction > 1.0 {
            return Err(ConfigError::invalid("bounce.spawn_fraction", "must be at most 1"));
        }
        Ok(())
    }

    /// Settings consumed by [`CounterState`](crate::CounterState) transitions.
    #[must_use]
    pub fn counter_settings(&self) -> CounterSettings {
        CounterSettings {
            history_capacity: self.history_capacity,
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
            auto_interval_ms: self.auto_interval_ms,
            copied_flash_ms: self.copied_flash_ms,
        }
    }
}

fn check_delay(field: &'static str, ms: u32) -> Result<(), ConfigError> {
    if ms == 0 || ms > MAX_DELAY_MS {
        return Err(ConfigError::invalid(
            field,
            format!("must be between 1 and {MAX_DELAY_MS} ms (got {ms})"),
        ));
    }
    Ok(())
}
