//! Gameplay settings
//!
//! Loaded once per level setup from the per-game key/value table, optionally
//! overridden per level. Invalid values are clamped or defaulted with a
//! warning; bad settings are never fatal.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Per-game settings keys (as written by the content editor)
pub const KEY_ITEM_SPEED: &str = "default_item_speed";
pub const KEY_MAX_ITEMS: &str = "default_max_items";
pub const KEY_WRONG_PERCENTAGE: &str = "default_wrong_percentage";

/// Difficulty knobs for one level attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameplaySettings {
    /// Fall speed in pixels per 60 Hz frame
    pub item_speed: f32,
    /// Spawning pauses while this many items are falling
    pub max_items_on_screen: u32,
    /// Chance (0-100) that an additional pick is a distractor
    pub wrong_answer_percentage: u8,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            item_speed: DEFAULT_ITEM_SPEED,
            max_items_on_screen: DEFAULT_MAX_ITEMS_ON_SCREEN,
            wrong_answer_percentage: DEFAULT_WRONG_ANSWER_PERCENTAGE,
        }
    }
}

/// Optional per-level overrides (any field left out keeps the game value)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverrides {
    #[serde(default)]
    pub item_speed: Option<f32>,
    #[serde(default)]
    pub max_items_on_screen: Option<i64>,
    #[serde(default)]
    pub wrong_answer_percentage: Option<f64>,
}

impl GameplaySettings {
    /// Parse the per-game settings table.
    ///
    /// Missing keys use the defaults. Values that fail to parse are logged and
    /// also use the defaults. Everything is clamped afterwards.
    pub fn from_key_values(map: &HashMap<String, String>) -> Self {
        let defaults = Self::default();

        let item_speed = parse_value::<f32>(map, KEY_ITEM_SPEED).unwrap_or(defaults.item_speed);
        let max_items = parse_value::<i64>(map, KEY_MAX_ITEMS)
            .map(clamp_max_items)
            .unwrap_or(defaults.max_items_on_screen);
        // Older packs store the percentage as a float ("30.0")
        let wrong = parse_value::<f64>(map, KEY_WRONG_PERCENTAGE)
            .map(clamp_percentage)
            .unwrap_or(defaults.wrong_answer_percentage);

        Self {
            item_speed,
            max_items_on_screen: max_items,
            wrong_answer_percentage: wrong,
        }
        .sanitized()
    }

    /// Apply per-level overrides on top of these settings
    pub fn with_overrides(self, overrides: &SettingsOverrides) -> Self {
        Self {
            item_speed: overrides.item_speed.unwrap_or(self.item_speed),
            max_items_on_screen: overrides
                .max_items_on_screen
                .map(clamp_max_items)
                .unwrap_or(self.max_items_on_screen),
            wrong_answer_percentage: overrides
                .wrong_answer_percentage
                .map(clamp_percentage)
                .unwrap_or(self.wrong_answer_percentage),
        }
        .sanitized()
    }

    /// Clamp every field into its valid range
    pub fn sanitized(self) -> Self {
        let item_speed = if self.item_speed.is_finite() && self.item_speed > 0.0 {
            self.item_speed
        } else {
            log::warn!(
                "Item speed {} is not positive, using {}",
                self.item_speed,
                DEFAULT_ITEM_SPEED
            );
            DEFAULT_ITEM_SPEED
        };
        let max_items_on_screen = clamp_max_items(i64::from(self.max_items_on_screen));
        let wrong_answer_percentage = if self.wrong_answer_percentage > 100 {
            log::warn!(
                "Wrong answer percentage {} is above 100, using 100",
                self.wrong_answer_percentage
            );
            100
        } else {
            self.wrong_answer_percentage
        };
        Self {
            item_speed,
            max_items_on_screen,
            wrong_answer_percentage,
        }
    }

    /// Probability in [0, 1] that an additional pick is a distractor
    pub fn wrong_fraction(&self) -> f64 {
        f64::from(self.wrong_answer_percentage.min(100)) / 100.0
    }

    /// Fall speed in pixels per second
    pub fn fall_speed_px_per_sec(&self) -> f32 {
        self.item_speed * FRAMES_PER_SECOND
    }
}

fn parse_value<T: std::str::FromStr>(map: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = map.get(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring unparsable setting {key}={raw:?}");
            None
        }
    }
}

fn clamp_max_items(value: i64) -> u32 {
    if value < 1 {
        log::warn!(
            "Max items on screen {value} is below 1, using {}",
            DEFAULT_MAX_ITEMS_ON_SCREEN
        );
        DEFAULT_MAX_ITEMS_ON_SCREEN
    } else {
        u32::try_from(value).unwrap_or(u32::MAX)
    }
}

fn clamp_percentage(value: f64) -> u8 {
    if !value.is_finite() {
        log::warn!(
            "Wrong answer percentage {value} is not a number, using {}",
            DEFAULT_WRONG_ANSWER_PERCENTAGE
        );
        return DEFAULT_WRONG_ANSWER_PERCENTAGE;
    }
    let clamped = value.round().clamp(0.0, 100.0);
    if clamped != value.round() {
        log::warn!("Wrong answer percentage {value} is outside 0-100, using {clamped}");
    }
    clamped as u8
}
