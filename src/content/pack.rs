//! JSON content packs
//!
//! A pack mirrors what the content editor authors: games, each with its
//! settings table and ordered levels, each level with its expressions.
//!
//! ```json
//! { "games": [ { "id": 1, "name": "Fizik",
//!     "settings": { "default_wrong_percentage": "30" },
//!     "levels": [ { "level_number": 1, "level_name": "Temel Büyüklükler",
//!         "expressions": [ { "expression": "Kütle", "is_correct": true },
//!                          { "expression": "Hız", "is_correct": false } ] } ] } ] }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ContentStore, Distractor, LevelDefinition};
use crate::error::ContentError;
use crate::settings::{GameplaySettings, SettingsOverrides};

/// One authored label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionRecord {
    pub expression: String,
    pub is_correct: bool,
    /// Originating category for cross-category distractors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One authored level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub level_number: u32,
    /// Doubles as the level's target category
    pub level_name: String,
    #[serde(default)]
    pub level_description: String,
    #[serde(flatten)]
    pub overrides: SettingsOverrides,
    #[serde(default)]
    pub expressions: Vec<ExpressionRecord>,
}

/// One authored game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Key/value settings table; values may be strings or numbers
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub levels: Vec<LevelRecord>,
}

impl GameRecord {
    fn settings_table(&self) -> HashMap<String, String> {
        self.settings
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }

    fn level(&self, level_number: u32) -> Option<&LevelRecord> {
        self.levels.iter().find(|l| l.level_number == level_number)
    }
}

/// A full content pack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPack {
    #[serde(default)]
    pub games: Vec<GameRecord>,
}

impl ContentPack {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read a pack from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let pack = Self::from_json_str(&json).map_err(|source| ContentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded content pack {} ({} games)", path.display(), pack.games.len());
        Ok(pack)
    }

    pub fn game(&self, game_id: u32) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.id == game_id)
    }

    fn game_or_err(&self, game_id: u32) -> Result<&GameRecord, ContentError> {
        self.game(game_id).ok_or(ContentError::UnknownGame { game_id })
    }
}

impl ContentStore for ContentPack {
    fn load_level_definition(
        &self,
        game_id: u32,
        level_number: u32,
    ) -> Result<LevelDefinition, ContentError> {
        let game = self.game_or_err(game_id)?;
        let record = game
            .level(level_number)
            .filter(|l| !l.expressions.is_empty())
            .ok_or(ContentError::LevelUnavailable {
                game_id,
                level_number,
            })?;

        let correct = record
            .expressions
            .iter()
            .filter(|e| e.is_correct)
            .map(|e| e.expression.clone());
        let wrong: Vec<&ExpressionRecord> =
            record.expressions.iter().filter(|e| !e.is_correct).collect();

        if wrong.iter().any(|e| e.category.is_some()) {
            let distractors = wrong
                .into_iter()
                .map(|e| match &e.category {
                    Some(category) => Distractor::new(e.expression.clone(), category.clone()),
                    None => Distractor::wrong(e.expression.clone()),
                })
                .collect();
            LevelDefinition::with_cross_category(
                level_number,
                record.level_name.clone(),
                correct,
                distractors,
            )
        } else {
            LevelDefinition::new(
                level_number,
                record.level_name.clone(),
                correct,
                wrong.into_iter().map(|e| e.expression.clone()),
            )
        }
    }

    fn load_settings(&self, game_id: u32) -> GameplaySettings {
        self.game(game_id)
            .map(|g| GameplaySettings::from_key_values(&g.settings_table()))
            .unwrap_or_default()
    }

    fn load_level_settings(&self, game_id: u32, level_number: u32) -> GameplaySettings {
        let base = self.load_settings(game_id);
        match self.game(game_id).and_then(|g| g.level(level_number)) {
            Some(level) => base.with_overrides(&level.overrides),
            None => base,
        }
    }

    fn last_level(&self, game_id: u32) -> Option<u32> {
        self.game(game_id)
            .and_then(|g| g.levels.iter().map(|l| l.level_number).max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WRONG_CATEGORY;
    use crate::content::DistractorPool;

    const PACK: &str = r#"{
        "games": [{
            "id": 1,
            "name": "Fizik",
            "settings": {
                "default_wrong_percentage": "30.0",
                "default_item_speed": 2.5,
                "default_max_items": "4"
            },
            "levels": [
                {
                    "level_number": 1,
                    "level_name": "Temel Büyüklükler",
                    "max_items_on_screen": 2,
                    "expressions": [
                        { "expression": "Kütle", "is_correct": true },
                        { "expression": "Zaman", "is_correct": true },
                        { "expression": "Hız", "is_correct": false }
                    ]
                },
                {
                    "level_number": 2,
                    "level_name": "Vektörel Büyüklükler",
                    "expressions": [
                        { "expression": "Kuvvet", "is_correct": true },
                        { "expression": "Kütle", "is_correct": false, "category": "Skaler Büyüklükler" }
                    ]
                },
                { "level_number": 3, "level_name": "Empty" }
            ]
        }]
    }"#;

    #[test]
    fn test_parse_and_load_level() {
        let pack = ContentPack::from_json_str(PACK).unwrap();
        let level = pack.load_level_definition(1, 1).unwrap();
        assert_eq!(level.target_category(), "Temel Büyüklükler");
        assert_eq!(level.correct_items(), ["Kütle", "Zaman"]);
        assert_eq!(level.wrong_items()[0].category, WRONG_CATEGORY);
        assert_eq!(level.distractor_pool(), DistractorPool::LevelWrongItems);
    }

    #[test]
    fn test_cross_category_expressions() {
        let pack = ContentPack::from_json_str(PACK).unwrap();
        let level = pack.load_level_definition(1, 2).unwrap();
        assert_eq!(level.distractor_pool(), DistractorPool::CrossCategory);
        assert_eq!(level.wrong_items()[0].category, "Skaler Büyüklükler");
    }

    #[test]
    fn test_empty_or_missing_level_is_unavailable() {
        let pack = ContentPack::from_json_str(PACK).unwrap();
        assert!(pack.load_level_definition(1, 3).unwrap_err().is_unavailable());
        assert!(pack.load_level_definition(1, 9).unwrap_err().is_unavailable());
        assert!(pack.load_level_definition(2, 1).unwrap_err().is_unavailable());
        assert_eq!(pack.last_level(1), Some(3));
    }

    #[test]
    fn test_settings_and_overrides() {
        let pack = ContentPack::from_json_str(PACK).unwrap();
        let settings = pack.load_settings(1);
        assert_eq!(settings.wrong_answer_percentage, 30);
        assert_eq!(settings.item_speed, 2.5);
        assert_eq!(settings.max_items_on_screen, 4);

        let level_one = pack.load_level_settings(1, 1);
        assert_eq!(level_one.max_items_on_screen, 2);
        assert_eq!(level_one.wrong_answer_percentage, 30);

        assert_eq!(pack.load_settings(42), GameplaySettings::default());
    }

    #[test]
    fn test_json_round_trip_keeps_levels() {
        let pack = ContentPack::from_json_str(PACK).unwrap();
        let json = pack.to_json_string().unwrap();
        let reloaded = ContentPack::from_json_str(&json).unwrap();
        assert_eq!(reloaded.game(1).map(|g| g.levels.len()), Some(3));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ContentPack::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }
}
