//! Game content: level definitions and the stores that supply them
//!
//! A level asks the player to collect every label of one target category.
//! Distractors are labels of other categories dropped alongside them.

pub mod builtin;
pub mod pack;

pub use pack::ContentPack;

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::consts::WRONG_CATEGORY;
use crate::error::ContentError;
use crate::settings::GameplaySettings;

/// Where a level's distractors come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistractorPool {
    /// Authored per level; every distractor carries the `"wrong"` label
    #[default]
    LevelWrongItems,
    /// Drawn from the other categories' items; each keeps its own category
    CrossCategory,
}

/// A label that does not belong to the level's target category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Distractor {
    pub text: String,
    pub category: String,
}

impl Distractor {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// A level-local wrong item
    pub fn wrong(text: impl Into<String>) -> Self {
        Self::new(text, WRONG_CATEGORY)
    }
}

/// Immutable description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    level_number: u32,
    target_category: String,
    /// Definition order is preserved for the "remaining" overlay
    correct_items: Vec<String>,
    wrong_items: Vec<Distractor>,
    pool: DistractorPool,
}

impl LevelDefinition {
    /// Build a level whose distractors are plain wrong answers
    pub fn new<C, W>(
        level_number: u32,
        target_category: impl Into<String>,
        correct_items: C,
        wrong_items: W,
    ) -> Result<Self, ContentError>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        let wrong = wrong_items.into_iter().map(Distractor::wrong).collect();
        Self::build(
            level_number,
            target_category.into(),
            correct_items,
            wrong,
            DistractorPool::LevelWrongItems,
        )
    }

    /// Build a level whose distractors come from other categories
    pub fn with_cross_category<C>(
        level_number: u32,
        target_category: impl Into<String>,
        correct_items: C,
        distractors: Vec<Distractor>,
    ) -> Result<Self, ContentError>
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::build(
            level_number,
            target_category.into(),
            correct_items,
            distractors,
            DistractorPool::CrossCategory,
        )
    }

    fn build<C>(
        level_number: u32,
        target_category: String,
        correct_items: C,
        distractors: Vec<Distractor>,
        pool: DistractorPool,
    ) -> Result<Self, ContentError>
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut seen = HashSet::new();
        let correct_items: Vec<String> = correct_items
            .into_iter()
            .map(Into::into)
            .filter(|item| seen.insert(item.clone()))
            .collect();

        if correct_items.is_empty() {
            return Err(ContentError::NoCorrectItems { level_number });
        }

        let mut wrong_seen = HashSet::new();
        let mut wrong_items = Vec::with_capacity(distractors.len());
        for distractor in distractors {
            // A distractor can never be collected, so it may not share the
            // target's label or any correct item's text
            if seen.contains(&distractor.text) || distractor.category == target_category {
                return Err(ContentError::OverlappingItems {
                    level_number,
                    item: distractor.text,
                });
            }
            if wrong_seen.insert(distractor.text.clone()) {
                wrong_items.push(distractor);
            }
        }

        Ok(Self {
            level_number,
            target_category,
            correct_items,
            wrong_items,
            pool,
        })
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn target_category(&self) -> &str {
        &self.target_category
    }

    pub fn correct_items(&self) -> &[String] {
        &self.correct_items
    }

    pub fn wrong_items(&self) -> &[Distractor] {
        &self.wrong_items
    }

    pub fn distractor_pool(&self) -> DistractorPool {
        self.pool
    }

    /// Whether `text` is one of the labels to collect
    pub fn is_correct(&self, text: &str) -> bool {
        self.correct_items.iter().any(|item| item == text)
    }
}

/// Source of levels and settings for the game loop
pub trait ContentStore {
    /// Load one level. A level number with no data is `LevelUnavailable`.
    fn load_level_definition(
        &self,
        game_id: u32,
        level_number: u32,
    ) -> Result<LevelDefinition, ContentError>;

    /// Per-game settings (defaults when the game has none)
    fn load_settings(&self, game_id: u32) -> GameplaySettings;

    /// Settings for a specific level; stores with per-level overrides
    /// replace this
    fn load_level_settings(&self, game_id: u32, _level_number: u32) -> GameplaySettings {
        self.load_settings(game_id)
    }

    /// Highest level number of the game, if the game exists
    fn last_level(&self, game_id: u32) -> Option<u32>;
}

#[derive(Debug, Clone, Default)]
struct MemoryGame {
    settings: GameplaySettings,
    levels: BTreeMap<u32, LevelDefinition>,
}

/// In-memory content store, filled programmatically
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    games: HashMap<u32, MemoryGame>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a game's settings
    pub fn insert_game(&mut self, game_id: u32, settings: GameplaySettings) {
        self.games.entry(game_id).or_default().settings = settings.sanitized();
    }

    /// Add a level to a game, creating the game with default settings if needed
    pub fn insert_level(&mut self, game_id: u32, level: LevelDefinition) {
        let game = self.games.entry(game_id).or_default();
        let _ = game.levels.insert(level.level_number(), level);
    }
}

impl ContentStore for MemoryContentStore {
    fn load_level_definition(
        &self,
        game_id: u32,
        level_number: u32,
    ) -> Result<LevelDefinition, ContentError> {
        let game = self
            .games
            .get(&game_id)
            .ok_or(ContentError::UnknownGame { game_id })?;
        game.levels
            .get(&level_number)
            .cloned()
            .ok_or(ContentError::LevelUnavailable {
                game_id,
                level_number,
            })
    }

    fn load_settings(&self, game_id: u32) -> GameplaySettings {
        self.games
            .get(&game_id)
            .map(|g| g.settings)
            .unwrap_or_default()
    }

    fn last_level(&self, game_id: u32) -> Option<u32> {
        self.games
            .get(&game_id)
            .and_then(|g| g.levels.keys().next_back().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_rejects_empty_correct_set() {
        let err = LevelDefinition::new(1, "Temel", Vec::<String>::new(), ["Hız"]).unwrap_err();
        assert!(matches!(err, ContentError::NoCorrectItems { level_number: 1 }));
    }

    #[test]
    fn test_level_rejects_overlap() {
        let err = LevelDefinition::new(2, "Temel", ["Kütle", "Zaman"], ["Kütle"]).unwrap_err();
        match err {
            ContentError::OverlappingItems { item, .. } => assert_eq!(item, "Kütle"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_level_rejects_distractor_with_target_label() {
        let err = LevelDefinition::with_cross_category(
            1,
            "Temel",
            ["Kütle"],
            vec![Distractor::new("Hız", "Temel")],
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::OverlappingItems { .. }));
    }

    #[test]
    fn test_level_collapses_duplicates_in_order() {
        let level =
            LevelDefinition::new(1, "Temel", ["Zaman", "Kütle", "Zaman"], ["Hız", "Hız"]).unwrap();
        assert_eq!(level.correct_items(), ["Zaman", "Kütle"]);
        assert_eq!(level.wrong_items().len(), 1);
        assert_eq!(level.wrong_items()[0].category, WRONG_CATEGORY);
        assert_eq!(level.distractor_pool(), DistractorPool::LevelWrongItems);
        assert!(level.is_correct("Kütle"));
        assert!(!level.is_correct("Hız"));
    }

    #[test]
    fn test_memory_store_lookup() {
        let mut store = MemoryContentStore::new();
        store.insert_game(
            7,
            GameplaySettings {
                wrong_answer_percentage: 10,
                ..Default::default()
            },
        );
        store.insert_level(7, LevelDefinition::new(1, "A", ["a"], ["b"]).unwrap());
        store.insert_level(7, LevelDefinition::new(3, "C", ["c"], ["d"]).unwrap());

        assert_eq!(store.last_level(7), Some(3));
        assert_eq!(store.last_level(8), None);
        assert_eq!(store.load_settings(7).wrong_answer_percentage, 10);
        assert_eq!(store.load_settings(8), GameplaySettings::default());
        assert_eq!(
            store.load_level_definition(7, 3).unwrap().target_category(),
            "C"
        );

        let err = store.load_level_definition(7, 2).unwrap_err();
        assert!(err.is_unavailable());
        let err = store.load_level_definition(9, 1).unwrap_err();
        assert!(matches!(err, ContentError::UnknownGame { game_id: 9 }));
    }
}
