//! A single level attempt (session)
//!
//! Owns the progress tracker, the spawn scheduler and the attempt's RNG.
//! The game loop recreates it on level-up or restart; nothing is shared
//! between attempts.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::progress::{ProgressState, ProgressTracker};
use super::scheduler::{BatchBounds, SpawnBatch, SpawnEvent, SpawnScheduler};
use crate::content::{ContentStore, LevelDefinition};
use crate::error::ContentError;
use crate::settings::GameplaySettings;

/// Lifecycle of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    /// Created, no batch prepared yet
    Setup,
    /// Scheduler and tracker interacting every tick
    Spawning,
    /// Every correct item caught
    Complete,
    /// Abandoned by the driver (lives exhausted)
    Failed,
}

#[derive(Debug, Clone)]
pub struct LevelAttempt {
    game_id: u32,
    settings: GameplaySettings,
    tracker: ProgressTracker,
    scheduler: SpawnScheduler,
    rng: Pcg32,
    failed: bool,
}

impl LevelAttempt {
    /// Load a level from the store and start a fresh attempt
    pub fn setup(
        store: &dyn ContentStore,
        game_id: u32,
        level_number: u32,
        seed: u64,
    ) -> Result<Self, ContentError> {
        let level = store.load_level_definition(game_id, level_number)?;
        let settings = store.load_level_settings(game_id, level_number);
        log::info!(
            "Level {} of game {} ready: target '{}', {} correct, {} distractors ({:?})",
            level_number,
            game_id,
            level.target_category(),
            level.correct_items().len(),
            level.wrong_items().len(),
            level.distractor_pool()
        );
        Ok(Self::from_definition(game_id, level, settings, seed))
    }

    pub fn from_definition(
        game_id: u32,
        level: LevelDefinition,
        settings: GameplaySettings,
        seed: u64,
    ) -> Self {
        Self {
            game_id,
            settings: settings.sanitized(),
            tracker: ProgressTracker::new(level),
            scheduler: SpawnScheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            failed: false,
        }
    }

    pub fn level(&self) -> &LevelDefinition {
        self.tracker.level()
    }

    pub fn target_category(&self) -> &str {
        self.tracker.level().target_category()
    }

    pub fn settings(&self) -> &GameplaySettings {
        &self.settings
    }

    pub fn progress(&self) -> &ProgressState {
        self.tracker.state()
    }

    pub fn batch(&self) -> &SpawnBatch {
        self.scheduler.batch()
    }

    pub fn phase(&self) -> AttemptPhase {
        if self.failed {
            AttemptPhase::Failed
        } else if self.tracker.is_level_complete() {
            AttemptPhase::Complete
        } else if !self.scheduler.batch().is_ready() {
            AttemptPhase::Setup
        } else {
            AttemptPhase::Spawning
        }
    }

    pub fn mark_caught(&mut self, item_text: &str) -> bool {
        self.tracker.mark_caught(item_text)
    }

    pub fn mark_missed(&mut self, item_text: &str, category: &str) -> bool {
        self.tracker.mark_missed(item_text, category)
    }

    pub fn remaining_items(&self) -> Vec<&str> {
        self.tracker.remaining_items()
    }

    pub fn is_level_complete(&self) -> bool {
        self.tracker.is_level_complete()
    }

    /// Mark the attempt as lost
    pub fn fail(&mut self) {
        self.failed = true;
    }

    /// Build a batch with explicit bounds
    pub fn prepare_batch(&mut self, min_items: usize, max_items: usize, now_ms: u64) -> &SpawnBatch {
        self.scheduler.prepare_batch(
            &mut self.tracker,
            &self.settings,
            BatchBounds::new(min_items, max_items),
            now_ms,
            &mut self.rng,
        )
    }

    /// Prepare a new batch when the current one is used up and the level is
    /// still open. Returns true if a batch was built.
    pub fn refill_if_exhausted(&mut self, now_ms: u64) -> bool {
        if self.failed || !self.scheduler.batch().is_exhausted() || self.is_level_complete() {
            return false;
        }
        let bounds = BatchBounds::default();
        let size = self
            .prepare_batch(bounds.min_items, bounds.max_items, now_ms)
            .events()
            .len();
        log::debug!(
            "Game {} level {}: new batch of {} at {}ms",
            self.game_id,
            self.tracker.level().level_number(),
            size,
            now_ms
        );
        true
    }

    pub fn should_spawn(&mut self, now_ms: u64) -> Option<SpawnEvent> {
        if self.failed {
            return None;
        }
        self.scheduler.should_spawn(now_ms)
    }
}
