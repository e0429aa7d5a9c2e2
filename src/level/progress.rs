//! Progress tracking for one level attempt
//!
//! Tracks which correct items were caught, which are already scheduled or
//! falling, and which fell off-screen and must be spawned again.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::content::LevelDefinition;

/// Mutable progress of a level attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Correct items the player collected
    caught: BTreeSet<String>,
    /// Correct items scheduled or falling (each at most once at a time)
    dropped: BTreeSet<String>,
    /// Correct items that escaped and go into the next batch
    respawn_queue: Vec<String>,
}

impl ProgressState {
    pub fn caught(&self) -> &BTreeSet<String> {
        &self.caught
    }

    pub fn dropped(&self) -> &BTreeSet<String> {
        &self.dropped
    }

    pub fn respawn_queue(&self) -> &[String] {
        &self.respawn_queue
    }
}

/// Owns a level definition and the progress made against it
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    level: LevelDefinition,
    state: ProgressState,
}

impl ProgressTracker {
    pub fn new(level: LevelDefinition) -> Self {
        Self {
            level,
            state: ProgressState::default(),
        }
    }

    pub fn level(&self) -> &LevelDefinition {
        &self.level
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Record a catch. Returns true only for a correct item caught for the
    /// first time; anything else is a no-op.
    pub fn mark_caught(&mut self, item_text: &str) -> bool {
        if !self.level.is_correct(item_text) || self.state.caught.contains(item_text) {
            return false;
        }
        self.state.caught.insert(item_text.to_string())
    }

    /// Record an item that fell off the bottom. Correct items are queued for
    /// the next batch; distractors and unknown labels are ignored.
    pub fn mark_missed(&mut self, item_text: &str, category: &str) -> bool {
        if category != self.level.target_category()
            || !self.level.is_correct(item_text)
            || self.state.caught.contains(item_text)
            || self.state.respawn_queue.iter().any(|t| t == item_text)
        {
            return false;
        }
        self.state.respawn_queue.push(item_text.to_string());
        true
    }

    /// Correct items not yet caught, in definition order
    pub fn remaining_items(&self) -> Vec<&str> {
        self.level
            .correct_items()
            .iter()
            .filter(|item| !self.state.caught.contains(item.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn is_level_complete(&self) -> bool {
        self.level
            .correct_items()
            .iter()
            .all(|item| self.state.caught.contains(item))
    }

    /// Correct items neither caught nor scheduled, in definition order
    pub fn unscheduled_items(&self) -> Vec<&str> {
        self.level
            .correct_items()
            .iter()
            .filter(|item| {
                !self.state.caught.contains(item.as_str())
                    && !self.state.dropped.contains(item.as_str())
            })
            .map(String::as_str)
            .collect()
    }

    pub(crate) fn is_unscheduled(&self, item_text: &str) -> bool {
        self.level.is_correct(item_text)
            && !self.state.caught.contains(item_text)
            && !self.state.dropped.contains(item_text)
    }

    pub(crate) fn is_caught(&self, item_text: &str) -> bool {
        self.state.caught.contains(item_text)
    }

    /// Empty the respawn queue, handing its entries to the scheduler
    pub(crate) fn take_respawn_queue(&mut self) -> Vec<String> {
        std::mem::take(&mut self.state.respawn_queue)
    }

    pub(crate) fn mark_scheduled(&mut self, item_text: &str) {
        let _ = self.state.dropped.insert(item_text.to_string());
    }
}
