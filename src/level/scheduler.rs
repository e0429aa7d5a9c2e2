//! Spawn scheduling
//!
//! A batch is a time-ordered list of spawn events built in one go and then
//! consumed by index as the clock passes each event's time. When a batch is
//! exhausted and the level is still open, the driver prepares a new one.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::progress::ProgressTracker;
use super::selection::{Pick, choose_category_and_item};
use crate::consts::*;
use crate::settings::GameplaySettings;

/// One future spawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEvent {
    pub scheduled_time_ms: u64,
    pub item_text: String,
    pub category: String,
}

/// A prepared batch of spawn events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnBatch {
    events: Vec<SpawnEvent>,
    next_index: usize,
    ready: bool,
}

impl SpawnBatch {
    pub fn events(&self) -> &[SpawnEvent] {
        &self.events
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// True before the first batch and once every event was handed out
    pub fn is_exhausted(&self) -> bool {
        !self.ready || self.next_index >= self.events.len()
    }
}

/// Inclusive bounds on the size of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchBounds {
    pub min_items: usize,
    pub max_items: usize,
}

impl Default for BatchBounds {
    fn default() -> Self {
        Self {
            min_items: BATCH_MIN_ITEMS,
            max_items: BATCH_MAX_ITEMS,
        }
    }
}

impl BatchBounds {
    pub fn new(min_items: usize, max_items: usize) -> Self {
        Self {
            min_items: min_items.min(max_items),
            max_items: min_items.max(max_items),
        }
    }
}

/// Accumulates events with random spacing
struct BatchBuilder {
    events: Vec<SpawnEvent>,
    clock_ms: u64,
}

impl BatchBuilder {
    fn new(now_ms: u64) -> Self {
        Self {
            events: Vec::new(),
            clock_ms: now_ms,
        }
    }

    fn push<R: Rng + ?Sized>(&mut self, rng: &mut R, item_text: String, category: String) {
        // First event of a batch fires immediately
        if !self.events.is_empty() {
            self.clock_ms += rng.random_range(SPAWN_DELAY_MIN_MS..=SPAWN_DELAY_MAX_MS);
        }
        self.events.push(SpawnEvent {
            scheduled_time_ms: self.clock_ms,
            item_text,
            category,
        });
    }

    fn contains(&self, item_text: &str) -> bool {
        self.events.iter().any(|e| e.item_text == item_text)
    }
}

/// Builds batches and hands out due events
#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    batch: SpawnBatch,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(&self) -> &SpawnBatch {
        &self.batch
    }

    /// Build a new batch, replacing the current one.
    ///
    /// Respawns come first, then every correct item not yet scheduled, then
    /// random extra picks until the batch reaches a size drawn from `bounds`.
    /// A correct item is never scheduled while another event for it is
    /// pending or falling.
    pub fn prepare_batch<R: Rng + ?Sized>(
        &mut self,
        tracker: &mut ProgressTracker,
        settings: &GameplaySettings,
        bounds: BatchBounds,
        now_ms: u64,
        rng: &mut R,
    ) -> &SpawnBatch {
        let target = tracker.level().target_category().to_string();
        let mut builder = BatchBuilder::new(now_ms);

        let respawns = tracker.take_respawn_queue();
        let respawn_count = respawns.len();
        for item_text in respawns {
            if tracker.is_caught(&item_text) || builder.contains(&item_text) {
                continue;
            }
            tracker.mark_scheduled(&item_text);
            builder.push(rng, item_text, target.clone());
        }

        let unscheduled: Vec<String> = tracker
            .unscheduled_items()
            .into_iter()
            .map(str::to_string)
            .collect();
        let guaranteed = builder.events.len() + unscheduled.len();
        for item_text in unscheduled {
            tracker.mark_scheduled(&item_text);
            builder.push(rng, item_text, target.clone());
        }

        let bounds = BatchBounds::new(bounds.min_items, bounds.max_items);
        let batch_size = rng.random_range(bounds.min_items..=bounds.max_items);
        let additional = batch_size.saturating_sub(builder.events.len());
        for _ in 0..additional {
            let Some(pick) = pick_additional(tracker, settings, rng) else {
                log::trace!("No valid extra pick for level {}", tracker.level().level_number());
                continue;
            };
            if pick.category == target {
                tracker.mark_scheduled(&pick.text);
            }
            builder.push(rng, pick.text, pick.category);
        }

        if builder.events.is_empty() {
            log::trace!("Empty batch at {now_ms}ms");
        } else {
            log::debug!(
                "Prepared {} spawns for '{}' ({} respawned, {} guaranteed, {} extra) from {}ms",
                builder.events.len(),
                target,
                respawn_count,
                guaranteed,
                builder.events.len().saturating_sub(guaranteed),
                now_ms
            );
        }

        self.batch = SpawnBatch {
            events: builder.events,
            next_index: 0,
            ready: true,
        };
        &self.batch
    }

    /// Hand out the next event if it is due
    pub fn should_spawn(&mut self, now_ms: u64) -> Option<SpawnEvent> {
        if self.batch.is_exhausted() {
            return None;
        }
        let event = self.batch.events.get(self.batch.next_index)?;
        if event.scheduled_time_ms > now_ms {
            return None;
        }
        let event = event.clone();
        self.batch.next_index += 1;
        Some(event)
    }
}

/// Ask the selection policy for an extra item, rejecting picks that would
/// mislabel a correct item or duplicate one already pending
fn pick_additional<R: Rng + ?Sized>(
    tracker: &ProgressTracker,
    settings: &GameplaySettings,
    rng: &mut R,
) -> Option<Pick> {
    let level = tracker.level();
    for _ in 0..MAX_PICK_ATTEMPTS {
        let pick = choose_category_and_item(tracker, settings, rng)?;
        let valid = if pick.category == level.target_category() {
            tracker.is_unscheduled(&pick.text)
        } else {
            !level.is_correct(&pick.text)
        };
        if valid {
            return Some(pick);
        }
    }
    None
}
