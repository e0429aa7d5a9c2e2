//! Level progression engine
//!
//! Decides what falls, when, and at what ratio of correct to wrong items,
//! and tracks completion across respawns.

pub mod attempt;
pub mod progress;
pub mod scheduler;
pub mod selection;

pub use attempt::{AttemptPhase, LevelAttempt};
pub use progress::{ProgressState, ProgressTracker};
pub use scheduler::{BatchBounds, SpawnBatch, SpawnEvent, SpawnScheduler};
pub use selection::{Pick, choose_category_and_item};
