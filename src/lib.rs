//! Quantity Catch - an educational catch-the-falling-label arcade game
//!
//! The player moves a basket along the bottom of the play field and catches
//! the labels that belong to the level's target category (for example the
//! base physical quantities) while letting distractors fall past.
//!
//! Core modules:
//! - `content`: Level definitions, content packs and the built-in catalog
//! - `level`: Progress tracking, item selection and spawn scheduling
//! - `sim`: Deterministic tick loop (falling items, paddle, lives, phases)
//! - `settings`: Per-game gameplay settings with clamping

pub mod content;
pub mod error;
pub mod level;
pub mod settings;
pub mod sim;

pub use content::{ContentStore, Distractor, LevelDefinition, MemoryContentStore};
pub use error::ContentError;
pub use level::{LevelAttempt, ProgressState, SpawnBatch, SpawnEvent};
pub use settings::GameplaySettings;
pub use sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Basket (paddle) geometry
    pub const PLAYER_WIDTH: f32 = 100.0;
    pub const PLAYER_HEIGHT: f32 = 20.0;
    /// Gap between the basket and the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 10.0;
    /// Keyboard basket speed (pixels per frame)
    pub const PLAYER_SPEED: f32 = 10.0;
    /// Highest raw reading of the analog potentiometer controller
    pub const POT_MAX: u16 = 1023;

    /// Falling label geometry (keeps the 220x56 button aspect ratio)
    pub const ITEM_WIDTH: f32 = 120.0;
    pub const ITEM_HEIGHT: f32 = 30.0;
    /// Items spawn above the field, with their top in this range
    pub const ITEM_SPAWN_Y_MIN: f32 = -100.0;
    pub const ITEM_SPAWN_Y_MAX: f32 = -40.0;
    /// An item whose top passes `SCREEN_HEIGHT + MISS_MARGIN` has been missed
    pub const MISS_MARGIN: f32 = 10.0;

    /// Frame rate the item speed setting is expressed in
    pub const FRAMES_PER_SECOND: f32 = 60.0;
    /// Default frame length for the native runner (ms)
    pub const FRAME_MS: u64 = 16;

    /// Gameplay defaults (used when per-game settings are missing or invalid)
    pub const DEFAULT_ITEM_SPEED: f32 = 3.0;
    pub const DEFAULT_MAX_ITEMS_ON_SCREEN: u32 = 5;
    pub const DEFAULT_WRONG_ANSWER_PERCENTAGE: u8 = 40;

    /// Items per refill batch (inclusive bounds)
    pub const BATCH_MIN_ITEMS: usize = 2;
    pub const BATCH_MAX_ITEMS: usize = 5;
    /// Inter-arrival delay band between spawns in one batch (ms, inclusive)
    pub const SPAWN_DELAY_MIN_MS: u64 = 400;
    pub const SPAWN_DELAY_MAX_MS: u64 = 1200;
    /// Retries for an additional pick that collides with a pending correct item
    pub const MAX_PICK_ATTEMPTS: usize = 8;

    /// Lives at the start of a game
    pub const STARTING_LIVES: u8 = 3;
    /// Points for a correct catch (halved while the help overlay is open)
    pub const POINTS_PER_CATCH: u64 = 10;
    pub const POINTS_PER_CATCH_HELP: u64 = 5;

    /// Category label given to level-local distractors
    pub const WRONG_CATEGORY: &str = "wrong";
}

/// Map a raw potentiometer reading onto the basket's left edge
#[inline]
pub fn pot_to_paddle_x(raw: u16) -> f32 {
    use consts::*;
    let t = f32::from(raw.min(POT_MAX)) / f32::from(POT_MAX);
    t * (SCREEN_WIDTH - PLAYER_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use consts::*;

    #[test]
    fn test_pot_to_paddle_x_bounds() {
        assert_eq!(pot_to_paddle_x(0), 0.0);
        assert!((pot_to_paddle_x(POT_MAX) - (SCREEN_WIDTH - PLAYER_WIDTH)).abs() < 0.001);
        // Out-of-range readings saturate
        assert_eq!(pot_to_paddle_x(u16::MAX), pot_to_paddle_x(POT_MAX));
    }
}
