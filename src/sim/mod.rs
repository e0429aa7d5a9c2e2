//! Deterministic simulation module
//!
//! The game loop lives here. This module must be pure and deterministic:
//! - Caller-supplied clock only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, item_missed, paddle_item_collision};
pub use state::{FallingItem, GameEvent, GamePhase, GameState, Paddle, level_seed};
pub use tick::{TickInput, tick};
