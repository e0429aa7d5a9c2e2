//! Game state and core simulation types
//!
//! Everything the tick loop mutates lives here: the basket, the falling
//! labels, lives and score, and the active level attempt.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::content::ContentStore;
use crate::error::ContentError;
use crate::level::{LevelAttempt, SpawnEvent};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Labels falling, basket moving
    Playing,
    /// Game is paused
    Paused,
    /// Level cleared, waiting for the player to continue
    LevelUp,
    /// Last level cleared
    Won,
    /// Lives exhausted
    GameOver,
    /// The next level could not be loaded
    LevelUnavailable,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GamePhase::Won | GamePhase::GameOver | GamePhase::LevelUnavailable
        )
    }
}

/// Things that happened during a tick, drained by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32, target: String },
    Spawned { id: u32, text: String, category: String },
    Caught { text: String, points: u64 },
    CaughtWrong { text: String, lives: u8 },
    Missed { text: String, requeued: bool },
    LevelComplete { level: u32 },
    GameWon { score: u64 },
    GameOver { score: u64 },
    ContentFailed { level: u32, message: String },
}

/// The player's basket
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge (pixels)
    pub x: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (SCREEN_WIDTH - PLAYER_WIDTH) / 2.0, // Start centered
        }
    }
}

impl Paddle {
    /// Top edge (fixed)
    pub const Y: f32 = SCREEN_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN;

    /// Jump to a position (analog controller)
    pub fn set_x(&mut self, x: f32) {
        self.x = x.clamp(0.0, SCREEN_WIDTH - PLAYER_WIDTH);
    }

    /// Move toward a target left edge, at most `max_step` pixels
    pub fn move_toward(&mut self, target_x: f32, max_step: f32) {
        let delta = (target_x - self.x).clamp(-max_step, max_step);
        self.set_x(self.x + delta);
    }
}

/// A label falling down the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    pub text: String,
    pub category: String,
    /// Top-left corner
    pub pos: Vec2,
    /// Pixels per second, straight down
    pub speed: f32,
}

impl FallingItem {
    pub fn update(&mut self, dt_secs: f32) {
        self.pos.y += self.speed * dt_secs;
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(ITEM_WIDTH / 2.0, ITEM_HEIGHT / 2.0)
    }
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub game_id: u32,
    /// Current level number (1-based)
    pub level_number: u32,
    pub lives: u8,
    pub score: u64,
    /// Logical clock in milliseconds, advanced by the driver
    pub clock_ms: u64,
    pub phase: GamePhase,
    /// Help overlay open (shows remaining items, halves points)
    pub help_mode: bool,
    pub paddle: Paddle,
    /// Falling items (sorted by id)
    pub items: Vec<FallingItem>,
    /// Active level attempt
    pub attempt: LevelAttempt,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Placement RNG (spawn x/y); spawn decisions use the attempt's RNG
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Start a run at level 1 of `game_id`
    pub fn start(store: &dyn ContentStore, game_id: u32, seed: u64) -> Result<Self, ContentError> {
        let attempt = LevelAttempt::setup(store, game_id, 1, level_seed(seed, 1))?;
        let mut state = Self {
            seed,
            game_id,
            level_number: 1,
            lives: STARTING_LIVES,
            score: 0,
            clock_ms: 0,
            phase: GamePhase::Playing,
            help_mode: false,
            paddle: Paddle::default(),
            items: Vec::new(),
            attempt,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.events.push(GameEvent::LevelStarted {
            level: 1,
            target: state.attempt.target_category().to_string(),
        });
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Turn a spawn event into a falling item above the field
    pub fn spawn_item(&mut self, event: SpawnEvent) -> u32 {
        let id = self.next_entity_id();
        let x = self.rng.random_range(0.0..SCREEN_WIDTH - ITEM_WIDTH);
        let y = self.rng.random_range(ITEM_SPAWN_Y_MIN..ITEM_SPAWN_Y_MAX);
        let speed = self.attempt.settings().fall_speed_px_per_sec();
        self.events.push(GameEvent::Spawned {
            id,
            text: event.item_text.clone(),
            category: event.category.clone(),
        });
        self.items.push(FallingItem {
            id,
            text: event.item_text,
            category: event.category,
            pos: Vec2::new(x, y),
            speed,
        });
        id
    }

    /// Correct items still to collect, for the help overlay
    pub fn remaining_items(&self) -> Vec<&str> {
        self.attempt.remaining_items()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Lose a life; returns true when none are left
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    /// Ensure items are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.items.sort_by_key(|i| i.id);
    }
}

/// Per-level seed derived from the run seed
pub fn level_seed(seed: u64, level_number: u32) -> u64 {
    u64::from(level_number)
        .wrapping_mul(2_654_435_761)
        .wrapping_add(seed)
}
