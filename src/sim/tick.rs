//! Fixed timestep simulation tick
//!
//! Advances one logical frame: moves the basket and the falling labels,
//! polls the active level attempt for due spawns, resolves catches and
//! misses, and moves between levels.

use std::cmp::Ordering;

use super::collision::{item_missed, paddle_item_collision};
use super::state::{FallingItem, GameEvent, GamePhase, GameState, Paddle, level_seed};
use crate::consts::*;
use crate::content::ContentStore;
use crate::level::LevelAttempt;
use crate::pot_to_paddle_x;

/// Height above the basket where autoplay starts dodging distractors
const DODGE_HEIGHT: f32 = 180.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard target for the basket's left edge (moves at basket speed)
    pub paddle_target_x: Option<f32>,
    /// Raw analog controller reading (basket jumps to the mapped position)
    pub pot_reading: Option<u16>,
    /// Toggle the help overlay
    pub toggle_help: bool,
    /// Pause toggle
    pub pause: bool,
    /// Continue after a level-up
    pub advance: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by `dt_ms` milliseconds
pub fn tick(state: &mut GameState, store: &dyn ContentStore, input: &TickInput, dt_ms: u64) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase == GamePhase::Paused || state.phase.is_terminal() {
        return;
    }

    // Idle/demo mode - AI plays the game
    let mut input = input.clone();
    if input.idle_mode {
        input.advance = true;
        input.paddle_target_x = autoplay_target(state).or(input.paddle_target_x);
    }
    let input = &input;

    if state.phase == GamePhase::LevelUp {
        if input.advance {
            log::info!("Continuing to level {}", state.level_number);
            state.phase = GamePhase::Playing;
        }
        return;
    }

    state.clock_ms += dt_ms;
    let now = state.clock_ms;
    let dt_secs = dt_ms as f32 / 1000.0;

    if input.toggle_help {
        state.help_mode = !state.help_mode;
    }

    // Update paddle position
    if let Some(raw) = input.pot_reading {
        state.paddle.set_x(pot_to_paddle_x(raw));
    } else if let Some(target) = input.paddle_target_x {
        let max_step = PLAYER_SPEED * FRAMES_PER_SECOND * dt_secs;
        state.paddle.move_toward(target, max_step);
    }

    for item in &mut state.items {
        item.update(dt_secs);
    }

    // Spawning: at most one item per tick
    state.attempt.refill_if_exhausted(now);
    let max_items = state.attempt.settings().max_items_on_screen as usize;
    if state.items.len() < max_items {
        if let Some(event) = state.attempt.should_spawn(now) {
            log::debug!("Spawning '{}' ({}) at {}ms", event.item_text, event.category, now);
            state.spawn_item(event);
        }
    }

    // Catches
    let paddle = state.paddle;
    let (caught, falling): (Vec<FallingItem>, Vec<FallingItem>) = std::mem::take(&mut state.items)
        .into_iter()
        .partition(|item| paddle_item_collision(&paddle, item));
    state.items = falling;

    for item in caught {
        if item.category == state.attempt.target_category() {
            if state.attempt.mark_caught(&item.text) {
                let points = if state.help_mode {
                    POINTS_PER_CATCH_HELP
                } else {
                    POINTS_PER_CATCH
                };
                state.score += points;
                state.events.push(GameEvent::Caught {
                    text: item.text,
                    points,
                });
            }
        } else {
            let out_of_lives = state.lose_life();
            log::debug!("Caught distractor '{}', {} lives left", item.text, state.lives);
            state.events.push(GameEvent::CaughtWrong {
                text: item.text,
                lives: state.lives,
            });
            if out_of_lives {
                game_over(state);
                return;
            }
        }
    }

    // Misses
    let (missed, falling): (Vec<FallingItem>, Vec<FallingItem>) = std::mem::take(&mut state.items)
        .into_iter()
        .partition(|item| item_missed(item));
    state.items = falling;

    for item in missed {
        let requeued = state.attempt.mark_missed(&item.text, &item.category);
        state.events.push(GameEvent::Missed {
            text: item.text,
            requeued,
        });
    }

    if state.attempt.is_level_complete() {
        finish_level(state, store);
    }

    state.normalize_order();
}

/// Lives exhausted: abandon the attempt
fn game_over(state: &mut GameState) {
    log::info!(
        "Game over on level {} with score {}",
        state.level_number,
        state.score
    );
    state.attempt.fail();
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver { score: state.score });
}

/// Level cleared: set up the next attempt, or end the run
fn finish_level(state: &mut GameState, store: &dyn ContentStore) {
    let finished = state.level_number;
    state.items.clear();
    state.events.push(GameEvent::LevelComplete { level: finished });

    let next = finished + 1;
    let past_last = store
        .last_level(state.game_id)
        .is_none_or(|last| next > last);
    if past_last {
        log::info!("Game {} won with score {}", state.game_id, state.score);
        state.phase = GamePhase::Won;
        state.events.push(GameEvent::GameWon { score: state.score });
        return;
    }

    match LevelAttempt::setup(store, state.game_id, next, level_seed(state.seed, next)) {
        Ok(attempt) => {
            log::info!("Level {} complete, next target '{}'", finished, attempt.target_category());
            state.events.push(GameEvent::LevelStarted {
                level: next,
                target: attempt.target_category().to_string(),
            });
            state.attempt = attempt;
            state.level_number = next;
            state.phase = GamePhase::LevelUp;
        }
        Err(err) => {
            log::warn!("Cannot continue past level {finished}: {err}");
            state.events.push(GameEvent::ContentFailed {
                level: next,
                message: err.to_string(),
            });
            state.phase = GamePhase::LevelUnavailable;
        }
    }
}

/// Autoplay: chase the lowest catchable correct label, otherwise step away
/// from a distractor about to land in the basket
fn autoplay_target(state: &GameState) -> Option<f32> {
    let target = state.attempt.target_category();
    let lowest = |a: &&FallingItem, b: &&FallingItem| {
        a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal)
    };
    let catchable = |item: &&FallingItem| item.pos.y < Paddle::Y + PLAYER_HEIGHT;

    if let Some(item) = state
        .items
        .iter()
        .filter(|i| i.category == target)
        .filter(catchable)
        .max_by(lowest)
    {
        return Some(item.center().x - PLAYER_WIDTH / 2.0);
    }

    let threat = state
        .items
        .iter()
        .filter(|i| i.category != target)
        .filter(catchable)
        .filter(|i| i.pos.y > Paddle::Y - DODGE_HEIGHT)
        .max_by(lowest)?;
    Some(if threat.center().x > SCREEN_WIDTH / 2.0 {
        0.0
    } else {
        SCREEN_WIDTH - PLAYER_WIDTH
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{LevelDefinition, MemoryContentStore};
    use glam::Vec2;

    fn store() -> MemoryContentStore {
        let mut store = MemoryContentStore::new();
        store.insert_level(1, LevelDefinition::new(1, "Temel", ["Kütle", "Zaman"], ["Hız"]).unwrap());
        store.insert_level(1, LevelDefinition::new(2, "Vektörel", ["Hız"], ["Kütle"]).unwrap());
        store
    }

    /// Put a label right on top of the basket
    fn drop_on_paddle(state: &mut GameState, text: &str, category: &str) {
        let id = state.next_entity_id();
        state.items.push(FallingItem {
            id,
            text: text.into(),
            category: category.into(),
            pos: Vec2::new(state.paddle.x, Paddle::Y - ITEM_HEIGHT + 5.0),
            speed: 0.0,
        });
    }

    #[test]
    fn test_first_tick_spawns_first_item() {
        let store = store();
        let mut state = GameState::start(&store, 1, 12345).unwrap();
        assert!(state.items.is_empty());

        tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        assert_eq!(state.clock_ms, FRAME_MS);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].text, "Kütle");
        assert!(state.items[0].pos.y < 0.0);
    }

    #[test]
    fn test_tick_pause() {
        let store = store();
        let mut state = GameState::start(&store, 1, 12345).unwrap();
        tick(&mut state, &store, &TickInput::default(), FRAME_MS);

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &store, &input, FRAME_MS);
        assert_eq!(state.phase, GamePhase::Paused);

        // Clock frozen while paused
        let clock = state.clock_ms;
        tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        assert_eq!(state.clock_ms, clock);

        // Unpause
        tick(&mut state, &store, &input, FRAME_MS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.clock_ms, clock + FRAME_MS);
    }

    #[test]
    fn test_catch_correct_scores() {
        let store = store();
        let mut state = GameState::start(&store, 1, 1).unwrap();
        drop_on_paddle(&mut state, "Zaman", "Temel");

        tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        assert_eq!(state.score, POINTS_PER_CATCH);
        assert!(state.attempt.progress().caught().contains("Zaman"));
        assert!(state.items.iter().all(|i| i.text != "Zaman"));
    }

    #[test]
    fn test_help_mode_halves_points() {
        let store = store();
        let mut state = GameState::start(&store, 1, 1).unwrap();
        drop_on_paddle(&mut state, "Zaman", "Temel");

        let input = TickInput {
            toggle_help: true,
            ..Default::default()
        };
        tick(&mut state, &store, &input, FRAME_MS);
        assert!(state.help_mode);
        assert_eq!(state.score, POINTS_PER_CATCH_HELP);
        assert_eq!(state.remaining_items(), ["Kütle"]);
    }

    #[test]
    fn test_catch_wrong_costs_life() {
        let store = store();
        let mut state = GameState::start(&store, 1, 2).unwrap();
        for _ in 0..STARTING_LIVES {
            drop_on_paddle(&mut state, "Hız", WRONG_CATEGORY);
            tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(state.lives, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { score: 0 }));

        // Terminal: nothing moves any more
        let clock = state.clock_ms;
        tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        assert_eq!(state.clock_ms, clock);
    }

    #[test]
    fn test_miss_requeues_correct_item() {
        let store = store();
        let mut state = GameState::start(&store, 1, 3).unwrap();
        let id = state.next_entity_id();
        state.items.push(FallingItem {
            id,
            text: "Zaman".into(),
            category: "Temel".into(),
            pos: Vec2::new(0.0, SCREEN_HEIGHT + MISS_MARGIN + 1.0),
            speed: 0.0,
        });

        tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        assert!(state.events.contains(&GameEvent::Missed {
            text: "Zaman".into(),
            requeued: true,
        }));
        assert_eq!(state.attempt.progress().respawn_queue(), ["Zaman"]);
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_level_up_then_continue() {
        let store = store();
        let mut state = GameState::start(&store, 1, 4).unwrap();
        state.attempt.mark_caught("Kütle");
        drop_on_paddle(&mut state, "Zaman", "Temel");

        tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.level_number, 2);
        assert_eq!(state.attempt.target_category(), "Vektörel");
        assert!(state.items.is_empty());

        // Waits for the player
        tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::LevelUp);

        let input = TickInput {
            advance: true,
            ..Default::default()
        };
        tick(&mut state, &store, &input, FRAME_MS);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_level_wins() {
        let store = store();
        let mut state = GameState::start(&store, 1, 5).unwrap();
        state.attempt = LevelAttempt::setup(&store, 1, 2, 0).unwrap();
        state.level_number = 2;
        drop_on_paddle(&mut state, "Hız", "Vektörel");

        tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.events.contains(&GameEvent::GameWon { score: POINTS_PER_CATCH }));
    }

    #[test]
    fn test_gap_in_levels_is_unavailable() {
        let mut store = MemoryContentStore::new();
        store.insert_level(1, LevelDefinition::new(1, "Temel", ["Kütle"], ["Hız"]).unwrap());
        store.insert_level(1, LevelDefinition::new(3, "Skaler", ["Zaman"], ["Hız"]).unwrap());
        let mut state = GameState::start(&store, 1, 6).unwrap();
        drop_on_paddle(&mut state, "Kütle", "Temel");

        tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::LevelUnavailable);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ContentFailed { level: 2, .. }))
        );
    }

    #[test]
    fn test_paddle_inputs() {
        let store = store();
        let mut state = GameState::start(&store, 1, 7).unwrap();
        let start_x = state.paddle.x;

        let input = TickInput {
            paddle_target_x: Some(0.0),
            ..Default::default()
        };
        tick(&mut state, &store, &input, FRAME_MS);
        let step = PLAYER_SPEED * FRAMES_PER_SECOND * FRAME_MS as f32 / 1000.0;
        assert!((state.paddle.x - (start_x - step)).abs() < 0.001);

        let input = TickInput {
            pot_reading: Some(POT_MAX),
            ..Default::default()
        };
        tick(&mut state, &store, &input, FRAME_MS);
        assert_eq!(state.paddle.x, SCREEN_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_spawning_respects_max_items() {
        let store = store();
        let mut state = GameState::start(&store, 1, 8).unwrap();
        for _ in 0..4 {
            drop_on_paddle(&mut state, "x", "y");
            state.items.last_mut().unwrap().pos = Vec2::new(0.0, -500.0);
        }
        // Five on screen after the first spawn
        tick(&mut state, &store, &TickInput::default(), FRAME_MS);
        assert_eq!(state.items.len(), 5);

        // Second event is due but the screen is full
        tick(&mut state, &store, &TickInput::default(), 1_500);
        assert_eq!(state.items.len(), 5);
        assert_eq!(state.attempt.batch().next_index(), 1);
    }

    #[test]
    fn test_one_spawn_per_tick_after_backlog() {
        let store = store();
        let mut state = GameState::start(&store, 1, 9).unwrap();
        let due = state.attempt.prepare_batch(3, 3, 0).events().len();
        assert_eq!(due, 3);

        // Every event is overdue; they still come out one frame at a time
        state.clock_ms = 10_000;
        for spawned in 1..=due {
            tick(&mut state, &store, &TickInput::default(), FRAME_MS);
            assert_eq!(state.attempt.batch().next_index(), spawned);
            assert_eq!(state.items.len(), spawned);
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let store = store();
        let mut state1 = GameState::start(&store, 1, 99999).unwrap();
        let mut state2 = GameState::start(&store, 1, 99999).unwrap();

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state1, &store, &input, FRAME_MS);
            tick(&mut state2, &store, &input, FRAME_MS);
        }

        assert_eq!(state1.clock_ms, state2.clock_ms);
        assert_eq!(state1.events, state2.events);
        assert_eq!(state1.items.len(), state2.items.len());
        assert!((state1.paddle.x - state2.paddle.x).abs() < 0.0001);
    }
}
