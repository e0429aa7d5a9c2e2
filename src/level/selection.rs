//! Item selection policy
//!
//! Decides whether the next additional spawn is a correct item or a
//! distractor. The wrong-answer percentage is the difficulty knob; the
//! fallback chain guarantees a candidate always exists for valid levels.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::progress::ProgressTracker;
use crate::settings::GameplaySettings;

/// A chosen label and the category it will fall under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub text: String,
    pub category: String,
}

/// Choose the next label.
///
/// 1. Candidates are the correct items neither caught nor scheduled.
/// 2. Roll `r` in [0, 1); a roll at or above the wrong fraction picks a
///    candidate under the target category.
/// 3. Otherwise pick a distractor under its own category.
/// 4. With no distractors, fall back to the candidates, then to any correct
///    item.
///
/// Returns `None` only for a level without correct items, which
/// `LevelDefinition` refuses to build.
pub fn choose_category_and_item<R: Rng + ?Sized>(
    tracker: &ProgressTracker,
    settings: &GameplaySettings,
    rng: &mut R,
) -> Option<Pick> {
    let level = tracker.level();
    let target = level.target_category();
    let remaining = tracker.unscheduled_items();

    let roll: f64 = rng.random();
    if !remaining.is_empty() && roll >= settings.wrong_fraction() {
        return remaining.choose(rng).map(|text| Pick {
            text: (*text).to_string(),
            category: target.to_string(),
        });
    }

    if let Some(distractor) = level.wrong_items().choose(rng) {
        return Some(Pick {
            text: distractor.text.clone(),
            category: distractor.category.clone(),
        });
    }

    let fallback = remaining
        .choose(rng)
        .copied()
        .or_else(|| level.correct_items().choose(rng).map(String::as_str))?;
    Some(Pick {
        text: fallback.to_string(),
        category: target.to_string(),
    })
}
