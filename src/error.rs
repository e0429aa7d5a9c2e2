//! Content errors
//!
//! Gameplay itself never fails: misses, duplicate catches and empty queues
//! are ordinary states. Only content loading and validation return errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("level {level_number} of game {game_id} is unavailable")]
    LevelUnavailable { game_id: u32, level_number: u32 },
    #[error("game {game_id} is not in the content store")]
    UnknownGame { game_id: u32 },
    #[error("level {level_number} has no correct items and can never be completed")]
    NoCorrectItems { level_number: u32 },
    #[error("level {level_number} lists '{item}' as both correct and wrong")]
    OverlappingItems { level_number: u32, item: String },
    #[error("failed to read content pack {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("content pack {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ContentError {
    /// True when the driver should treat the error as "no such level"
    /// rather than as broken content.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ContentError::LevelUnavailable { .. } | ContentError::UnknownGame { .. }
        )
    }
}
