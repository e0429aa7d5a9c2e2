//! Collision checks between the basket and falling labels
//!
//! Both shapes are axis-aligned rectangles anchored at their top-left corner.

use glam::Vec2;

use super::state::{FallingItem, Paddle};
use crate::consts::*;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Overlap test; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

pub fn paddle_rect(paddle: &Paddle) -> Rect {
    Rect::new(
        Vec2::new(paddle.x, Paddle::Y),
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
    )
}

pub fn item_rect(item: &FallingItem) -> Rect {
    Rect::new(item.pos, Vec2::new(ITEM_WIDTH, ITEM_HEIGHT))
}

/// Check if the basket caught an item
pub fn paddle_item_collision(paddle: &Paddle, item: &FallingItem) -> bool {
    paddle_rect(paddle).intersects(&item_rect(item))
}

/// Check if an item fell past the bottom edge
pub fn item_missed(item: &FallingItem) -> bool {
    item.pos.y > SCREEN_HEIGHT + MISS_MARGIN
}
