//! Axis-aligned rectangular obstacles
//!
//! Obstacles are the destructible unit of play. They never move; a hit only
//! hides them until the level is reset.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Layout entry for one obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDef {
    pub rect: Rect,
    /// Palette index for the renderer; the simulation never reads it
    #[serde(default)]
    pub style: u32,
}

impl ObstacleDef {
    pub const fn new(rect: Rect, style: u32) -> Self {
        Self { rect, style }
    }
}

/// Runtime obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub style: u32,
    pub visible: bool,
}

impl Obstacle {
    pub fn from_def(def: &ObstacleDef) -> Self {
        Self {
            rect: def.rect,
            style: def.style,
            visible: true,
        }
    }

    /// Hide the obstacle. Returns true if it was visible before.
    pub fn destroy(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }
}
