//! Levels: data-driven obstacle layouts plus the score/state machine
//!
//! A [`LevelDef`] is static data (compiled in or loaded from JSON). A
//! [`Level`] is its runtime form; it is built once and only ever reset, never
//! recreated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleDef, Rect};
use super::probe::ProbeSet;
use super::projectile::Projectile;

/// Level progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelState {
    #[default]
    Playing,
    /// Target score reached (never reverts without a reset)
    Completed,
    /// Out of attempts before reaching the target
    Failed,
}

/// Static description of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub target_score: u32,
    pub obstacles: Vec<ObstacleDef>,
    /// Slingshot position for this level; the tuning anchor when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Vec2>,
}

/// A level in play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub target_score: u32,
    pub obstacles: Vec<Obstacle>,
    pub state: LevelState,
    pub anchor: Option<Vec2>,
    points_per_obstacle: u32,
}

impl Level {
    pub fn from_def(def: &LevelDef, points_per_obstacle: u32) -> Self {
        Self {
            name: def.name.clone(),
            target_score: def.target_score,
            obstacles: def.obstacles.iter().map(Obstacle::from_def).collect(),
            state: LevelState::Playing,
            anchor: def.anchor,
            points_per_obstacle,
        }
    }

    /// Show every obstacle again and go back to `Playing`
    pub fn reset(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.visible = true;
        }
        self.state = LevelState::Playing;
    }

    pub fn destroyed_count(&self) -> usize {
        self.obstacles.iter().filter(|o| !o.visible).count()
    }

    pub fn visible_count(&self) -> usize {
        self.obstacles.len() - self.destroyed_count()
    }

    /// Points earned in this level so far
    pub fn score(&self) -> u32 {
        self.destroyed_count() as u32 * self.points_per_obstacle
    }

    pub fn max_score(&self) -> u32 {
        self.obstacles.len() as u32 * self.points_per_obstacle
    }

    pub fn points_per_obstacle(&self) -> u32 {
        self.points_per_obstacle
    }

    /// Hide every visible obstacle the projectile's probes touch, damping the
    /// projectile's horizontal speed once per hit. Returns how many were hidden.
    pub fn resolve_collisions(&mut self, projectile: &mut Projectile, probes: &ProbeSet) -> u32 {
        let mut hits = 0;
        for (idx, obstacle) in self.obstacles.iter_mut().enumerate() {
            if probes.collides(projectile, obstacle) && obstacle.destroy() {
                projectile.vel.x *= projectile.elasticity;
                hits += 1;
                log::debug!("{}: obstacle {} destroyed", self.name, idx);
            }
        }
        hits
    }

    /// `Playing -> Completed` once the target is met. Returns true on the transition.
    pub fn check_completion(&mut self) -> bool {
        if self.state == LevelState::Playing && self.score() >= self.target_score {
            self.state = LevelState::Completed;
            log::info!("{} completed with {} points", self.name, self.score());
            return true;
        }
        false
    }

    /// `Playing -> Failed`. Returns true on the transition.
    pub fn fail(&mut self) -> bool {
        if self.state == LevelState::Playing {
            self.state = LevelState::Failed;
            log::info!("{} failed with {}/{} points", self.name, self.score(), self.target_score);
            return true;
        }
        false
    }
}

// ----------------------------------------------------------------------------
// Built-in layouts
// ----------------------------------------------------------------------------

/// Style ids handed to the renderer
pub mod style {
    pub const GREEN: u32 = 0;
    pub const YELLOW: u32 = 1;
    pub const RED: u32 = 2;
    pub const BLUE: u32 = 3;
    pub const PURPLE: u32 = 4;
}

/// Stacked "Π" frames: two posts and a lintel per storey
fn stacked_frames(x: f32, top: f32, storeys: usize) -> Vec<ObstacleDef> {
    (0..storeys)
        .flat_map(|i| {
            let y = top + 130.0 * i as f32;
            [
                ObstacleDef::new(Rect::new(x, y + 30.0, 30.0, 100.0), style::GREEN),
                ObstacleDef::new(Rect::new(x + 150.0, y + 30.0, 30.0, 100.0), style::YELLOW),
                ObstacleDef::new(Rect::new(x, y, 180.0, 30.0), style::RED),
            ]
        })
        .collect()
}

/// Grid of equal bricks resting on `ground_y`
fn brick_wall(x: f32, ground_y: f32, cols: usize, rows: usize, w: f32, h: f32) -> Vec<ObstacleDef> {
    (0..rows)
        .flat_map(|row| {
            (0..cols).map(move |col| {
                let rect = Rect::new(
                    x + col as f32 * (w + 30.0),
                    ground_y - h * (row + 1) as f32,
                    w,
                    h,
                );
                let palette = if (row + col) % 2 == 0 { style::BLUE } else { style::YELLOW };
                ObstacleDef::new(rect, palette)
            })
        })
        .collect()
}

/// Stepped pyramid with `base` blocks on the bottom row
fn pyramid(x: f32, ground_y: f32, base: usize, size: f32) -> Vec<ObstacleDef> {
    let gap = 5.0;
    (0..base)
        .flat_map(|row| {
            let count = base - row;
            let left = x + row as f32 * (size + gap) / 2.0;
            let y = ground_y - (size + gap) * (row + 1) as f32 + gap;
            (0..count).map(move |i| {
                let rect = Rect::new(left + i as f32 * (size + gap), y, size, size);
                ObstacleDef::new(rect, if row % 2 == 0 { style::PURPLE } else { style::RED })
            })
        })
        .collect()
}

/// The compiled-in level table, laid out for an 800x450 viewport
pub fn builtin_levels() -> Vec<LevelDef> {
    let ground = crate::consts::SCREEN_HEIGHT;
    vec![
        LevelDef {
            name: "Level 1: Frames".to_string(),
            target_score: 60,
            obstacles: stacked_frames(550.0, 60.0, 3),
            anchor: None,
        },
        LevelDef {
            name: "Level 2: Wall".to_string(),
            target_score: 100,
            obstacles: brick_wall(560.0, ground, 2, 5, 50.0, 80.0),
            anchor: None,
        },
        LevelDef {
            name: "Level 3: Pyramid".to_string(),
            target_score: 80,
            obstacles: pyramid(500.0, ground, 4, 40.0),
            anchor: Some(Vec2::new(150.0, 250.0)),
        },
    ]
}
