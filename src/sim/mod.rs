//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame (wall-clock time only drives the level timer)
//! - No randomness
//! - Stable iteration order (main ball, then split fragments in spawn order)
//! - No rendering or platform dependencies

pub mod launch;
pub mod level;
pub mod obstacle;
pub mod probe;
pub mod projectile;
pub mod state;
pub mod tick;

pub use launch::{Aim, LaunchController, Release, aim};
pub use level::{Level, LevelDef, LevelState, builtin_levels};
pub use obstacle::{Obstacle, ObstacleDef, Rect};
pub use probe::{ProbeHit, ProbeSet};
pub use projectile::{Projectile, predict_trajectory};
pub use state::{GameState, ObstacleView, ProjectileView, Snapshot};
pub use tick::{TickInput, tick};
