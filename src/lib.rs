//! Slingshot - physics core for a drag-aim-release projectile game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integrator, probe collisions, levels, launch)
//! - `tuning`: Data-driven game balance and level tables
//! - `autoplay`: Seeded demo driver that plays the game through `TickInput`s
//!
//! Rendering, audio and input devices live outside this crate. A frontend
//! feeds one [`sim::TickInput`] per frame and draws the returned
//! [`sim::Snapshot`].

pub mod autoplay;
pub mod error;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Downward acceleration, pixels per frame²
    pub const GRAVITY: f32 = 1.0;
    /// Launch speed at full pull, pixels per frame
    pub const VELOCITY_MULTIPLIER: f32 = 40.0;
    /// Maximum drag distance from the anchor
    pub const LAUNCH_MAX_DISTANCE: f32 = 100.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 40.0;
    pub const BALL_FRICTION: f32 = 0.99;
    pub const BALL_ELASTICITY: f32 = 0.9;
    /// Cosmetic spin per frame (degrees)
    pub const BALL_ROTATION_STEP: f32 = 5.0;
    /// Speed below which a grounded ball goes to sleep
    pub const REST_EPSILON: f32 = 0.1;

    /// Slingshot anchor (ball start position)
    pub const ANCHOR_X: f32 = 200.0;
    pub const ANCHOR_Y: f32 = 200.0;

    /// Default viewport (ground plane sits at the bottom edge)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 450.0;

    /// Probe ring: unique directions around the circumference
    pub const PROBE_DIRECTIONS: usize = 8;
    /// Probe ring radii as fractions of the ball radius
    pub const PROBE_RING_SCALES: [f32; 2] = [1.0, 0.5];

    /// Scoring
    pub const POINTS_PER_OBSTACLE: u32 = 10;
    pub const ATTEMPTS_PER_LEVEL: u32 = 3;
    /// Wall-clock delay before moving on from a completed level
    pub const COMPLETION_DELAY_SECS: f32 = 2.0;

    /// Split power-up
    pub const SPLIT_COST: u32 = 50;
    pub const SPLIT_SCALE: f32 = 0.7;
    pub const SPLIT_ANGLE_DEG: f32 = 30.0;

    /// Aim preview length (frames)
    pub const PREVIEW_STEPS: usize = 50;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Rotate a vector by `angle` radians (counter-clockwise in math coordinates)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
