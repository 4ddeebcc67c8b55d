//! Slingshot drag handling
//!
//! Turns a press/drag/release sequence on the main ball into a launch
//! velocity. The pull is measured per axis and the vertical component is
//! always taken as negative before the angle is applied, which is how the
//! game has always felt; do not "correct" it to true sling physics.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;

/// Derived aim for one drag position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Ball position after clamping to the pull circle
    pub pos: Vec2,
    /// Pull length (<= max distance)
    pub distance: f32,
    /// Direction from anchor to ball (radians)
    pub relative_angle: f32,
    pub launch_angle: f32,
    pub velocity: Vec2,
}

/// Compute the aim for a ball dragged to `pointer`
pub fn aim(anchor: Vec2, pointer: Vec2, max_distance: f32, multiplier: f32) -> Aim {
    let delta = anchor - pointer;
    let mut distance = delta.length();
    // atan2(0, 0) is 0, so a zero-length drag is well defined
    let relative_angle = delta.y.atan2(delta.x) + PI;
    let launch_angle = PI - relative_angle;

    let mut pos = pointer;
    if distance > max_distance {
        pos = anchor + crate::polar_to_cartesian(max_distance, relative_angle);
        distance = max_distance;
    }

    let vx = (pos.x - anchor.x).abs() / max_distance;
    let vy = -(pos.y - anchor.y).abs() / max_distance;
    let velocity = Vec2::new(vx * launch_angle.cos(), vy * launch_angle.sin()) * multiplier;

    Aim {
        pos,
        distance,
        relative_angle,
        launch_angle,
        velocity,
    }
}

/// Outcome of releasing the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Nothing was grabbed
    Idle,
    /// Ball left the anchor and is now in flight
    Launched,
    /// Ball was let go on the anchor and snapped back
    SnappedBack,
}

/// Grab state for the main ball
#[derive(Debug, Clone, Default)]
pub struct LaunchController {
    anchor: Vec2,
    max_distance: f32,
    multiplier: f32,
    /// Pointer offset from the ball center at grab time
    grab_offset: Option<Vec2>,
    aim: Option<Aim>,
}

impl LaunchController {
    pub fn new(anchor: Vec2, max_distance: f32, multiplier: f32) -> Self {
        Self {
            anchor,
            max_distance,
            multiplier,
            grab_offset: None,
            aim: None,
        }
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn is_dragging(&self) -> bool {
        self.grab_offset.is_some()
    }

    /// Current aim while dragging
    pub fn aim(&self) -> Option<&Aim> {
        self.aim.as_ref()
    }

    /// Grab the ball if the pointer is on it. Returns true on grab.
    pub fn press(&mut self, pointer: Vec2, ball: &Projectile) -> bool {
        if !ball.contains_point(pointer) {
            return false;
        }
        self.grab_offset = Some(pointer - ball.pos);
        self.aim = None;
        true
    }

    /// Follow the pointer, clamping the ball to the pull circle and updating
    /// its launch velocity
    pub fn drag(&mut self, pointer: Vec2, ball: &mut Projectile) {
        let Some(offset) = self.grab_offset else {
            return;
        };
        let aim = aim(self.anchor, pointer - offset, self.max_distance, self.multiplier);
        ball.pos = aim.pos;
        ball.vel = aim.velocity;
        self.aim = Some(aim);
    }

    /// Let go of the ball
    pub fn release(&mut self, ball: &mut Projectile) -> Release {
        if self.grab_offset.take().is_none() {
            return Release::Idle;
        }
        self.aim = None;
        if ball.pos != self.anchor {
            Release::Launched
        } else {
            ball.vel = Vec2::ZERO;
            Release::SnappedBack
        }
    }

    /// Drop any grab without launching
    pub fn cancel(&mut self) {
        self.grab_offset = None;
        self.aim = None;
    }
}
