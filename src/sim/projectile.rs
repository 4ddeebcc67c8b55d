//! Projectiles and the fixed-step trajectory integrator
//!
//! One call to [`Projectile::integrate`] is one rendered frame. There is no
//! variable dt: velocities are pixels per frame and gravity is pixels per
//! frame².

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// A ball: the main shot or one of its split fragments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Per-frame velocity damping (0, 1]
    pub friction: f32,
    /// Bounce/hit damping (0, 1]
    pub elasticity: f32,
    /// Cosmetic spin (degrees)
    pub rotation: f32,
    /// Shrunk by the split power-up
    pub is_split: bool,
    /// Cleared once the ball comes to rest on the ground
    pub active: bool,
    /// Settled on the ground: no more bouncing, gravity is cancelled by support
    #[serde(default)]
    pub resting: bool,
    /// Upward speed of the previous ground rebound
    #[serde(default)]
    pub last_rebound: Option<f32>,
}

impl Projectile {
    pub fn new(pos: Vec2, radius: f32, friction: f32, elasticity: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            friction,
            elasticity,
            rotation: 0.0,
            is_split: false,
            active: true,
            resting: false,
            last_rebound: None,
        }
    }

    /// Fresh main ball sitting on the slingshot anchor
    pub fn at_anchor(anchor: Vec2, tuning: &Tuning) -> Self {
        Self::new(
            anchor,
            tuning.ball_radius,
            tuning.friction,
            tuning.elasticity,
        )
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Whether a point lies inside the ball (used to grab it)
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.pos.distance_squared(p) <= self.radius * self.radius
    }

    /// Shrink and flag as split
    pub fn shrink_for_split(&mut self, scale: f32) {
        self.radius *= scale;
        self.is_split = true;
    }

    /// Advance one frame against a ground plane at `ground_y`
    pub fn integrate(&mut self, ground_y: f32, tuning: &Tuning) {
        if !self.active {
            return;
        }

        // Ground dropped away (viewport grew): fall again
        if self.resting && ground_y - (self.pos.y + self.radius) > tuning.rest_epsilon {
            self.resting = false;
            self.last_rebound = None;
        }

        // Ground contact
        if self.pos.y + self.radius > ground_y {
            self.pos.y = ground_y - self.radius;
            if !self.resting {
                self.vel.y *= -self.elasticity;
                self.settle_if_stalled();
            }
        }

        // Position first, then gravity
        self.pos += self.vel;
        if !self.resting {
            self.vel.y += tuning.gravity;
        }

        self.vel *= self.friction;
        self.rotation = (self.rotation + tuning.rotation_step) % 360.0;

        let eps = tuning.rest_epsilon;
        let gap = ground_y - (self.pos.y + self.radius);
        if self.vel.x.abs() < eps && self.vel.y.abs() < eps && gap <= self.radius {
            self.active = false;
            log::debug!("Projectile came to rest at ({:.1}, {:.1})", self.pos.x, self.pos.y);
        }
    }

    /// Clamping to the ground injects a little energy every bounce, so the
    /// discrete scheme ends in a bounce of constant height. Once a rebound is
    /// no slower than the last one the ball is treated as lying on the ground.
    fn settle_if_stalled(&mut self) {
        let rebound = self.vel.y.abs();
        if self.last_rebound.is_some_and(|last| rebound >= last) {
            self.resting = true;
            self.vel.y = 0.0;
        }
        self.last_rebound = Some(rebound);
    }
}

/// Ballistic aim preview: `steps` points starting at `pos`, gravity only
pub fn predict_trajectory(pos: Vec2, vel: Vec2, gravity: f32, steps: usize) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(steps);
    let mut p = pos;
    let mut v = vel;
    for _ in 0..steps {
        points.push(p);
        p += v;
        v.y += gravity;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GROUND: f32 = 450.0;

    fn ball(pos: Vec2, vel: Vec2) -> Projectile {
        let mut b = Projectile::new(pos, 40.0, 0.99, 0.9);
        b.vel = vel;
        b
    }

    #[test]
    fn test_gravity_applied_after_position() {
        let tuning = Tuning::default();
        let mut b = ball(Vec2::new(100.0, 100.0), Vec2::ZERO);
        b.integrate(GROUND, &tuning);
        // Position unchanged on the first frame from rest
        assert_eq!(b.pos, Vec2::new(100.0, 100.0));
        assert!((b.vel.y - 0.99).abs() < 1e-6);
        assert_eq!(b.rotation, 5.0);
    }

    #[test]
    fn test_friction_damps_both_axes() {
        let tuning = Tuning::default();
        let mut b = ball(Vec2::new(100.0, 100.0), Vec2::new(10.0, -10.0));
        b.integrate(GROUND, &tuning);
        assert_eq!(b.pos, Vec2::new(110.0, 90.0));
        assert!((b.vel.x - 9.9).abs() < 1e-5);
        assert!((b.vel.y - (-9.0 * 0.99)).abs() < 1e-5);
    }

    #[test]
    fn test_ground_bounce_clamps_and_reflects() {
        let tuning = Tuning::default();
        let mut b = ball(Vec2::new(100.0, GROUND - 30.0), Vec2::new(0.0, 20.0));
        b.integrate(GROUND, &tuning);
        // Clamped to GROUND - r, reflected to -18, moved, then gravity/friction
        assert!((b.pos.y - (GROUND - 40.0 - 18.0)).abs() < 1e-4);
        assert!((b.vel.y - (-17.0 * 0.99)).abs() < 1e-4);
        assert!(b.last_rebound.is_some_and(|r| (r - 18.0).abs() < 1e-4));
        assert!(b.active);
    }

    #[test]
    fn test_resting_ball_deactivates() {
        let tuning = Tuning::default();
        let mut b = ball(Vec2::new(100.0, GROUND - 40.0), Vec2::new(0.05, 0.0));
        b.resting = true;
        b.integrate(GROUND, &tuning);
        assert!(!b.active);
    }

    #[test]
    fn test_resting_ball_falls_when_ground_drops() {
        let tuning = Tuning::default();
        let mut b = ball(Vec2::new(100.0, GROUND - 40.0), Vec2::new(2.0, 0.0));
        b.resting = true;
        b.last_rebound = Some(0.5);

        let lower = GROUND + 200.0;
        b.integrate(lower, &tuning);
        assert!(!b.resting);
        assert!(b.vel.y > 0.0);
        assert!(b.active);

        // Lands on the new ground and settles there
        let mut ticks = 0;
        while b.active && ticks < 5000 {
            b.integrate(lower, &tuning);
            ticks += 1;
        }
        assert!(!b.active);
        assert!(lower - (b.pos.y + b.radius) <= b.radius);
    }

    #[test]
    fn test_slow_ball_in_air_stays_active() {
        let tuning = Tuning::default();
        let mut b = ball(Vec2::new(100.0, 100.0), Vec2::new(0.0, -0.99));
        b.integrate(GROUND, &tuning);
        // Nearly zero velocity at the apex, but far from the ground
        assert!(b.vel.length() < 0.1);
        assert!(b.active);
    }

    #[test]
    fn test_inactive_ball_is_frozen() {
        let tuning = Tuning::default();
        let mut b = ball(Vec2::new(100.0, 100.0), Vec2::new(5.0, 5.0));
        b.active = false;
        let before = b.clone();
        b.integrate(GROUND, &tuning);
        assert_eq!(b, before);
    }

    #[test]
    fn test_predict_trajectory() {
        let points = predict_trajectory(Vec2::ZERO, Vec2::new(2.0, -3.0), 1.0, 4);
        assert_eq!(
            points,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(2.0, -3.0),
                Vec2::new(4.0, -5.0),
                Vec2::new(6.0, -6.0),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_integration_is_deterministic(
            x in 0.0f32..800.0, y in 0.0f32..400.0,
            vx in -40.0f32..40.0, vy in -40.0f32..40.0,
            friction in 0.9f32..1.0, elasticity in 0.1f32..1.0,
        ) {
            let tuning = Tuning::default();
            let mut a = Projectile::new(Vec2::new(x, y), 40.0, friction, elasticity);
            a.vel = Vec2::new(vx, vy);
            let mut b = a.clone();
            for _ in 0..300 {
                a.integrate(GROUND, &tuning);
                b.integrate(GROUND, &tuning);
                prop_assert_eq!(a.pos.x.to_bits(), b.pos.x.to_bits());
                prop_assert_eq!(a.pos.y.to_bits(), b.pos.y.to_bits());
                prop_assert_eq!(a.vel.x.to_bits(), b.vel.x.to_bits());
                prop_assert_eq!(a.vel.y.to_bits(), b.vel.y.to_bits());
            }
        }

        #[test]
        fn prop_ball_eventually_deactivates(
            x in 0.0f32..800.0, y in 0.0f32..400.0,
            vx in -40.0f32..40.0, vy in -40.0f32..40.0,
            elasticity in 0.1f32..=1.0,
        ) {
            let tuning = Tuning::default();
            let mut b = Projectile::new(Vec2::new(x, y), 40.0, 0.99, elasticity);
            b.vel = Vec2::new(vx, vy);
            let mut ticks = 0;
            while b.active && ticks < 5000 {
                b.integrate(GROUND, &tuning);
                ticks += 1;
            }
            prop_assert!(!b.active, "still moving after {} ticks: {:?}", ticks, b);
            prop_assert!(GROUND - (b.pos.y + b.radius) <= b.radius);
        }
    }
}
