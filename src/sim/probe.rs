//! Probe-point collision detection
//!
//! A ball is approximated by a few rings of sample points instead of an exact
//! circle/rectangle intersection. A hit is declared as soon as any probe lands
//! inside a visible obstacle. Fast, small balls can skip over thin obstacles
//! between frames; that is accepted.

use glam::Vec2;

use super::obstacle::Obstacle;
use super::projectile::Projectile;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Where a probe touched an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Index into [`ProbeSet::offsets`]
    pub probe: usize,
    /// World-space probe position
    pub point: Vec2,
}

/// Unit-radius probe offsets, scaled by the ball radius at test time
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSet {
    offsets: Vec<Vec2>,
}

impl Default for ProbeSet {
    fn default() -> Self {
        Self::new(crate::consts::PROBE_DIRECTIONS, &crate::consts::PROBE_RING_SCALES)
    }
}

impl ProbeSet {
    /// `directions` evenly spaced angles starting at 0°, repeated for every ring
    pub fn new(directions: usize, ring_scales: &[f32]) -> Self {
        let step = std::f32::consts::TAU / directions.max(1) as f32;
        let offsets = ring_scales
            .iter()
            .flat_map(|&scale| {
                (0..directions).map(move |i| polar_to_cartesian(scale, i as f32 * step))
            })
            .collect();
        Self { offsets }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.probe_directions, &tuning.probe_ring_scales)
    }

    pub fn offsets(&self) -> &[Vec2] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// World-space probe points for a ball at `center`
    pub fn points(&self, center: Vec2, radius: f32) -> impl Iterator<Item = Vec2> + '_ {
        self.offsets.iter().map(move |&o| center + o * radius)
    }

    /// First probe of `projectile` inside `obstacle`, if any
    pub fn probe(&self, projectile: &Projectile, obstacle: &Obstacle) -> Option<ProbeHit> {
        if !obstacle.visible || !projectile.active {
            return None;
        }
        self.points(projectile.pos, projectile.radius)
            .enumerate()
            .find(|&(_, p)| obstacle.rect.contains(p))
            .map(|(probe, point)| ProbeHit { probe, point })
    }

    #[inline]
    pub fn collides(&self, projectile: &Projectile, obstacle: &Obstacle) -> bool {
        self.probe(projectile, obstacle).is_some()
    }
}
