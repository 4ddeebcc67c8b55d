//! Demo driver that plays the game through ordinary `TickInput`s
//!
//! Grabs the ball, drags it to a random point in the lower-left pull cone,
//! lets go, and sometimes buys a split mid-flight. Seeded, so a given seed
//! always plays the same game.

use std::f32::consts::PI;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::polar_to_cartesian;
use crate::sim::{LevelState, Snapshot, TickInput};

/// Frames spent dragging from the anchor to the pull point
const DRAG_FRAMES: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    /// Waiting for a ball on the slingshot
    Ready,
    /// Dragging toward `target`
    Aiming { target: Vec2, frame: u32 },
    /// Ball in flight; split after `split_in` frames if set
    Flying { split_in: Option<u32> },
}

#[derive(Debug, Clone)]
pub struct Autoplay {
    rng: Pcg32,
    phase: Phase,
    frame_dt: f32,
}

impl Autoplay {
    pub fn new(seed: u64, frame_dt: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Ready,
            frame_dt,
        }
    }

    /// Decide this frame's input from the last snapshot
    pub fn next_input(&mut self, snap: &Snapshot) -> TickInput {
        let mut input = TickInput::idle(self.frame_dt);

        match snap.level_state {
            LevelState::Failed => {
                log::info!("Autoplay retrying {}", snap.level_name);
                input.reset = true;
                self.phase = Phase::Ready;
                return input;
            }
            LevelState::Completed if !snap.launched => return input,
            _ => {}
        }

        match self.phase {
            Phase::Ready => {
                if snap.launched || snap.level_state != LevelState::Playing {
                    return input;
                }
                // Pull down and to the left so the shot goes up and right
                let angle = self.rng.random_range(0.55 * PI..0.95 * PI);
                let distance = self.rng.random_range(50.0..=100.0);
                let target = snap.anchor + polar_to_cartesian(distance, angle);

                input.pointer = snap.anchor;
                input.pressed = true;
                input.held = true;
                self.phase = Phase::Aiming { target, frame: 0 };
            }
            Phase::Aiming { target, frame } => {
                if !snap.dragging {
                    self.phase = Phase::Ready;
                    return input;
                }
                if frame < DRAG_FRAMES {
                    let t = (frame + 1) as f32 / DRAG_FRAMES as f32;
                    input.pointer = snap.anchor.lerp(target, t);
                    input.held = true;
                    self.phase = Phase::Aiming {
                        target,
                        frame: frame + 1,
                    };
                } else {
                    input.pointer = target;
                    input.released = true;
                    let split_in = (snap.split_affordable && self.rng.random_bool(0.5))
                        .then(|| self.rng.random_range(3..20));
                    self.phase = Phase::Flying { split_in };
                }
            }
            Phase::Flying { split_in } => {
                if !snap.launched {
                    self.phase = Phase::Ready;
                    return input;
                }
                self.phase = match split_in {
                    Some(0) => {
                        input.split = true;
                        Phase::Flying { split_in: None }
                    }
                    Some(n) => Phase::Flying {
                        split_in: Some(n - 1),
                    },
                    None => Phase::Flying { split_in: None },
                };
            }
        }

        input
    }
}
