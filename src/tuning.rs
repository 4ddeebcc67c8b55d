//! Game balance and level tables
//!
//! Every gameplay constant the simulation reads lives in [`Tuning`], so a
//! frontend can ship a JSON file instead of recompiling. Missing fields fall
//! back to [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::LevelDef;

/// Physics and gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    /// Added to vertical velocity every frame (after the position update)
    pub gravity: f32,
    /// Per-frame velocity damping, both axes (0, 1]
    pub friction: f32,
    /// Ground bounce and obstacle hit damping (0, 1]
    pub elasticity: f32,
    /// Speed (per axis) below which a grounded ball deactivates
    pub rest_epsilon: f32,
    /// Cosmetic spin per frame (degrees)
    pub rotation_step: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Slingshot anchor; the ball starts and snaps back here
    pub anchor: Vec2,

    // === Launch ===
    pub launch_max_distance: f32,
    pub velocity_multiplier: f32,
    /// Frames of trajectory shown while aiming
    pub preview_steps: usize,

    // === Collision probes ===
    /// Evenly spaced directions around the circumference
    pub probe_directions: usize,
    /// Ring radii as fractions of the ball radius
    pub probe_ring_scales: Vec<f32>,

    // === Scoring ===
    pub points_per_obstacle: u32,
    pub attempts_per_level: u32,
    pub completion_delay_secs: f32,

    // === Split power-up ===
    pub split_cost: u32,
    pub split_scale: f32,
    pub split_angle_deg: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: BALL_FRICTION,
            elasticity: BALL_ELASTICITY,
            rest_epsilon: REST_EPSILON,
            rotation_step: BALL_ROTATION_STEP,

            ball_radius: BALL_RADIUS,
            anchor: Vec2::new(ANCHOR_X, ANCHOR_Y),

            launch_max_distance: LAUNCH_MAX_DISTANCE,
            velocity_multiplier: VELOCITY_MULTIPLIER,
            preview_steps: PREVIEW_STEPS,

            probe_directions: PROBE_DIRECTIONS,
            probe_ring_scales: PROBE_RING_SCALES.to_vec(),

            points_per_obstacle: POINTS_PER_OBSTACLE,
            attempts_per_level: ATTEMPTS_PER_LEVEL,
            completion_delay_secs: COMPLETION_DELAY_SECS,

            split_cost: SPLIT_COST,
            split_scale: SPLIT_SCALE,
            split_angle_deg: SPLIT_ANGLE_DEG,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value <= 1.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidTuning {
                    field,
                    reason: format!("{value} is outside (0, 1]"),
                })
            }
        }
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::InvalidTuning {
                    field,
                    reason: format!("{value} must be positive"),
                })
            }
        }

        unit_interval("friction", self.friction)?;
        unit_interval("elasticity", self.elasticity)?;
        unit_interval("split_scale", self.split_scale)?;
        positive("ball_radius", self.ball_radius)?;
        positive("launch_max_distance", self.launch_max_distance)?;
        positive("rest_epsilon", self.rest_epsilon)?;
        positive("gravity", self.gravity)?;
        positive("velocity_multiplier", self.velocity_multiplier)?;

        if !(self.completion_delay_secs >= 0.0 && self.completion_delay_secs.is_finite()) {
            return Err(ConfigError::InvalidTuning {
                field: "completion_delay_secs",
                reason: format!("{} must be a non-negative number of seconds", self.completion_delay_secs),
            });
        }
        if !self.split_angle_deg.is_finite() {
            return Err(ConfigError::InvalidTuning {
                field: "split_angle_deg",
                reason: format!("{} is not a finite angle", self.split_angle_deg),
            });
        }

        if self.probe_directions == 0 {
            return Err(ConfigError::InvalidTuning {
                field: "probe_directions",
                reason: "at least one direction is required".to_string(),
            });
        }
        if self.probe_ring_scales.is_empty() {
            return Err(ConfigError::InvalidTuning {
                field: "probe_ring_scales",
                reason: "at least one ring is required".to_string(),
            });
        }
        if self.attempts_per_level == 0 {
            return Err(ConfigError::InvalidTuning {
                field: "attempts_per_level",
                reason: "a level needs at least one attempt".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse and validate a JSON level table (array of [`LevelDef`])
pub fn levels_from_json(json: &str) -> Result<Vec<LevelDef>, ConfigError> {
    let levels: Vec<LevelDef> = serde_json::from_str(json)?;
    validate_levels(&levels)?;
    Ok(levels)
}

/// Load a level table from disk
pub fn load_levels(path: impl AsRef<Path>) -> Result<Vec<LevelDef>, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let levels = levels_from_json(&json)?;
    log::info!("Loaded {} levels from {}", levels.len(), path.display());
    Ok(levels)
}

pub fn validate_levels(levels: &[LevelDef]) -> Result<(), ConfigError> {
    if levels.is_empty() {
        return Err(ConfigError::NoLevels);
    }
    for level in levels {
        if level.obstacles.is_empty() {
            return Err(ConfigError::InvalidLevel {
                level: level.name.clone(),
                reason: "no obstacles".to_string(),
            });
        }
        if let Some(bad) = level.obstacles.iter().find(|o| o.rect.w <= 0.0 || o.rect.h <= 0.0) {
            return Err(ConfigError::InvalidLevel {
                level: level.name.clone(),
                reason: format!("obstacle at ({}, {}) has no area", bad.rect.x, bad.rect.y),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5, "split_cost": 30 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.split_cost, 30);
        assert_eq!(tuning.ball_radius, BALL_RADIUS);
        assert_eq!(tuning.probe_ring_scales, vec![1.0, 0.5]);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning {
            anchor: Vec2::new(150.0, 250.0),
            probe_directions: 12,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_bad_friction() {
        let err = Tuning::from_json(r#"{ "friction": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning { field: "friction", .. }));
    }

    #[test]
    fn test_rejects_gravity_that_never_lands() {
        for json in [r#"{ "gravity": -1.0 }"#, r#"{ "gravity": 0.0 }"#] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTuning { field: "gravity", .. }));
        }
    }

    #[test]
    fn test_rejects_bad_velocity_multiplier() {
        let err = Tuning::from_json(r#"{ "velocity_multiplier": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidTuning { field: "velocity_multiplier", .. }
        ));
    }

    #[test]
    fn test_rejects_negative_completion_delay() {
        let err = Tuning::from_json(r#"{ "completion_delay_secs": -0.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidTuning { field: "completion_delay_secs", .. }
        ));
        // Zero means advance on the next frame
        assert!(Tuning::from_json(r#"{ "completion_delay_secs": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_rejects_non_finite_split_angle() {
        let tuning = Tuning {
            split_angle_deg: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvalidTuning { field: "split_angle_deg", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_probe_directions() {
        let err = Tuning::from_json(r#"{ "probe_directions": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning { field: "probe_directions", .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_level_table_json() {
        let json = r#"[
            { "name": "Pillar", "target_score": 10,
              "obstacles": [ { "rect": { "x": 500, "y": 300, "w": 30, "h": 100 } } ] }
        ]"#;
        let levels = levels_from_json(json).unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].obstacles[0].style, 0);
    }

    #[test]
    fn test_level_table_rejects_empty() {
        assert!(matches!(levels_from_json("[]"), Err(ConfigError::NoLevels)));
        let json = r#"[ { "name": "Nothing", "target_score": 0, "obstacles": [] } ]"#;
        assert!(matches!(
            levels_from_json(json),
            Err(ConfigError::InvalidLevel { .. })
        ));
    }
}
