//! Game-level state: level table, attempts, score and the live projectiles
//!
//! Everything a frontend needs to draw a frame is exposed through
//! [`GameState::snapshot`]; everything it can ask for goes through the
//! command methods or [`super::TickInput`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::launch::LaunchController;
use super::level::{Level, LevelDef, LevelState, builtin_levels};
use super::obstacle::Rect;
use super::probe::ProbeSet;
use super::projectile::{Projectile, predict_trajectory};
use crate::consts::SCREEN_HEIGHT;
use crate::error::ConfigError;
use crate::rotate;
use crate::tuning::{Tuning, validate_levels};

/// Complete game state (deterministic: no clocks, no randomness)
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub(super) probes: ProbeSet,
    /// All levels, built once and reset in place
    pub levels: Vec<Level>,
    pub level_index: usize,
    /// Launches left in the current level
    pub attempts: u32,
    /// Points across all levels, minus power-ups bought
    pub total_score: u32,
    /// `total_score` when the current level began (restored by `reset`)
    score_at_level_start: u32,
    /// The slingshot ball
    pub ball: Projectile,
    /// Fragments from the split power-up (insertion order)
    pub splits: Vec<Projectile>,
    /// Ball has left the slingshot this attempt
    pub launched: bool,
    /// Seconds spent in `Completed` before moving on
    pub completion_timer: f32,
    /// Ground plane (bottom of the viewport)
    pub ground_y: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(super) launcher: LaunchController,
}

impl Default for GameState {
    fn default() -> Self {
        Self::build(builtin_levels(), Tuning::default())
    }
}

impl GameState {
    /// Create a game from a level table and tuning, validating both
    pub fn new(levels: Vec<LevelDef>, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        validate_levels(&levels)?;
        Ok(Self::build(levels, tuning))
    }

    /// The compiled-in levels with default tuning
    pub fn with_builtin_levels() -> Self {
        Self::default()
    }

    fn build(defs: Vec<LevelDef>, tuning: Tuning) -> Self {
        let levels: Vec<Level> = defs
            .iter()
            .map(|def| Level::from_def(def, tuning.points_per_obstacle))
            .collect();
        let anchor = levels
            .first()
            .and_then(|l| l.anchor)
            .unwrap_or(tuning.anchor);

        let mut state = Self {
            probes: ProbeSet::from_tuning(&tuning),
            levels,
            level_index: 0,
            attempts: tuning.attempts_per_level,
            total_score: 0,
            score_at_level_start: 0,
            ball: Projectile::at_anchor(anchor, &tuning),
            splits: Vec::new(),
            launched: false,
            completion_timer: 0.0,
            ground_y: SCREEN_HEIGHT,
            time_ticks: 0,
            launcher: LaunchController::default(),
            tuning,
        };
        state.begin_level();
        log::info!("Game created with {} levels", state.levels.len());
        state
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.level_index]
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.level_index]
    }

    /// Slingshot position for the current level
    pub fn anchor(&self) -> Vec2 {
        self.level().anchor.unwrap_or(self.tuning.anchor)
    }

    /// Points earned in the current level
    pub fn current_score(&self) -> u32 {
        self.level().score()
    }

    pub fn split_affordable(&self) -> bool {
        self.total_score >= self.tuning.split_cost
    }

    pub fn split_active(&self) -> bool {
        !self.splits.is_empty()
    }

    pub fn is_last_level(&self) -> bool {
        self.level_index + 1 >= self.levels.len()
    }

    /// Main ball first, then split fragments
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        std::iter::once(&self.ball).chain(self.splits.iter())
    }

    pub fn all_projectiles_inactive(&self) -> bool {
        self.projectiles().all(|p| !p.active)
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.ground_y = height;
    }

    /// Restart the current level: obstacles back, attempts refilled, and any
    /// points earned or spent in this level undone
    pub fn reset(&mut self) {
        self.total_score = self.score_at_level_start;
        self.level_mut().reset();
        self.begin_level();
        log::info!("{} reset", self.level().name);
    }

    /// Jump to level `index` (ignored if out of range)
    pub fn set_level(&mut self, index: usize) {
        if index >= self.levels.len() {
            log::warn!("No level {} (have {})", index, self.levels.len());
            return;
        }
        self.level_index = index;
        self.level_mut().reset();
        self.begin_level();
        log::info!("Entering {}", self.level().name);
    }

    /// Per-level bookkeeping shared by construction, `reset` and `set_level`
    fn begin_level(&mut self) {
        self.score_at_level_start = self.total_score;
        self.attempts = self.tuning.attempts_per_level;
        self.completion_timer = 0.0;
        self.launcher = LaunchController::new(
            self.anchor(),
            self.tuning.launch_max_distance,
            self.tuning.velocity_multiplier,
        );
        self.rearm();
    }

    /// Put a fresh ball on the slingshot for the next attempt
    pub(super) fn rearm(&mut self) {
        self.ball = Projectile::at_anchor(self.anchor(), &self.tuning);
        self.splits.clear();
        self.launched = false;
        self.launcher.cancel();
    }

    /// Split the in-flight ball into three smaller ones. Silently does nothing
    /// unless the ball is flying, unsplit, and the player can pay for it.
    pub fn activate_split_powerup(&mut self) -> bool {
        let cost = self.tuning.split_cost;
        if !self.launched || !self.ball.active || self.ball.is_split || self.split_active() {
            log::debug!("Split ignored: no eligible ball in flight");
            return false;
        }
        if self.total_score < cost {
            log::debug!("Split ignored: {} < {}", self.total_score, cost);
            return false;
        }

        self.total_score -= cost;
        let scale = self.tuning.split_scale;
        let angle = self.tuning.split_angle_deg.to_radians();
        for sign in [1.0, -1.0] {
            let mut fragment = self.ball.clone();
            fragment.vel = rotate(self.ball.vel, sign * angle);
            fragment.shrink_for_split(scale);
            self.splits.push(fragment);
        }
        self.ball.shrink_for_split(scale);
        log::info!("Split power-up used, {} points left", self.total_score);
        true
    }

    /// Read-only view for rendering and HUD
    pub fn snapshot(&self) -> Snapshot {
        let level = self.level();
        let aim_preview = match self.launcher.aim() {
            Some(aim) => predict_trajectory(
                aim.pos,
                aim.velocity,
                self.tuning.gravity,
                self.tuning.preview_steps,
            ),
            None => Vec::new(),
        };

        Snapshot {
            level_index: self.level_index,
            level_name: level.name.clone(),
            level_state: level.state,
            current_score: level.score(),
            target_score: level.target_score,
            attempts: self.attempts,
            total_score: self.total_score,
            split_affordable: self.split_affordable(),
            split_active: self.split_active(),
            launched: self.launched,
            dragging: self.launcher.is_dragging(),
            anchor: self.anchor(),
            ground_y: self.ground_y,
            projectiles: self.projectiles().map(ProjectileView::from).collect(),
            obstacles: level
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    rect: o.rect,
                    style: o.style,
                    visible: o.visible,
                })
                .collect(),
            aim_preview,
            time_ticks: self.time_ticks,
        }
    }
}

/// Drawable projectile state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub active: bool,
    pub is_split: bool,
}

impl From<&Projectile> for ProjectileView {
    fn from(p: &Projectile) -> Self {
        Self {
            pos: p.pos,
            radius: p.radius,
            rotation: p.rotation,
            active: p.active,
            is_split: p.is_split,
        }
    }
}

/// Drawable obstacle state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub rect: Rect,
    pub style: u32,
    pub visible: bool,
}

/// Per-frame read-only copy of everything a frontend shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level_index: usize,
    pub level_name: String,
    pub level_state: LevelState,
    pub current_score: u32,
    pub target_score: u32,
    pub attempts: u32,
    pub total_score: u32,
    pub split_affordable: bool,
    pub split_active: bool,
    pub launched: bool,
    pub dragging: bool,
    pub anchor: Vec2,
    pub ground_y: f32,
    /// Main ball first, then split fragments
    pub projectiles: Vec<ProjectileView>,
    pub obstacles: Vec<ObstacleView>,
    /// Predicted path while aiming (empty otherwise)
    pub aim_preview: Vec<Vec2>,
    /// Frames simulated since the game was created
    pub time_ticks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::ObstacleDef;

    fn one_level(target: u32, count: usize) -> Vec<LevelDef> {
        vec![LevelDef {
            name: "Test".to_string(),
            target_score: target,
            obstacles: (0..count)
                .map(|i| ObstacleDef::new(Rect::new(600.0, i as f32 * 40.0, 30.0, 30.0), 0))
                .collect(),
            anchor: None,
        }]
    }

    fn in_flight(state: &mut GameState, vel: Vec2) {
        state.ball.pos = Vec2::new(300.0, 150.0);
        state.ball.vel = vel;
        state.launched = true;
    }

    #[test]
    fn test_new_validates() {
        assert!(matches!(
            GameState::new(Vec::new(), Tuning::default()),
            Err(ConfigError::NoLevels)
        ));
        let bad = Tuning {
            elasticity: 0.0,
            ..Default::default()
        };
        assert!(GameState::new(one_level(10, 1), bad).is_err());
        assert!(GameState::new(one_level(10, 1), Tuning::default()).is_ok());
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::with_builtin_levels();
        assert_eq!(state.level_index, 0);
        assert_eq!(state.attempts, 3);
        assert_eq!(state.total_score, 0);
        assert_eq!(state.ball.pos, state.anchor());
        assert!(!state.launched);
        assert_eq!(state.level().state, LevelState::Playing);
    }

    #[test]
    fn test_split_conserves_speed_and_costs_points() {
        let mut state = GameState::new(one_level(10, 1), Tuning::default()).unwrap();
        state.total_score = 70;
        in_flight(&mut state, Vec2::new(12.0, -5.0));

        assert!(state.activate_split_powerup());
        assert_eq!(state.total_score, 20);
        assert_eq!(state.splits.len(), 2);
        assert!(state.ball.is_split);
        assert!((state.ball.radius - 28.0).abs() < 1e-4);

        for fragment in &state.splits {
            assert!((fragment.speed() - 13.0).abs() < 1e-4);
            assert!((fragment.radius - 28.0).abs() < 1e-4);
            assert!(fragment.is_split);
            assert_eq!(fragment.pos, state.ball.pos);
            let angle = fragment.vel.angle_to(state.ball.vel).abs();
            assert!((angle - 30f32.to_radians()).abs() < 1e-4);
        }
        // Rotated in opposite directions
        assert!(state.splits[0].vel != state.splits[1].vel);

        // Once per flight
        assert!(!state.activate_split_powerup());
        assert_eq!(state.total_score, 20);
        assert_eq!(state.splits.len(), 2);
    }

    #[test]
    fn test_split_guards() {
        let mut state = GameState::new(one_level(10, 1), Tuning::default()).unwrap();
        state.total_score = 100;

        // Not launched yet
        assert!(!state.activate_split_powerup());

        // Too poor
        in_flight(&mut state, Vec2::new(10.0, 0.0));
        state.total_score = 40;
        assert!(!state.split_affordable());
        assert!(!state.activate_split_powerup());
        assert_eq!(state.total_score, 40);

        // Ball already at rest
        state.total_score = 100;
        state.ball.active = false;
        assert!(!state.activate_split_powerup());
        assert!(state.splits.is_empty());
    }

    #[test]
    fn test_reset_rolls_back_level_points() {
        let mut state = GameState::new(
            [one_level(10, 2), one_level(10, 2)].concat(),
            Tuning::default(),
        )
        .unwrap();
        state.total_score = 30;
        state.set_level(1);
        state.level_mut().obstacles[0].destroy();
        state.total_score += 10;
        state.attempts = 0;
        state.level_mut().fail();

        state.reset();
        assert_eq!(state.total_score, 30);
        assert_eq!(state.attempts, 3);
        assert_eq!(state.level().state, LevelState::Playing);
        assert_eq!(state.level().visible_count(), 2);
    }

    #[test]
    fn test_set_level_out_of_range_is_ignored() {
        let mut state = GameState::with_builtin_levels();
        state.set_level(99);
        assert_eq!(state.level_index, 0);
        state.set_level(2);
        assert_eq!(state.level_index, 2);
        assert_eq!(state.ball.pos, Vec2::new(150.0, 250.0));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::with_builtin_levels();
        state.level_mut().obstacles[3].destroy();
        let snap = state.snapshot();
        assert_eq!(snap.level_state, LevelState::Playing);
        assert_eq!(snap.current_score, 10);
        assert_eq!(snap.target_score, 60);
        assert_eq!(snap.projectiles.len(), 1);
        assert_eq!(snap.obstacles.len(), 9);
        assert!(!snap.obstacles[3].visible);
        assert!(snap.aim_preview.is_empty());

        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
