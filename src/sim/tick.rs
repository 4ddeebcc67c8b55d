//! Per-frame simulation step
//!
//! One call to [`tick`] is one rendered frame: pointer handling, projectile
//! motion and collisions, then level bookkeeping.

use glam::Vec2;

use super::launch::Release;
use super::level::LevelState;
use super::state::GameState;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in screen space
    pub pointer: Vec2,
    /// Primary button went down this frame
    pub pressed: bool,
    /// Primary button is down (including the frame it was pressed)
    pub held: bool,
    /// Primary button went up this frame
    pub released: bool,
    /// Wall-clock seconds since the previous frame
    pub dt: f32,
    /// New viewport height, if it changed
    pub viewport_height: Option<f32>,
    /// Restart the current level
    pub reset: bool,
    /// Trigger the split power-up
    pub split: bool,
}

impl TickInput {
    /// A frame with no input, `dt` seconds long
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Default::default()
        }
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    if let Some(height) = input.viewport_height {
        state.set_viewport_height(height);
    }

    if input.reset {
        state.reset();
        return;
    }

    handle_pointer(state, input);

    if input.split {
        state.activate_split_powerup();
    }

    if state.launched {
        step_projectiles(state);
    }

    advance_completion_timer(state, input.dt);
}

impl GameState {
    /// Advance by one frame (see [`tick`])
    pub fn update(&mut self, input: &TickInput) {
        tick(self, input);
    }
}

fn handle_pointer(state: &mut GameState, input: &TickInput) {
    if input.pressed
        && !state.launched
        && state.attempts > 0
        && state.level().state == LevelState::Playing
    {
        state.launcher.press(input.pointer, &state.ball);
    }

    if input.held && state.launcher.is_dragging() {
        state.launcher.drag(input.pointer, &mut state.ball);
    }

    if input.released {
        match state.launcher.release(&mut state.ball) {
            Release::Launched => {
                state.launched = true;
                state.attempts -= 1;
                log::info!(
                    "Launched with velocity ({:.2}, {:.2}), {} attempts left",
                    state.ball.vel.x,
                    state.ball.vel.y,
                    state.attempts
                );
            }
            Release::SnappedBack | Release::Idle => {}
        }
    }
}

/// Collide then integrate every live projectile, then settle the round
fn step_projectiles(state: &mut GameState) {
    let ground_y = state.ground_y;
    let level = &mut state.levels[state.level_index];

    let mut hits = 0;
    for ball in std::iter::once(&mut state.ball).chain(state.splits.iter_mut()) {
        if !ball.active {
            continue;
        }
        hits += level.resolve_collisions(ball, &state.probes);
        ball.integrate(ground_y, &state.tuning);
    }

    if hits > 0 {
        state.total_score += hits * level.points_per_obstacle();
        level.check_completion();
    }

    if state.all_projectiles_inactive() {
        end_round(state);
    }
}

/// Every ball has stopped: fail the level if that was the last attempt,
/// otherwise put a new ball on the slingshot
fn end_round(state: &mut GameState) {
    if state.attempts == 0 {
        state.level_mut().fail();
    }
    log::debug!(
        "Round over: {} points, {} attempts left",
        state.current_score(),
        state.attempts
    );
    state.rearm();
}

fn advance_completion_timer(state: &mut GameState, dt: f32) {
    if state.level().state != LevelState::Completed {
        return;
    }
    state.completion_timer += dt;
    if state.completion_timer < state.tuning.completion_delay_secs {
        return;
    }
    state.completion_timer = 0.0;
    if state.is_last_level() {
        return;
    }
    state.set_level(state.level_index + 1);
}
