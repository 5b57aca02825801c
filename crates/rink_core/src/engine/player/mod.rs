//! Player behaviour.
//!
//! Players own no state. A [`PlayerMut`] is a short-lived handle that reads
//! and writes one roster slot of the [`GameState`]; decision making lives
//! behind the [`strategy::PlayerBrain`] trait.

pub mod strategy;

use super::action::Action;
use super::arena::Arena;
use super::config::{MotionModel, Rules};
use super::game_state::GameState;
use super::types::{PlayerRef, TeamSide, Vec2};

/// Inputs shorter than this are left unnormalized before rounding.
const RECTIFY_EPSILON: f64 = 0.01;

/// Crossover lane endpoints (normalized x at y = 0 and y = 1) for even roster slots.
const CROSSOVER_LANE: (f64, f64) = (0.2, 0.6);

pub struct PlayerMut<'a> {
    state: &'a mut GameState,
    id: PlayerRef,
}

impl<'a> PlayerMut<'a> {
    pub fn new(state: &'a mut GameState, id: PlayerRef) -> Self {
        debug_assert!(state.contains(id));
        Self { state, id }
    }

    pub fn id(&self) -> PlayerRef {
        self.id
    }

    /// Clear action and motion, as at the start of every play.
    pub fn reset(&mut self) {
        self.state.set_action(self.id, Action::None);
        self.state.set_action_time(self.id, 0);
        self.state.set_position(self.id, Vec2::zeros());
        self.state.set_velocity(self.id, Vec2::zeros());
        self.state.set_input(self.id, Vec2::zeros());
    }

    pub fn stun(&mut self, ticks: u32) {
        if ticks > 0 {
            self.state.set_action(self.id, Action::Stunned);
            self.state.set_action_time(self.id, ticks);
        }
    }

    /// Delay the next action by at least `ticks`.
    pub fn response_time(&mut self, ticks: u32) {
        let current = self.state.action_time(self.id);
        self.state.set_action_time(self.id, current.max(ticks));
    }

    /// Start-of-think bookkeeping. Returns `true` when the player is still
    /// locked out and must not decide this tick.
    pub fn begin_think(&mut self) -> bool {
        self.state.set_action(self.id, Action::None);
        let remaining = self.state.action_time(self.id).saturating_sub(1);
        self.state.set_action_time(self.id, remaining);
        self.state.set_input(self.id, Vec2::zeros());

        if remaining > 0 {
            self.state.set_action(self.id, Action::Stunned);
            true
        } else {
            false
        }
    }

    pub fn apply_decision(&mut self, action: Action, input: Vec2) {
        self.state.set_action(self.id, action);
        self.state.set_input(self.id, input);
    }

    pub fn rectify_input(&mut self) {
        let input = rectify(&self.state.input(self.id));
        self.state.set_input(self.id, input);
    }

    pub fn run_motion_model(&mut self, rules: &Rules) {
        let (position, velocity) = step_motion(
            rules,
            &self.state.position(self.id),
            &self.state.velocity(self.id),
            &self.state.input(self.id),
            self.state.action_time(self.id),
        );
        self.state.set_position(self.id, position);
        self.state.set_velocity(self.id, velocity);
    }

    /// Pin the player onto its crossover lane.
    pub fn apply_crossover(&mut self, arena: &Arena) {
        let position = crossover_position(arena, self.id, &self.state.position(self.id));
        self.state.set_position(self.id, position);
    }
}

/// Normalize anything longer than a dead-zone, then snap each component to
/// {-1, 0, 1}.
pub fn rectify(input: &Vec2) -> Vec2 {
    let mag = input.norm();
    let dir = if mag > RECTIFY_EPSILON { input / mag } else { *input };
    dir.map(f64::round_ties_even)
}

/// One tick of locomotion. Returns the new `(position, velocity)`.
pub fn step_motion(
    rules: &Rules,
    position: &Vec2,
    velocity: &Vec2,
    input: &Vec2,
    action_time: u32,
) -> (Vec2, Vec2) {
    let mut input = *input;
    let mag = input.norm();
    if mag > 1.0 {
        input /= mag;
    }

    let mut velocity = match rules.motion_model {
        MotionModel::Acceleration => {
            if action_time > 0 {
                input = Vec2::zeros();
            }
            let norm_vel = velocity / rules.max_vel;
            let accel = input * (input.norm() - norm_vel.dot(&input)) * rules.max_accel;
            velocity + accel
        }
        MotionModel::Direct => input,
    };

    let speed = velocity.norm();
    if speed > rules.max_vel {
        velocity *= rules.max_vel / speed;
    }

    (position + velocity, velocity)
}

/// Project `position` onto the lane of roster slot `id`. Lanes alternate
/// between slots and are mirrored for the away team.
pub fn crossover_position(arena: &Arena, id: PlayerRef, position: &Vec2) -> Vec2 {
    let (mut x1, mut x2) = CROSSOVER_LANE;
    if id.index % 2 == 1 {
        x1 = 1.0 - x1;
        x2 = 1.0 - x2;
    }

    let away = id.side == TeamSide::Away;
    let mut normalized = arena.normalize(position);
    if away {
        normalized = Vec2::new(1.0, 1.0) - normalized;
    }

    let mut projected = Vec2::new(x1 + (x2 - x1) * normalized.y, normalized.y);
    if away {
        projected = Vec2::new(1.0, 1.0) - projected;
    }
    arena.denormalize(&projected)
}
