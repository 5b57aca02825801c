//! Decision strategies.
//!
//! The engine only sees [`PlayerBrain`]. Three implementations ship with the
//! crate: the scripted [`ScriptedHeuristic`], [`ExternalAgent`] for injected
//! commands and [`HumanDevice`] for anything implementing [`InputDevice`].

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::engine::action::Action;
use crate::engine::rink::Rink;
use crate::engine::types::{direction_or_fallback, PlayerRef, Vec2};
use crate::error::Result;

/// Action plus raw stick input produced by a brain. The input is rectified
/// by the engine afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub input: Vec2,
}

impl Default for Decision {
    fn default() -> Self {
        Self { action: Action::None, input: Vec2::zeros() }
    }
}

impl Decision {
    pub fn skate(input: Vec2) -> Self {
        Self { action: Action::None, input }
    }
}

/// Externally supplied command for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AgentCommand {
    pub action: Option<Action>,
    pub input: Option<Vec2>,
}

/// Read-only view handed to a brain while it decides.
pub struct DecisionContext<'a> {
    pub rink: &'a Rink,
    pub me: PlayerRef,
    /// Latest injected command addressed to this player, if any.
    pub command: Option<&'a AgentCommand>,
}

impl DecisionContext<'_> {
    pub fn position(&self) -> Vec2 {
        self.rink.state().position(self.me)
    }

    pub fn attacking_net(&self) -> Vec2 {
        self.rink.arena().attacking_net(self.me.side)
    }
}

pub trait PlayerBrain {
    fn decide(&mut self, ctx: &DecisionContext<'_>, rng: &mut ChaCha8Rng) -> Result<Decision>;

    fn is_human(&self) -> bool {
        false
    }

    /// Short label for logs.
    fn kind(&self) -> &'static str;
}

// ===========================================
// Scripted heuristic
// ===========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicParams {
    /// Shooting range as a fraction of the rink diagonal.
    pub shoot_arena_dist: f64,
    /// Minimum simulated scoring chance before shooting.
    pub shot_chance: f64,
    /// Minimum simulated completion chance before passing.
    pub pass_chance: f64,
    /// Defenders ranked below this chase the puck carrier directly.
    pub approach_rank: usize,
    pub random_shot_chance: f64,
    pub random_pass_chance: f64,
    pub random_skate_chance: f64,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            shoot_arena_dist: 0.3,
            shot_chance: 0.3,
            pass_chance: 0.8,
            approach_rank: 2,
            random_shot_chance: 0.0,
            random_pass_chance: 0.0,
            random_skate_chance: 0.0,
        }
    }
}

impl HeuristicParams {
    /// Noisy variant used to diversify training data.
    pub fn random_play() -> Self {
        Self {
            random_shot_chance: 0.03,
            random_pass_chance: 0.03,
            random_skate_chance: 0.9,
            ..Self::default()
        }
    }
}

/// Draws only when the chance is non-zero, so the default heuristic never
/// touches the RNG.
fn roll(rng: &mut ChaCha8Rng, chance: f64) -> bool {
    chance > 0.0 && rng.gen::<f64>() < chance
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedHeuristic {
    pub params: HeuristicParams,
}

impl ScriptedHeuristic {
    pub fn new(params: HeuristicParams) -> Self {
        Self { params }
    }

    fn with_puck(&self, ctx: &DecisionContext<'_>, rng: &mut ChaCha8Rng) -> Result<Decision> {
        let rink = ctx.rink;
        let state = rink.state();
        let pos = ctx.position();
        let net = ctx.attacking_net();
        let net_delta = net - pos;

        let shoot_dist = self.params.shoot_arena_dist * rink.arena().diagonal();
        let shot_chance = rink.simulate_shot(ctx.me);
        let shoot = (self.params.random_shot_chance == 0.0
            && net_delta.norm() < shoot_dist
            && shot_chance > self.params.shot_chance)
            || roll(rng, self.params.random_shot_chance);
        if shoot {
            log::trace!("{} shooting from {:.2}", state.player(ctx.me).name, net_delta.norm());
            return Ok(Decision { action: Action::Shoot, input: net_delta });
        }

        let mut action = Action::None;
        let mut lowest_net_dist = net_delta.norm();
        for (slot, mate) in rink.pass_options(ctx.me).into_iter().enumerate() {
            if state.action(mate) == Action::Stunned {
                continue;
            }
            let net_dist = (state.position(mate) - net).norm();
            let pass_chance = rink.simulate_pass(ctx.me, mate)?;
            let should_pass = (self.params.random_pass_chance == 0.0
                && net_dist < lowest_net_dist
                && pass_chance > self.params.pass_chance)
                || roll(rng, self.params.random_pass_chance);
            if should_pass {
                if let Some(pass) = Action::from_pass_slot(slot) {
                    action = pass;
                    lowest_net_dist = net_dist;
                }
            }
        }
        Ok(Decision { action, input: net_delta })
    }

    fn without_puck(
        &self,
        ctx: &DecisionContext<'_>,
        controller: PlayerRef,
        rng: &mut ChaCha8Rng,
    ) -> Decision {
        let rink = ctx.rink;
        let state = rink.state();
        let pos = ctx.position();

        if roll(rng, self.params.random_skate_chance) {
            return Decision::default();
        }

        let carrier = state.position(controller);
        if controller.side == ctx.me.side {
            // support: move up ice, spread away from the team centre
            let team = state.team(ctx.me.side).players();
            let centre = team.iter().map(|p| p.position).sum::<Vec2>() / team.len() as f64;
            let centre_delta = pos - centre;
            let centre_dir = centre_delta / (centre_delta.norm() + 1e-10);
            let dest = (ctx.attacking_net() + pos) * 0.5
                + centre_dir * rink.arena().size.0 * 0.5;
            Decision::skate(dest - pos)
        } else {
            let target = if rink.rank(ctx.me) < self.params.approach_rank {
                carrier
            } else {
                (carrier + rink.arena().attacking_net(controller.side)) * 0.5
            };
            Decision::skate(target - pos)
        }
    }
}

impl PlayerBrain for ScriptedHeuristic {
    fn decide(&mut self, ctx: &DecisionContext<'_>, rng: &mut ChaCha8Rng) -> Result<Decision> {
        match ctx.rink.controller() {
            Some(c) if c == ctx.me => self.with_puck(ctx, rng),
            Some(c) => Ok(self.without_puck(ctx, c, rng)),
            None => Ok(Decision::default()),
        }
    }

    fn kind(&self) -> &'static str {
        "heuristic"
    }
}

// ===========================================
// External agent
// ===========================================

/// Replays whatever command was injected for this player.
#[derive(Debug, Clone, Default)]
pub struct ExternalAgent;

impl PlayerBrain for ExternalAgent {
    fn decide(&mut self, ctx: &DecisionContext<'_>, _rng: &mut ChaCha8Rng) -> Result<Decision> {
        let Some(command) = ctx.command else {
            return Ok(Decision::default());
        };
        let mut input = command.input.unwrap_or_else(Vec2::zeros);
        if !input.iter().all(|c| c.is_finite()) {
            log::warn!(
                "non-finite input {:?} for {}, zeroing",
                input,
                ctx.rink.state().player(ctx.me).name
            );
            input = input.map(|c| if c.is_finite() { c } else { 0.0 });
        }
        Ok(Decision { action: command.action.unwrap_or(Action::None), input })
    }

    fn kind(&self) -> &'static str {
        "external"
    }
}

// ===========================================
// Human device
// ===========================================

/// Gamepad-style device contract. Axes are in `[-1, 1]`, the trigger in `[0, 1]`.
pub trait InputDevice {
    fn left_stick(&self) -> Vec2;
    fn right_stick(&self) -> Vec2;
    fn right_trigger(&self) -> f64;
}

const SHOT_STICK_THRESHOLD: f64 = -0.9;
const PASS_TRIGGER_THRESHOLD: f64 = 0.5;

pub struct HumanDevice<D: InputDevice> {
    device: D,
}

impl<D: InputDevice> HumanDevice<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

impl<D: InputDevice> PlayerBrain for HumanDevice<D> {
    fn decide(&mut self, ctx: &DecisionContext<'_>, _rng: &mut ChaCha8Rng) -> Result<Decision> {
        let stick = self.device.left_stick().map(f64::round_ties_even);

        if self.device.right_stick().y < SHOT_STICK_THRESHOLD {
            return Ok(Decision { action: Action::Shoot, input: stick });
        }

        let mut action = Action::None;
        if self.device.right_trigger() > PASS_TRIGGER_THRESHOLD {
            // aim the pass with the stick
            let pos = ctx.position();
            let mut best_dot = -1.0;
            for (slot, mate) in ctx.rink.pass_options(ctx.me).into_iter().enumerate() {
                let dir = direction_or_fallback(&pos, &ctx.rink.state().position(mate), 0.001);
                let dot = stick.dot(&dir);
                if dot > best_dot {
                    if let Some(pass) = Action::from_pass_slot(slot) {
                        action = pass;
                        best_dot = dot;
                    }
                }
            }
        }
        Ok(Decision { action, input: stick })
    }

    fn is_human(&self) -> bool {
        true
    }

    fn kind(&self) -> &'static str {
        "human"
    }
}
