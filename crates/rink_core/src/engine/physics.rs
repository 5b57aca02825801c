//! Boards, body contact and the stochastic interception model.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::arena::Arena;
use super::config::Rules;
use super::game_state::GameState;
use super::rink::Rink;
use super::simulation::TickContext;
use super::types::{direction_or_fallback, PlayerRef, Vec2};
use crate::error::Result;

/// Separation factor applied to the player radius after a collision.
const SEPARATION: f64 = 1.01;
/// Centres closer than this are treated as coincident.
const COINCIDENT_DIST: f64 = 0.001;
const TRAJECTORY_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interception {
    pub interceptor: Option<PlayerRef>,
    /// Probability the puck gets past every candidate.
    pub through_chance: f64,
}

/// Per-candidate geometry along the trajectory `source → target`.
struct Lane {
    source: Vec2,
    target: Vec2,
    dir: Vec2,
    length: f64,
}

impl Lane {
    fn new(source: &Vec2, target: &Vec2) -> Self {
        let delta = target - source;
        let length = delta.norm() + TRAJECTORY_EPSILON;
        Self { source: *source, target: *target, dir: delta / length, length }
    }

    /// Effective distance of a candidate at `pos` to its intercept point, or
    /// `None` if it stands behind the source.
    fn effective_dist(&self, rules: &Rules, pos: &Vec2) -> Option<f64> {
        let mut along = self.dir.dot(&(pos - self.source));
        if along <= 0.0 {
            return None;
        }
        let intercept = if along > self.length {
            along = self.length;
            self.target
        } else {
            self.source + self.dir * along
        };
        let dist = (pos - intercept).norm();
        Some((dist - rules.player_intercept_speed * along).max(0.0))
    }
}

/// Roll the interception test. Candidates are visited in the given order;
/// the one with the smallest effective distance that passes its draw wins.
pub fn intercept_test(
    rules: &Rules,
    source: &Vec2,
    target: &Vec2,
    candidates: &[(PlayerRef, Vec2)],
    rng: &mut ChaCha8Rng,
) -> Interception {
    let lane = Lane::new(source, target);
    let mut through = 1.0;
    let mut interceptor = None;
    let mut shortest = lane.length + 1.0;

    for (p, pos) in candidates {
        let Some(effective) = lane.effective_dist(rules, pos) else {
            log::trace!("{:?} is behind the puck", p);
            continue;
        };
        let prob = rules.intercept_chance(effective);
        through *= 1.0 - prob;

        if effective < shortest {
            let r: f64 = rng.gen();
            if r < prob {
                interceptor = Some(*p);
                shortest = effective;
                log::trace!("{:?} intercepts ({:.3} < {:.3}, dist {:.3})", p, r, prob, effective);
            } else {
                log::trace!("{:?} misses ({:.3} >= {:.3}, dist {:.3})", p, r, prob, effective);
            }
        } else {
            log::trace!("{:?} at {:.3} is farther than {:.3}", p, effective, shortest);
        }
    }

    Interception { interceptor, through_chance: through }
}

/// Deterministic through-chance of [`intercept_test`]; draws nothing.
pub fn through_chance(
    rules: &Rules,
    source: &Vec2,
    target: &Vec2,
    candidates: &[(PlayerRef, Vec2)],
) -> f64 {
    let lane = Lane::new(source, target);
    candidates
        .iter()
        .filter_map(|(_, pos)| lane.effective_dist(rules, pos))
        .map(|d| 1.0 - rules.intercept_chance(d))
        .product()
}

/// Keep every player inside the boards, killing velocity on the clamped axis.
pub fn clamp_to_boards(state: &mut GameState, arena: &Arena, radius: f64) {
    let lo = arena.mins().add_scalar(radius);
    let hi = arena.maxs().add_scalar(-radius);
    let players: Vec<PlayerRef> = state.player_refs().collect();

    for p in players {
        let mut pos = state.position(p);
        let mut vel = state.velocity(p);
        for axis in 0..2 {
            if pos[axis] < lo[axis] {
                pos[axis] = lo[axis];
                vel[axis] = 0.0;
            }
            if pos[axis] > hi[axis] {
                pos[axis] = hi[axis];
                vel[axis] = 0.0;
            }
        }
        state.set_position(p, pos);
        state.set_velocity(p, vel);
    }
}

impl Rink {
    pub(crate) fn update_physics(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        clamp_to_boards(&mut self.state, &self.arena, self.rules.player_radius);
        self.update_player_collisions(ctx)
    }

    /// Resolve every touching pair once, in global roster order. A contact
    /// between the puck carrier and a free opponent is a check.
    fn update_player_collisions(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let players: Vec<PlayerRef> = self.state.player_refs().collect();
        let radius = self.rules.player_radius;

        for (i, &a) in players.iter().enumerate() {
            for &b in &players[i + 1..] {
                let pos_a = self.state.position(a);
                let pos_b = self.state.position(b);
                if (pos_a - pos_b).norm() > radius * 2.0 {
                    continue;
                }

                let controller = self.controller();

                if self.rules.enable_player_collisions {
                    let centre = (pos_a + pos_b) * 0.5;
                    let avg_vel = (self.state.velocity(a) + self.state.velocity(b)) * 0.5;
                    let dir = direction_or_fallback(&centre, &pos_a, COINCIDENT_DIST);
                    let offset = dir * radius * SEPARATION;
                    self.state.set_position(a, centre + offset);
                    self.state.set_position(b, centre - offset);
                    self.state.set_velocity(a, avg_vel);
                    self.state.set_velocity(b, avg_vel);
                }

                if a.side != b.side {
                    if controller == Some(a) && self.state.action_time(b) == 0 {
                        self.complete_check(a, b, ctx)?;
                    } else if controller == Some(b) && self.state.action_time(a) == 0 {
                        self.complete_check(b, a, ctx)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Directness times distance factor for a shot from where `shooter` stands.
    pub fn on_net_chance(&self, shooter: PlayerRef) -> f64 {
        let pos = self.state.position(shooter);
        let net = self.arena.attacking_net(shooter.side);
        let dir = direction_or_fallback(&pos, &net, TRAJECTORY_EPSILON);
        let dz = (net - pos).y.abs();
        let distance_factor = if dz < TRAJECTORY_EPSILON {
            1.0
        } else {
            (self.rules.shot_distance_accuracy_scale / dz).min(1.0)
        };
        dir.y.abs() * distance_factor
    }
}
