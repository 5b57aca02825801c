//! Shots, passes, checks and goals.
//!
//! Every operation here requires the acting player to hold the puck. The
//! probability-only variants (`simulate_shot`, `simulate_pass`) live on
//! [`Rink`] in `rink.rs` and never touch the RNG.

use rand::Rng;

use super::events::GameEventType;
use super::phase::GamePhase;
use super::physics::{intercept_test, Interception};
use super::player::PlayerMut;
use super::rink::Rink;
use super::simulation::TickContext;
use super::types::{PlayerRef, TeamSide, Vec2};
use crate::error::Result;

/// Reward handed to every player of the scoring team (negated for the other).
pub const GOAL_REWARD: f64 = 1.0;

impl Rink {
    /// Take a shot with the puck carrier. Returns the chance the shot had.
    pub fn resolve_shot(&mut self, shooter: PlayerRef, ctx: &mut TickContext<'_>) -> Result<f64> {
        self.require_control(shooter, "shoot")?;

        let on_net_chance = self.on_net_chance(shooter);
        let on_net = ctx.rng.gen::<f64>() < on_net_chance;

        let pos = self.state.position(shooter);
        let net = self.arena.attacking_net(shooter.side);
        let Interception { interceptor, through_chance } =
            intercept_test(&self.rules, &pos, &net, &self.capable_opponents(shooter.side), ctx.rng);

        let name = self.name(shooter).to_string();
        log::debug!(
            "[tick {}] {} shoots: on net {:.2}, through {:.2}",
            ctx.tick,
            name,
            on_net_chance,
            through_chance
        );
        ctx.emit(GameEventType::Shot, Some(&name), None);
        PlayerMut::new(&mut self.state, shooter).response_time(self.rules.shot_response_time);

        if let Some(blocker) = interceptor {
            ctx.emit(GameEventType::ShotBlock, Some(self.name(blocker)), Some(&name));
            self.receive(blocker, ctx);
        } else if on_net {
            self.award_goal(shooter, ctx);
            self.release_control();
        } else {
            ctx.emit(GameEventType::MissedShot, Some(&name), None);
            if let Some(rebound) = self.nearest_to(&net) {
                self.receive(rebound, ctx);
            }
        }

        Ok(through_chance * on_net_chance)
    }

    /// Pass from the puck carrier to `target`. Returns the through-chance.
    pub fn resolve_pass(
        &mut self,
        source: PlayerRef,
        target: PlayerRef,
        ctx: &mut TickContext<'_>,
    ) -> Result<f64> {
        self.require_control(source, "pass")?;

        let from = self.state.position(source);
        let to = self.state.position(target);
        let Interception { interceptor, through_chance } =
            intercept_test(&self.rules, &from, &to, &self.capable_opponents(source.side), ctx.rng);

        let name = self.name(source).to_string();
        ctx.emit(GameEventType::Pass, Some(&name), Some(self.name(target)));

        let receiver = match interceptor {
            Some(thief) => {
                ctx.emit(GameEventType::PassIntercept, Some(self.name(thief)), Some(&name));
                thief
            }
            None => {
                ctx.emit(GameEventType::PassComplete, Some(self.name(target)), Some(&name));
                target
            }
        };
        self.receive(receiver, ctx);
        PlayerMut::new(&mut self.state, source).response_time(self.rules.pass_response_time);

        Ok(through_chance)
    }

    /// `checker` knocks the puck off `carrier`.
    pub(crate) fn complete_check(
        &mut self,
        carrier: PlayerRef,
        checker: PlayerRef,
        ctx: &mut TickContext<'_>,
    ) -> Result<()> {
        self.require_control(carrier, "be checked")?;

        ctx.emit(GameEventType::Check, Some(self.name(checker)), Some(self.name(carrier)));
        PlayerMut::new(&mut self.state, carrier).stun(self.rules.check_stun_time);
        self.receive(checker, ctx);
        Ok(())
    }

    fn award_goal(&mut self, scorer: PlayerRef, ctx: &mut TickContext<'_>) {
        ctx.emit(GameEventType::Goal, Some(self.name(scorer)), None);

        let side = scorer.side;
        self.state.set_score(side, self.state.score(side) + 1);
        self.state.set_phase(GamePhase::StoppageGoal);
        log::debug!(
            "[tick {}] goal {} (home {} - away {})",
            ctx.tick,
            self.name(scorer),
            self.state.score(TeamSide::Home),
            self.state.score(TeamSide::Away)
        );

        let players: Vec<PlayerRef> = self.state.player_refs().collect();
        for p in players {
            let reward = if p.side == side { GOAL_REWARD } else { -GOAL_REWARD };
            ctx.frame.rewards[self.global_index(p)] = reward;
        }
    }

    /// Hand the puck to `p` and make it wait the receive delay.
    fn receive(&mut self, p: PlayerRef, ctx: &mut TickContext<'_>) {
        self.give_control(p, ctx);
        PlayerMut::new(&mut self.state, p).response_time(self.rules.receive_response_time);
    }

    /// Player of either team nearest `point`; the first in roster order wins ties.
    fn nearest_to(&self, point: &Vec2) -> Option<PlayerRef> {
        let mut best: Option<(PlayerRef, f64)> = None;
        for p in self.state.player_refs() {
            let dist = (self.state.position(p) - point).norm();
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((p, dist));
            }
        }
        best.map(|(p, _)| p)
    }
}
