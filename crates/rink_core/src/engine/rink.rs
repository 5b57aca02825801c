//! The rink: rules, geometry and state for one game, plus the read-only
//! queries the game and the decision strategies share.
//!
//! Behaviour is split across files as separate `impl Rink` blocks:
//! `control.rs` (possession), `physics.rs` (boards, collisions,
//! interception) and `resolution.rs` (shots, passes, checks, goals).

use super::action::Action;
use super::arena::Arena;
use super::config::{GameConfig, Rules};
use super::game_state::GameState;
use super::physics::through_chance;
use super::types::{PlayerRef, TeamSide, Vec2};
use crate::error::{Result, SimError};

#[derive(Debug, Clone)]
pub struct Rink {
    pub(crate) rules: Rules,
    pub(crate) arena: Arena,
    pub(crate) config: GameConfig,
    pub(crate) state: GameState,
    /// Per team, rank of each roster slot by distance to the controller.
    ranks: [Vec<usize>; 2],
}

impl Rink {
    pub fn new(rules: Rules, config: GameConfig, rosters: [Vec<(String, bool)>; 2]) -> Self {
        let arena = Arena::new(rules.arena_size);
        let state = GameState::new(&arena, rosters);
        let ranks = [
            vec![0; state.player_count(TeamSide::Home)],
            vec![0; state.player_count(TeamSide::Away)],
        ];
        Self { rules, arena, config, state, ranks }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn name(&self, p: PlayerRef) -> &str {
        &self.state.player(p).name
    }

    pub fn find_player(&self, name: &str) -> Option<PlayerRef> {
        self.state.player_refs().find(|p| self.name(*p) == name)
    }

    /// Position in global roster order (home first).
    pub fn global_index(&self, p: PlayerRef) -> usize {
        match p.side {
            TeamSide::Home => p.index,
            TeamSide::Away => self.state.player_count(TeamSide::Home) + p.index,
        }
    }

    pub fn team_refs(&self, side: TeamSide) -> impl Iterator<Item = PlayerRef> {
        (0..self.state.player_count(side)).map(move |i| PlayerRef::new(side, i))
    }

    // ===========================================
    // Passing lanes
    // ===========================================

    /// Teammates in roster order, skipping `passer`. Entry k is the target of
    /// `PASS_{k+1}`.
    pub fn pass_options(&self, passer: PlayerRef) -> Vec<PlayerRef> {
        self.team_refs(passer.side).filter(|p| *p != passer).collect()
    }

    pub fn pass_target(&self, passer: PlayerRef, action: Action) -> Option<PlayerRef> {
        let slot = action.pass_slot()?;
        self.pass_options(passer).get(slot).copied()
    }

    /// Opponents of `side` that are free to act, with their positions.
    pub fn capable_opponents(&self, side: TeamSide) -> Vec<(PlayerRef, Vec2)> {
        self.team_refs(side.opposite())
            .filter(|p| self.state.action_time(*p) == 0)
            .map(|p| (p, self.state.position(p)))
            .collect()
    }

    // ===========================================
    // Simulated outcomes (pure)
    // ===========================================

    /// Chance that a shot by `shooter` from where it stands scores. Draws
    /// nothing and does not require possession.
    pub fn simulate_shot(&self, shooter: PlayerRef) -> f64 {
        let pos = self.state.position(shooter);
        let net = self.arena.attacking_net(shooter.side);
        let blockers = self.capable_opponents(shooter.side);
        through_chance(&self.rules, &pos, &net, &blockers) * self.on_net_chance(shooter)
    }

    /// Chance that a pass from `source` to `target` gets through.
    pub fn simulate_pass(&self, source: PlayerRef, target: PlayerRef) -> Result<f64> {
        self.require_control(source, "pass")?;
        let from = self.state.position(source);
        let to = self.state.position(target);
        Ok(through_chance(&self.rules, &from, &to, &self.capable_opponents(source.side)))
    }

    pub(crate) fn require_control(&self, p: PlayerRef, operation: &'static str) -> Result<()> {
        if self.has_control(p) {
            Ok(())
        } else {
            Err(SimError::NotInControl { player: self.name(p).to_string(), operation })
        }
    }

    // ===========================================
    // Ranking
    // ===========================================

    /// Rank every player within its team by `(distance to controller, name)`.
    /// Ranks are left untouched while control is neutral.
    pub(crate) fn update_ranks(&mut self) {
        let Some(controller) = self.controller() else {
            return;
        };
        let carrier = self.state.position(controller);
        for side in TeamSide::BOTH {
            let mut order: Vec<(f64, &str, usize)> = self
                .team_refs(side)
                .map(|p| ((self.state.position(p) - carrier).norm(), self.name(p), p.index))
                .collect();
            order.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));

            let mut ranks = vec![0; order.len()];
            for (rank, (_, _, index)) in order.into_iter().enumerate() {
                ranks[index] = rank;
            }
            self.ranks[side.index()] = ranks;
        }
    }

    pub fn rank(&self, p: PlayerRef) -> usize {
        self.ranks[p.side.index()][p.index]
    }
}
