//! Game orchestration.
//!
//! One [`Game::tick`] runs, in order: phase update, AI decisions, locomotion,
//! physics, action resolution and end-of-tick rules. Play is frozen outside
//! GAME_ON.

use std::collections::BTreeMap;

use rand::Rng;

use super::action::Action;
use super::config::{GameConfig, LayoutConstraint, Rules};
use super::events::GameEventType;
use super::game_state::{GameState, StateSnapshot};
use super::lineup::Lineup;
use super::phase::{next_transition, GamePhase, PhaseEffect, MAX_TRANSITIONS_PER_TICK};
use super::player::strategy::{AgentCommand, DecisionContext, PlayerBrain};
use super::player::PlayerMut;
use super::policy::decision_record;
use super::rink::Rink;
use super::simulation::{TickContext, TickLogic};
use super::types::{PlayerRef, TeamSide, Vec2};
use crate::error::{Result, SimError};

pub struct Game {
    rink: Rink,
    brains: [Vec<Box<dyn PlayerBrain>>; 2],
    /// Latest injected command per player name; kept until replaced.
    commands: BTreeMap<String, AgentCommand>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("rink", &self.rink)
            .field("brains", &self.brains.iter().map(|t| t.iter().map(|b| b.kind()).collect::<Vec<_>>()).collect::<Vec<_>>())
            .field("commands", &self.commands)
            .finish()
    }
}

impl Game {
    pub fn new(rules: Rules, config: GameConfig, lineup: Lineup) -> Result<Self> {
        rules.validate()?;
        if lineup.is_empty() {
            return Err(SimError::InvalidRoster("lineup has no players".into()));
        }
        let (rosters, brains) = lineup.into_parts();
        log::debug!(
            "new game: {} home / {} away, max_tick {}",
            rosters[0].len(),
            rosters[1].len(),
            rules.max_tick
        );
        Ok(Self { rink: Rink::new(rules, config, rosters), brains, commands: BTreeMap::new() })
    }

    pub fn rink(&self) -> &Rink {
        &self.rink
    }

    pub fn state(&self) -> &GameState {
        self.rink.state()
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        self.rink.state_mut()
    }

    pub fn rules(&self) -> &Rules {
        self.rink.rules()
    }

    pub fn phase(&self) -> GamePhase {
        self.rink.state().phase()
    }

    pub fn score(&self, side: TeamSide) -> u32 {
        self.rink.state().score(side)
    }

    /// Replace the pending external commands. Names that are not on the
    /// roster are ignored with a warning.
    pub fn set_commands(&mut self, commands: BTreeMap<String, AgentCommand>) {
        for name in commands.keys() {
            if self.rink.find_player(name).is_none() {
                log::warn!("command for unknown player {name} ignored");
            }
        }
        self.commands = commands;
    }

    pub fn commands(&self) -> &BTreeMap<String, AgentCommand> {
        &self.commands
    }

    /// Override state fields using the configured load policy.
    pub fn load_state(&mut self, snapshot: &StateSnapshot) -> Result<()> {
        let policy = self.rink.config().snapshot_load;
        self.rink.state_mut().load_snapshot(snapshot, policy)
    }

    // ===========================================
    // Phase machine
    // ===========================================

    fn update_phase(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let time_up = ctx.tick >= self.rink.rules().max_tick;
        let mut transitions = 0;

        loop {
            let current = self.rink.state().phase();
            let Some(transition) = next_transition(current, time_up) else {
                if current == GamePhase::GameOn && transitions == 0 {
                    // settled play: previous phase catches up
                    self.rink.state_mut().set_phase(GamePhase::GameOn);
                }
                return Ok(());
            };
            if transitions == MAX_TRANSITIONS_PER_TICK {
                return Err(SimError::TransitionLimit { limit: MAX_TRANSITIONS_PER_TICK });
            }
            transitions += 1;

            if transition.effect == PhaseEffect::PlayStart {
                self.on_play_start(ctx);
            }
            log::debug!("[tick {}] {} -> {}", ctx.tick, current, transition.to);
            self.rink.state_mut().set_phase(transition.to);
            match transition.effect {
                PhaseEffect::GameStart => ctx.emit(GameEventType::GameStart, None, None),
                PhaseEffect::GameEnd => ctx.emit(GameEventType::GameEnd, None, None),
                PhaseEffect::PlayStart | PhaseEffect::None => {}
            }
        }
    }

    fn on_play_start(&mut self, ctx: &mut TickContext<'_>) {
        let players: Vec<PlayerRef> = self.rink.state().player_refs().collect();
        for &p in &players {
            PlayerMut::new(&mut self.rink.state, p).reset();
        }
        self.scatter_players(&players, ctx);
        self.give_random_control(ctx);
    }

    /// Scatter each player over its defensive half, skewed by
    /// `start_spread_exponent`.
    fn scatter_players(&mut self, players: &[PlayerRef], ctx: &mut TickContext<'_>) {
        let exponent = self.rink.config().start_spread_exponent;
        let lo = self.rink.arena().min_x as i64;
        let hi = self.rink.arena().max_x as i64;

        for &p in players {
            let r = ctx.rng.gen_range(0.0..0.5_f64).powf(exponent);
            let attack_z = self.rink.arena().attacking_net(p.side).y;
            let z = attack_z * r - attack_z * (1.0 - r);
            let x = if lo < hi { ctx.rng.gen_range(lo..hi) } else { lo };
            self.rink.state_mut().set_position(p, Vec2::new(x as f64, z));
        }
    }

    /// Teams take turns starting with the puck: team `(home + away) % 2`,
    /// falling back to the other team when it has no players.
    fn give_random_control(&mut self, ctx: &mut TickContext<'_>) {
        let state = self.rink.state();
        let total = state.score(TeamSide::Home) + state.score(TeamSide::Away);
        let mut side = if total % 2 == 0 { TeamSide::Home } else { TeamSide::Away };
        if state.player_count(side) == 0 {
            side = side.opposite();
        }
        let count = state.player_count(side);
        if count == 0 {
            return;
        }
        let p = PlayerRef::new(side, ctx.rng.gen_range(0..count));
        self.rink.give_control(p, ctx);
        let receive = self.rink.rules().receive_response_time;
        PlayerMut::new(&mut self.rink.state, p).response_time(receive);
    }

    // ===========================================
    // Play
    // ===========================================

    fn update_ai(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        self.rink.update_ranks();
        let players: Vec<PlayerRef> = self.rink.state().player_refs().collect();

        for (g, &p) in players.iter().enumerate() {
            let locked = PlayerMut::new(&mut self.rink.state, p).begin_think();
            if !locked {
                let name = &self.rink.state().player(p).name;
                let decision_ctx = DecisionContext {
                    rink: &self.rink,
                    me: p,
                    command: self.commands.get(name),
                };
                let brain = &mut self.brains[p.side.index()][p.index];
                let decision = brain.decide(&decision_ctx, ctx.rng)?;
                PlayerMut::new(&mut self.rink.state, p).apply_decision(decision.action, decision.input);
            }
            PlayerMut::new(&mut self.rink.state, p).rectify_input();

            let state = self.rink.state();
            ctx.frame.decisions[g] = Some(decision_record(
                state.action(p),
                self.rink.arena().attack_dir(p.side),
                &state.input(p),
            ));
        }
        Ok(())
    }

    fn update_locomotion(&mut self) {
        let players: Vec<PlayerRef> = self.rink.state().player_refs().collect();
        for p in players {
            let mut player = PlayerMut::new(&mut self.rink.state, p);
            player.run_motion_model(&self.rink.rules);
            if self.rink.rules.layout_constraint == LayoutConstraint::Crossover {
                player.apply_crossover(&self.rink.arena);
            }
        }
    }

    /// Execute the puck carrier's chosen action.
    fn update_actions(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let Some(carrier) = self.rink.controller() else {
            return Ok(());
        };
        match self.rink.state().action(carrier) {
            Action::Shoot => {
                self.rink.resolve_shot(carrier, ctx)?;
            }
            action => {
                if let Some(target) = self.rink.pass_target(carrier, action) {
                    self.rink.resolve_pass(carrier, target, ctx)?;
                }
            }
        }
        Ok(())
    }

    /// Hook for end-of-tick rules; penalties and offsides are not modelled.
    fn update_rules(&mut self) {}
}

impl TickLogic for Game {
    fn player_count(&self) -> usize {
        self.rink.state().player_refs().count()
    }

    fn player_identities(&self) -> Vec<String> {
        self.rink.state().player_refs().map(|p| self.rink.name(p).to_string()).collect()
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        self.update_phase(ctx)?;
        if self.phase() != GamePhase::GameOn {
            return Ok(());
        }
        self.update_ai(ctx)?;
        self.update_locomotion();
        self.rink.update_physics(ctx)?;
        self.update_actions(ctx)?;
        self.update_rules();
        Ok(())
    }

    fn snapshot(&self) -> StateSnapshot {
        self.rink.state().snapshot()
    }
}
