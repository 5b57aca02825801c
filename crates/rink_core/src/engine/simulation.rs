//! Generic tick harness.
//!
//! [`Simulation`] owns everything that outlives a single tick and is not part
//! of the game state proper: the tick counter, the one seeded RNG, the event
//! log and the per-tick history. Game logic plugs in through [`TickLogic`]
//! and receives those pieces through a [`TickContext`] each tick.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, GameEventHistory, GameEventType};
use super::game_state::StateSnapshot;
use super::policy::DecisionRecord;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub seed: u64,
    pub record_history: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { seed: 0, record_history: true }
    }
}

impl SimulationConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Default::default() }
    }
}

/// Transient per-player arrays, indexed in global roster order and cleared
/// at the start of every tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickFrame {
    pub decisions: Vec<Option<DecisionRecord>>,
    pub rewards: Vec<f64>,
}

impl TickFrame {
    fn reset(&mut self, players: usize) {
        self.decisions.clear();
        self.decisions.resize(players, None);
        self.rewards.clear();
        self.rewards.resize(players, 0.0);
    }
}

pub struct TickContext<'a> {
    pub tick: u64,
    pub rng: &'a mut ChaCha8Rng,
    pub events: &'a mut GameEventHistory,
    pub frame: &'a mut TickFrame,
}

impl TickContext<'_> {
    pub fn emit(&mut self, event_type: GameEventType, source: Option<&str>, target: Option<&str>) {
        self.events.push(GameEvent::new(self.tick, event_type, source, target));
    }
}

/// Game-specific behaviour driven by the harness.
pub trait TickLogic {
    fn player_count(&self) -> usize;

    /// Player names in global roster order.
    fn player_identities(&self) -> Vec<String>;

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()>;

    fn snapshot(&self) -> StateSnapshot;

    /// Completion predicate consulted by [`Simulation::run_until`].
    fn is_complete(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameHistoryEntry {
    pub tick: u64,
    /// State produced by this tick.
    pub state: StateSnapshot,
    pub players: Vec<String>,
    /// `None` for players that did not think this tick (play frozen).
    pub decisions: Vec<Option<DecisionRecord>>,
    pub rewards: Vec<f64>,
}

pub struct Simulation<G: TickLogic> {
    logic: G,
    config: SimulationConfig,
    tick: u64,
    rng: ChaCha8Rng,
    events: GameEventHistory,
    history: Vec<GameHistoryEntry>,
    frame: TickFrame,
}

impl<G: TickLogic> Simulation<G> {
    pub fn new(logic: G, config: SimulationConfig) -> Self {
        log::debug!("simulation seeded with {}", config.seed);
        Self {
            logic,
            config,
            tick: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            events: GameEventHistory::new(),
            history: Vec::new(),
            frame: TickFrame::default(),
        }
    }

    /// Run exactly one tick.
    pub fn advance(&mut self) -> Result<()> {
        self.frame.reset(self.logic.player_count());

        let mut ctx = TickContext {
            tick: self.tick,
            rng: &mut self.rng,
            events: &mut self.events,
            frame: &mut self.frame,
        };
        self.logic.tick(&mut ctx)?;

        if self.config.record_history {
            self.history.push(GameHistoryEntry {
                tick: self.tick,
                state: self.logic.snapshot(),
                players: self.logic.player_identities(),
                decisions: self.frame.decisions.clone(),
                rewards: self.frame.rewards.clone(),
            });
        }
        self.tick += 1;
        Ok(())
    }

    /// Advance until `done` holds or the logic reports completion. Returns
    /// the number of ticks run.
    pub fn run_until<F>(&mut self, mut done: F) -> Result<u64>
    where
        F: FnMut(&Self) -> bool,
    {
        let start = self.tick;
        while !self.logic.is_complete() && !done(self) {
            self.advance()?;
        }
        Ok(self.tick - start)
    }

    pub fn run_ticks(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.advance()?;
        }
        Ok(())
    }

    /// Index of the next tick to run.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn logic(&self) -> &G {
        &self.logic
    }

    pub fn logic_mut(&mut self) -> &mut G {
        &mut self.logic
    }

    pub fn events(&self) -> &GameEventHistory {
        &self.events
    }

    pub fn history(&self) -> &[GameHistoryEntry] {
        &self.history
    }

    /// Per-player arrays of the most recent tick.
    pub fn last_frame(&self) -> &TickFrame {
        &self.frame
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
