//! JSON adapter surface.
//!
//! Serde types for driving a [`Simulation<Game>`] from outside: state export
//! after a tick, per-player command injection and state override before the
//! next one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::action::Action;
use crate::engine::game::Game;
use crate::engine::game_state::StateSnapshot;
use crate::engine::player::strategy::AgentCommand;
use crate::engine::simulation::Simulation;
use crate::engine::types::{TeamSide, Vec2};
use crate::error::{Result, SimError};

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

/// Command for one player as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerCommand {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub input: Option<[f64; 2]>,
}

impl PlayerCommand {
    fn parse(&self) -> Result<AgentCommand> {
        let action = self.action.as_deref().map(str::parse::<Action>).transpose()?;
        let input = self.input.map(|[x, z]| Vec2::new(x, z));
        Ok(AgentCommand { action, input })
    }
}

/// Everything an external driver may send before a tick:
/// `{"h_ai_1": {"action": "SHOOT", "input": [1, 0]}, "load_state": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionInjection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_state: Option<StateSnapshot>,
    #[serde(flatten)]
    pub players: BTreeMap<String, PlayerCommand>,
}

impl ActionInjection {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply to `game`: state override first, then replace the pending
    /// commands. Nothing is applied if any action label is unknown.
    pub fn apply(&self, game: &mut Game) -> Result<()> {
        let commands = self
            .players
            .iter()
            .map(|(name, cmd)| -> Result<(String, AgentCommand)> {
                Ok((name.clone(), cmd.parse()?))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        if let Some(snapshot) = &self.load_state {
            debug!(fields = snapshot.len(), "loading external state");
            game.load_state(snapshot)?;
        }
        game.set_commands(commands);
        Ok(())
    }
}

/// What a driver sees after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateExport {
    pub schema_version: String,
    pub tick: u64,
    pub state: StateSnapshot,
    /// Player names per team, home first.
    pub teams: Vec<Vec<String>>,
    /// Player name → state field prefix.
    pub prefixes: BTreeMap<String, String>,
    /// Player name → chance a shot taken right now would score.
    pub score_prob: BTreeMap<String, f64>,
}

impl StateExport {
    pub fn capture(sim: &Simulation<Game>) -> Self {
        let rink = sim.logic().rink();
        let state = rink.state();

        let teams = TeamSide::BOTH
            .iter()
            .map(|side| rink.team_refs(*side).map(|p| rink.name(p).to_string()).collect())
            .collect();
        let prefixes =
            state.player_refs().map(|p| (rink.name(p).to_string(), p.field_prefix())).collect();
        let score_prob =
            state.player_refs().map(|p| (rink.name(p).to_string(), rink.simulate_shot(p))).collect();

        Self {
            schema_version: API_VERSION.to_string(),
            tick: sim.tick(),
            state: state.snapshot(),
            teams,
            prefixes,
            score_prob,
        }
    }
}

pub fn export_state_json(sim: &Simulation<Game>) -> Result<String> {
    Ok(serde_json::to_string(&StateExport::capture(sim))?)
}

pub fn inject_json(sim: &mut Simulation<Game>, text: &str) -> Result<()> {
    let injection = ActionInjection::from_json(text).map_err(|e| {
        warn!(error = %e, "rejected action injection");
        e
    })?;
    injection.apply(sim.logic_mut())
}

/// Serialized event log, in order.
pub fn events_json(sim: &Simulation<Game>) -> Result<String> {
    Ok(serde_json::to_string(sim.events())?)
}

pub fn history_json(sim: &Simulation<Game>) -> Result<String> {
    serde_json::to_string(sim.history()).map_err(SimError::from)
}
