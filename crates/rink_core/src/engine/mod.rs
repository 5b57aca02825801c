//! Simulation engine: geometry, rules, state, physics, players and the
//! phase-driven game loop.

pub mod action;
pub mod arena;
pub mod config;
pub mod control;
pub mod events;
pub mod game;
pub mod game_state;
pub mod lineup;
pub mod phase;
pub mod physics;
pub mod player;
pub mod policy;
pub mod resolution;
pub mod rink;
pub mod simulation;
pub mod types;


pub use action::Action;
pub use arena::Arena;
pub use config::{GameConfig, Rules, SnapshotLoadPolicy};
pub use events::{EventFilter, GameEvent, GameEventHistory, GameEventType};
pub use game::Game;
pub use game_state::{FieldValue, GameState, StateSnapshot};
pub use lineup::Lineup;
pub use phase::GamePhase;
pub use player::strategy::{
    AgentCommand, Decision, DecisionContext, ExternalAgent, HeuristicParams, HumanDevice,
    InputDevice, PlayerBrain, ScriptedHeuristic,
};
pub use rink::Rink;
pub use simulation::{GameHistoryEntry, Simulation, SimulationConfig, TickContext, TickLogic};
pub use types::{PlayerRef, TeamSide, Vec2};
