//! # rink_core - Deterministic Rink Sports Simulation Engine
//!
//! A simplified two-team, continuous-space hockey-like game built as a fast
//! substrate for reinforcement-learning experiments.
//!
//! ## Features
//! - Discrete-tick phase machine (faceoff, play, goal and time-up stoppages)
//! - Probabilistic interception for passes and shots, body checks, boards
//! - Pluggable player brains (scripted, external agent, human device)
//! - Fully deterministic from a single seeded RNG
//! - JSON adapter for state export, command injection and state override
//!
//! ```rust
//! use rink_core::engine::{Game, GameConfig, GamePhase, Lineup, Rules, Simulation, SimulationConfig};
//!
//! let rules = Rules { max_tick: 60, ..Rules::standard() };
//! let game = Game::new(rules, GameConfig::default(), Lineup::new(3, 3, 0, 0)?)?;
//! let mut sim = Simulation::new(game, SimulationConfig::with_seed(7));
//! sim.run_until(|s| s.logic().phase() == GamePhase::GameOver)?;
//! assert_eq!(sim.tick(), 61);
//! # Ok::<(), rink_core::SimError>(())
//! ```

pub mod api;
pub mod engine;
pub mod error;

pub use api::{export_state_json, inject_json, ActionInjection, StateExport};
pub use engine::{Game, Lineup, Rules, Simulation, SimulationConfig};
pub use error::{Result, SimError};
