//! Headless rink runner.
//!
//! Builds a lineup, plays one seeded game to GAME_OVER and prints the final
//! score. Events and history can be dumped as JSON for offline analysis.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use rink_core::api::{events_json, history_json};
use rink_core::engine::{
    Game, GameConfig, GamePhase, Lineup, Rules, Simulation, SimulationConfig, SnapshotLoadPolicy,
    StateSnapshot, TeamSide,
};

#[derive(Parser)]
#[command(name = "rink")]
#[command(about = "Run a seeded rink game headless", long_about = None)]
struct Cli {
    /// Players on the home team
    #[arg(long, default_value_t = 3)]
    home_players: usize,

    /// Players on the away team
    #[arg(long, default_value_t = 3)]
    away_players: usize,

    /// Home slots driven by external agents (idle without injected commands)
    #[arg(long, default_value_t = 0)]
    home_agents: usize,

    #[arg(long, default_value_t = 0)]
    away_agents: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Rules preset: standard, simple, direct_control, predictable_interception
    #[arg(long, default_value = "standard", conflicts_with = "rules")]
    preset: String,

    /// Rules file (.yaml, .yml or .json)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Override the tick at which play stops
    #[arg(long)]
    max_tick: Option<u64>,

    /// JSON state snapshot applied before the first tick
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Require --load-state to name every state field
    #[arg(long, default_value = "false", requires = "load_state")]
    strict_snapshots: bool,

    /// Write the event log here
    #[arg(long)]
    events_out: Option<PathBuf>,

    /// Write the per-tick history here
    #[arg(long)]
    history_out: Option<PathBuf>,
}

fn load_rules(cli: &Cli) -> Result<Rules> {
    let mut rules = match &cli.rules {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading rules from {}", path.display()))?;
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            let parsed =
                if is_json { Rules::from_json_str(&text) } else { Rules::from_yaml_str(&text) };
            parsed.with_context(|| format!("parsing rules from {}", path.display()))?
        }
        None => match Rules::preset(&cli.preset) {
            Some(rules) => rules,
            None => bail!("unknown rules preset '{}'", cli.preset),
        },
    };
    if let Some(max_tick) = cli.max_tick {
        rules.max_tick = max_tick;
    }
    Ok(rules)
}

/// Parse a JSON snapshot and load it with the game's configured policy.
fn apply_snapshot(game: &mut Game, text: &str) -> Result<()> {
    let snapshot: StateSnapshot = serde_json::from_str(text).context("parsing state snapshot")?;
    game.load_state(&snapshot).context("loading state snapshot")?;
    Ok(())
}

fn write_json(path: &Path, json: String) -> Result<()> {
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let rules = load_rules(&cli)?;
    let config = GameConfig {
        snapshot_load: if cli.strict_snapshots {
            SnapshotLoadPolicy::Strict
        } else {
            SnapshotLoadPolicy::Permissive
        },
        ..Default::default()
    };

    let lineup =
        Lineup::new(cli.home_players, cli.away_players, cli.home_agents, cli.away_agents)
            .context("building lineup")?;
    let mut game = Game::new(rules, config, lineup).context("creating game")?;
    if let Some(path) = &cli.load_state {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading state from {}", path.display()))?;
        apply_snapshot(&mut game, &text)?;
        info!("loaded state from {}", path.display());
    }
    let mut sim = Simulation::new(
        game,
        SimulationConfig { seed: cli.seed, record_history: cli.history_out.is_some() },
    );

    info!(
        "{}v{} game, seed {}, max tick {}",
        cli.home_players,
        cli.away_players,
        cli.seed,
        sim.logic().rules().max_tick
    );
    let ticks = sim
        .run_until(|s| s.logic().phase() == GamePhase::GameOver)
        .context("running game")?;

    let game = sim.logic();
    println!(
        "home {} - {} away ({} ticks, {} events)",
        game.score(TeamSide::Home),
        game.score(TeamSide::Away),
        ticks,
        sim.events().len()
    );

    if let Some(path) = &cli.events_out {
        write_json(path, events_json(&sim)?)?;
    }
    if let Some(path) = &cli.history_out {
        write_json(path, history_json(&sim)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(policy: SnapshotLoadPolicy) -> Game {
        let config = GameConfig { snapshot_load: policy, ..Default::default() };
        Game::new(Rules::standard(), config, Lineup::new(2, 2, 0, 0).unwrap()).unwrap()
    }

    #[test]
    fn test_strict_flag_needs_a_state_file() {
        assert!(Cli::try_parse_from(["rink", "--strict-snapshots"]).is_err());
        let cli =
            Cli::try_parse_from(["rink", "--strict-snapshots", "--load-state", "s.json"]).unwrap();
        assert!(cli.strict_snapshots);
        assert_eq!(cli.load_state, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn test_partial_snapshot_follows_policy() {
        let partial = r#"{"home_score": 2}"#;

        let mut permissive = game(SnapshotLoadPolicy::Permissive);
        apply_snapshot(&mut permissive, partial).unwrap();
        assert_eq!(permissive.score(TeamSide::Home), 2);

        let mut strict = game(SnapshotLoadPolicy::Strict);
        assert!(apply_snapshot(&mut strict, partial).is_err());
        assert_eq!(strict.score(TeamSide::Home), 0);

        let full = serde_json::to_string(&permissive.state().snapshot()).unwrap();
        apply_snapshot(&mut strict, &full).unwrap();
        assert_eq!(strict.score(TeamSide::Home), 2);
    }
}
