//! Game phase machine.
//!
//! The transition table is a pure function; the game applies the side effect
//! of each transition and keeps re-evaluating until the phase settles, at
//! most [`MAX_TRANSITIONS_PER_TICK`] times per tick.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

pub const MAX_TRANSITIONS_PER_TICK: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    PreGame,
    StartPlay,
    GameOn,
    StoppageGoal,
    StoppageTimeup,
    GameOver,
}

impl GamePhase {
    pub const ALL: [GamePhase; 6] = [
        GamePhase::PreGame,
        GamePhase::StartPlay,
        GamePhase::GameOn,
        GamePhase::StoppageGoal,
        GamePhase::StoppageTimeup,
        GamePhase::GameOver,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::PreGame => "PRE_GAME",
            GamePhase::StartPlay => "START_PLAY",
            GamePhase::GameOn => "GAME_ON",
            GamePhase::StoppageGoal => "STOPPAGE_GOAL",
            GamePhase::StoppageTimeup => "STOPPAGE_TIMEUP",
            GamePhase::GameOver => "GAME_OVER",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GamePhase {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| SimError::UnrecognizedPhase(s.to_string()))
    }
}

/// Work the game performs when a transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEffect {
    None,
    /// Log GAME_START.
    GameStart,
    /// Reset players, scatter them and award control.
    PlayStart,
    /// Log GAME_END.
    GameEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: GamePhase,
    pub effect: PhaseEffect,
}

/// Next transition out of `current`, or `None` once the phase is settled for
/// this tick. `time_up` is `tick >= max_tick`.
pub fn next_transition(current: GamePhase, time_up: bool) -> Option<Transition> {
    let (to, effect) = match current {
        GamePhase::PreGame => (GamePhase::StartPlay, PhaseEffect::GameStart),
        GamePhase::StartPlay => (GamePhase::GameOn, PhaseEffect::PlayStart),
        GamePhase::GameOn if time_up => (GamePhase::StoppageTimeup, PhaseEffect::GameEnd),
        GamePhase::GameOn => return None,
        GamePhase::StoppageGoal => (GamePhase::StartPlay, PhaseEffect::None),
        GamePhase::StoppageTimeup => (GamePhase::GameOver, PhaseEffect::None),
        GamePhase::GameOver => return None,
    };
    Some(Transition { to, effect })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(mut phase: GamePhase, time_up: bool) -> Vec<GamePhase> {
        let mut seen = vec![phase];
        for _ in 0..MAX_TRANSITIONS_PER_TICK {
            match next_transition(phase, time_up) {
                Some(t) => {
                    phase = t.to;
                    seen.push(phase);
                }
                None => break,
            }
        }
        seen
    }

    #[test]
    fn test_pregame_settles_in_game_on() {
        assert_eq!(
            walk(GamePhase::PreGame, false),
            vec![GamePhase::PreGame, GamePhase::StartPlay, GamePhase::GameOn]
        );
    }

    #[test]
    fn test_goal_restarts_play() {
        assert_eq!(
            walk(GamePhase::StoppageGoal, false),
            vec![GamePhase::StoppageGoal, GamePhase::StartPlay, GamePhase::GameOn]
        );
    }

    #[test]
    fn test_time_up_ends_game() {
        assert_eq!(
            walk(GamePhase::GameOn, true),
            vec![GamePhase::GameOn, GamePhase::StoppageTimeup, GamePhase::GameOver]
        );
        assert_eq!(next_transition(GamePhase::GameOver, true), None);
    }

    #[test]
    fn test_effects() {
        assert_eq!(next_transition(GamePhase::PreGame, false).unwrap().effect, PhaseEffect::GameStart);
        assert_eq!(next_transition(GamePhase::StartPlay, false).unwrap().effect, PhaseEffect::PlayStart);
        assert_eq!(next_transition(GamePhase::GameOn, true).unwrap().effect, PhaseEffect::GameEnd);
    }

    #[test]
    fn test_every_path_settles_within_limit() {
        for phase in GamePhase::ALL {
            for time_up in [false, true] {
                assert!(walk(phase, time_up).len() <= 4);
            }
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!("STOPPAGE_GOAL".parse::<GamePhase>().unwrap(), GamePhase::StoppageGoal);
        assert_eq!(
            "HALF_TIME".parse::<GamePhase>(),
            Err(SimError::UnrecognizedPhase("HALF_TIME".into()))
        );
        assert_eq!(serde_json::to_string(&GamePhase::GameOn).unwrap(), "\"GAME_ON\"");
    }
}
