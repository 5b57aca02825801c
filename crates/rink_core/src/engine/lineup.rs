//! Team sheets: who plays, on which side, with which brain.

use std::fmt;

use super::action::Action;
use super::player::strategy::{ExternalAgent, PlayerBrain, ScriptedHeuristic};
use super::types::TeamSide;
use crate::error::{Result, SimError};

/// One passer plus one target per pass label.
pub const MAX_TEAM_SIZE: usize = Action::PASSES.len() + 1;

pub struct LineupEntry {
    pub name: String,
    pub brain: Box<dyn PlayerBrain>,
}

impl fmt::Debug for LineupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineupEntry")
            .field("name", &self.name)
            .field("brain", &self.brain.kind())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Lineup {
    teams: [Vec<LineupEntry>; 2],
}

impl Lineup {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard sheet: the first `*_agents` slots of a team are external
    /// agents (`h_ai_1`, ...), the rest scripted players numbered on from
    /// there (`h_npc_2`, ...).
    pub fn new(
        home_players: usize,
        away_players: usize,
        home_agents: usize,
        away_agents: usize,
    ) -> Result<Self> {
        let mut lineup = Self::empty();
        for (side, players, agents, prefix) in [
            (TeamSide::Home, home_players, home_agents, "h"),
            (TeamSide::Away, away_players, away_agents, "a"),
        ] {
            if agents > players {
                return Err(SimError::InvalidRoster(format!(
                    "{} agents requested for {} {} players",
                    agents,
                    players,
                    side.name()
                )));
            }
            for n in 1..=players {
                if n <= agents {
                    lineup.push(side, format!("{prefix}_ai_{n}"), Box::new(ExternalAgent))?;
                } else {
                    lineup.push(
                        side,
                        format!("{prefix}_npc_{n}"),
                        Box::new(ScriptedHeuristic::default()),
                    )?;
                }
            }
        }
        Ok(lineup)
    }

    pub fn push(
        &mut self,
        side: TeamSide,
        name: impl Into<String>,
        brain: Box<dyn PlayerBrain>,
    ) -> Result<()> {
        let name = name.into();
        if self.teams.iter().flatten().any(|e| e.name == name) {
            return Err(SimError::InvalidRoster(format!("duplicate player name {name}")));
        }
        if self.teams[side.index()].len() >= MAX_TEAM_SIZE {
            return Err(SimError::InvalidRoster(format!(
                "{} already has {} players",
                side.name(),
                MAX_TEAM_SIZE
            )));
        }
        self.teams[side.index()].push(LineupEntry { name, brain });
        Ok(())
    }

    pub fn with_player(
        mut self,
        side: TeamSide,
        name: impl Into<String>,
        brain: Box<dyn PlayerBrain>,
    ) -> Result<Self> {
        self.push(side, name, brain)?;
        Ok(self)
    }

    pub fn team(&self, side: TeamSide) -> &[LineupEntry] {
        &self.teams[side.index()]
    }

    pub fn len(&self) -> usize {
        self.teams.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split into state rosters `(name, is_human)` and brains, both per side.
    pub(crate) fn into_parts(self) -> ([Vec<(String, bool)>; 2], [Vec<Box<dyn PlayerBrain>>; 2]) {
        let [home, away] = self.teams;
        let split = |team: Vec<LineupEntry>| {
            team.into_iter()
                .map(|e| ((e.name, e.brain.is_human()), e.brain))
                .unzip::<_, _, Vec<_>, Vec<_>>()
        };
        let (home_roster, home_brains) = split(home);
        let (away_roster, away_brains) = split(away);
        ([home_roster, away_roster], [home_brains, away_brains])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(lineup: &Lineup, side: TeamSide) -> Vec<&str> {
        lineup.team(side).iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_standard_names() {
        let lineup = Lineup::new(3, 2, 1, 0).unwrap();
        assert_eq!(names(&lineup, TeamSide::Home), vec!["h_ai_1", "h_npc_2", "h_npc_3"]);
        assert_eq!(names(&lineup, TeamSide::Away), vec!["a_npc_1", "a_npc_2"]);
        assert_eq!(lineup.team(TeamSide::Home)[0].brain.kind(), "external");
        assert_eq!(lineup.len(), 5);
    }

    #[test]
    fn test_rejects_bad_rosters() {
        assert!(matches!(Lineup::new(7, 3, 0, 0), Err(SimError::InvalidRoster(_))));
        assert!(matches!(Lineup::new(2, 2, 3, 0), Err(SimError::InvalidRoster(_))));

        let dup = Lineup::empty()
            .with_player(TeamSide::Home, "x", Box::new(ExternalAgent))
            .unwrap()
            .with_player(TeamSide::Away, "x", Box::new(ExternalAgent));
        assert!(matches!(dup, Err(SimError::InvalidRoster(_))));
    }

    #[test]
    fn test_into_parts_keeps_order() {
        let (rosters, brains) = Lineup::new(2, 1, 0, 1).unwrap().into_parts();
        assert_eq!(rosters[0], vec![("h_npc_1".to_string(), false), ("h_npc_2".to_string(), false)]);
        assert_eq!(rosters[1], vec![("a_ai_1".to_string(), false)]);
        assert_eq!(brains[1][0].kind(), "external");
    }
}
