//! Discrete player actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Closed action set. Declaration order is the ordinal used by history
/// entries and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "SHOOT")]
    Shoot,
    #[serde(rename = "PASS_1")]
    Pass1,
    #[serde(rename = "PASS_2")]
    Pass2,
    #[serde(rename = "PASS_3")]
    Pass3,
    #[serde(rename = "PASS_4")]
    Pass4,
    #[serde(rename = "PASS_5")]
    Pass5,
    #[serde(rename = "BLOCK")]
    Block,
    #[serde(rename = "STUNNED")]
    Stunned,
    #[default]
    #[serde(rename = "NONE")]
    None,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Shoot,
        Action::Pass1,
        Action::Pass2,
        Action::Pass3,
        Action::Pass4,
        Action::Pass5,
        Action::Block,
        Action::Stunned,
        Action::None,
    ];

    pub const PASSES: [Action; 5] =
        [Action::Pass1, Action::Pass2, Action::Pass3, Action::Pass4, Action::Pass5];

    pub const COUNT: usize = Self::ALL.len();

    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Zero-based teammate slot for `PASS_k` (k - 1), `None` for other actions.
    pub fn pass_slot(self) -> Option<usize> {
        Self::PASSES.iter().position(|a| *a == self)
    }

    pub fn from_pass_slot(slot: usize) -> Option<Self> {
        Self::PASSES.get(slot).copied()
    }

    pub fn is_pass(self) -> bool {
        self.pass_slot().is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Shoot => "SHOOT",
            Action::Pass1 => "PASS_1",
            Action::Pass2 => "PASS_2",
            Action::Pass3 => "PASS_3",
            Action::Pass4 => "PASS_4",
            Action::Pass5 => "PASS_5",
            Action::Block => "BLOCK",
            Action::Stunned => "STUNNED",
            Action::None => "NONE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| SimError::UnknownAction(s.to_string()))
    }
}
