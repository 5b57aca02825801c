//! Shared engine types: team sides, roster slots and the planar vector alias.

use serde::{Deserialize, Serialize};

/// World-space vector. Component 0 is x (across the rink), component 1 is z
/// (along the rink, towards the home net).
pub type Vec2 = nalgebra::Vector2<f64>;

/// Fallback axis for degenerate directions (coincident points).
pub const FALLBACK_AXIS: [f64; 2] = [1.0, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub const BOTH: [TeamSide; 2] = [TeamSide::Home, TeamSide::Away];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            TeamSide::Home => 0,
            TeamSide::Away => 1,
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(TeamSide::Home),
            1 => Some(TeamSide::Away),
            _ => None,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    /// Field-name prefix used by the state schema.
    pub const fn name(self) -> &'static str {
        match self {
            TeamSide::Home => "home",
            TeamSide::Away => "away",
        }
    }
}

/// Positional address of a player: team plus index within that team's roster.
///
/// This is the only key the state store understands. Rosters never change
/// after construction, so a `PlayerRef` stays valid for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerRef {
    pub side: TeamSide,
    pub index: usize,
}

impl PlayerRef {
    pub const fn new(side: TeamSide, index: usize) -> Self {
        Self { side, index }
    }

    /// State field prefix, e.g. `home0`, `away2`.
    pub fn field_prefix(&self) -> String {
        format!("{}{}", self.side.name(), self.index)
    }
}

/// Unit direction from `from` to `to`, or the fallback axis when the points
/// are closer than `epsilon`.
pub fn direction_or_fallback(from: &Vec2, to: &Vec2, epsilon: f64) -> Vec2 {
    let delta = to - from;
    let dist = delta.norm();
    if dist > epsilon {
        delta / dist
    } else {
        Vec2::new(FALLBACK_AXIS[0], FALLBACK_AXIS[1])
    }
}
