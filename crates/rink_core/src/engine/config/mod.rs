//! # Engine configuration
//!
//! Two layers:
//! - [`Rules`]: the constants the game is played under (presets + YAML/JSON loading)
//! - [`GameConfig`]: engine knobs that are not part of the game itself
//!
//! ```rust
//! use rink_core::engine::config::{GameConfig, Rules, SnapshotLoadPolicy};
//!
//! let rules = Rules::simple();
//! let config = GameConfig { snapshot_load: SnapshotLoadPolicy::Strict, ..Default::default() };
//! assert!(rules.enable_player_collisions);
//! assert_eq!(config.start_spread_exponent, 1.0);
//! ```

mod rules;

pub use rules::{LayoutConstraint, MotionModel, Rules};

use serde::{Deserialize, Serialize};

/// How an external state override treats its key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotLoadPolicy {
    /// Write every known key, keep missing fields, ignore unknown keys.
    #[default]
    Permissive,
    /// Key set must equal the schema exactly.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub snapshot_load: SnapshotLoadPolicy,
    /// Skew of the play-start scatter; 1.0 is uniform over the defensive half.
    pub start_spread_exponent: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { snapshot_load: SnapshotLoadPolicy::Permissive, start_spread_exponent: 1.0 }
    }
}
