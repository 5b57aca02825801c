//! Game rules: the immutable constants a game is played under.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotionModel {
    /// Inertial: input steers an acceleration limited by `max_accel`.
    Acceleration,
    /// No inertia: velocity follows input directly.
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutConstraint {
    None,
    /// Players are pinned to diagonal lanes that cross between roster slots.
    Crossover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Tick at which GAME_ON turns into STOPPAGE_TIMEUP.
    pub max_tick: u64,
    /// (width, depth) of the rink.
    pub arena_size: (f64, f64),
    pub player_radius: f64,
    pub max_vel: f64,
    pub max_accel: f64,

    // === Interception curve ===
    /// Interception chance at zero effective distance.
    pub min_intercept_chance: f64,
    /// Interception chance at `max_intercept_dist`.
    pub max_intercept_chance: f64,
    pub max_intercept_dist: f64,
    /// Closing-speed credit per unit of trajectory travelled.
    pub player_intercept_speed: f64,

    // === Action timing (ticks) ===
    pub check_stun_time: u32,
    pub shot_response_time: u32,
    pub pass_response_time: u32,
    pub receive_response_time: u32,

    pub shot_distance_accuracy_scale: f64,
    pub enable_player_collisions: bool,
    pub motion_model: MotionModel,
    pub layout_constraint: LayoutConstraint,
}

impl Default for Rules {
    fn default() -> Self {
        Self::standard()
    }
}

impl Rules {
    /// Default competitive ruleset.
    pub fn standard() -> Self {
        Self {
            max_tick: 15 * 30,
            arena_size: (18.0, 36.0),
            player_radius: 0.75,
            max_vel: 0.5,
            max_accel: 0.05,
            min_intercept_chance: 0.5,
            max_intercept_chance: 1.0,
            max_intercept_dist: 3.5,
            player_intercept_speed: 0.05,
            check_stun_time: 20,
            shot_response_time: 10,
            pass_response_time: 10,
            receive_response_time: 15,
            shot_distance_accuracy_scale: 4.0,
            enable_player_collisions: true,
            motion_model: MotionModel::Acceleration,
            layout_constraint: LayoutConstraint::None,
        }
    }

    /// Softer interception curve.
    pub fn simple() -> Self {
        Self {
            min_intercept_chance: 0.0,
            max_intercept_chance: 0.9,
            max_intercept_dist: 5.0,
            player_intercept_speed: 0.1,
            ..Self::standard()
        }
    }

    /// Arcade control: no inertia, no collisions, lane-constrained layout.
    pub fn direct_control() -> Self {
        Self {
            max_tick: 15 * 20,
            motion_model: MotionModel::Direct,
            layout_constraint: LayoutConstraint::Crossover,
            enable_player_collisions: false,
            ..Self::simple()
        }
    }

    /// Anyone close enough to the lane always intercepts.
    pub fn predictable_interception() -> Self {
        Self {
            min_intercept_chance: 1.0,
            max_intercept_chance: 1.0,
            max_intercept_dist: 2.5,
            player_intercept_speed: 0.0,
            ..Self::standard()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::standard()),
            "simple" => Some(Self::simple()),
            "direct_control" => Some(Self::direct_control()),
            "predictable_interception" => Some(Self::predictable_interception()),
            _ => None,
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let rules: Self = serde_yaml::from_str(text)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let rules: Self = serde_json::from_str(text)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Reject constants the motion and interception formulas divide by or
    /// treat as probabilities.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("arena_size.0", self.arena_size.0),
            ("arena_size.1", self.arena_size.1),
            ("max_vel", self.max_vel),
            ("max_accel", self.max_accel),
            ("max_intercept_dist", self.max_intercept_dist),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(SimError::Config(format!("{name} must be positive, got {v}")));
            }
        }

        let non_negative = [
            ("player_radius", self.player_radius),
            ("player_intercept_speed", self.player_intercept_speed),
            ("shot_distance_accuracy_scale", self.shot_distance_accuracy_scale),
        ];
        for (name, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(SimError::Config(format!("{name} must be non-negative, got {v}")));
            }
        }

        for (name, v) in [
            ("min_intercept_chance", self.min_intercept_chance),
            ("max_intercept_chance", self.max_intercept_chance),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(SimError::Config(format!("{name} must be in [0, 1], got {v}")));
            }
        }
        Ok(())
    }

    /// Interception chance at `effective_dist`, zero beyond the cutoff.
    pub fn intercept_chance(&self, effective_dist: f64) -> f64 {
        if effective_dist > self.max_intercept_dist {
            0.0
        } else {
            (self.max_intercept_chance - self.min_intercept_chance) * effective_dist
                / self.max_intercept_dist
                + self.min_intercept_chance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_where_expected() {
        let standard = Rules::standard();
        let simple = Rules::simple();
        let direct = Rules::direct_control();

        assert_eq!(standard.max_tick, 450);
        assert_eq!(simple.max_tick, 450);
        assert_eq!(direct.max_tick, 300);
        assert_eq!(direct.motion_model, MotionModel::Direct);
        assert_eq!(direct.layout_constraint, LayoutConstraint::Crossover);
        assert!(!direct.enable_player_collisions);
        assert_eq!(simple.max_intercept_dist, 5.0);
        assert_eq!(Rules::predictable_interception().player_intercept_speed, 0.0);
    }

    #[test]
    fn test_intercept_curve() {
        let rules = Rules::standard();
        assert_eq!(rules.intercept_chance(0.0), 0.5);
        assert_eq!(rules.intercept_chance(3.5), 1.0);
        assert!((rules.intercept_chance(1.75) - 0.75).abs() < 1e-12);
        assert_eq!(rules.intercept_chance(3.6), 0.0);
    }

    #[test]
    fn test_yaml_round_trip() {
        let rules = Rules::direct_control();
        let text = serde_yaml::to_string(&rules).unwrap();
        assert!(text.contains("motion_model: DIRECT"));
        assert_eq!(Rules::from_yaml_str(&text).unwrap(), rules);
    }

    #[test]
    fn test_bad_config_is_reported() {
        let err = Rules::from_json_str("{\"max_tick\": \"soon\"}").unwrap_err();
        assert!(matches!(err, crate::error::SimError::Config(_)));
    }

    #[test]
    fn test_presets_are_valid() {
        for name in ["standard", "simple", "direct_control", "predictable_interception"] {
            Rules::preset(name).unwrap().validate().unwrap();
        }
    }

    #[test]
    fn test_degenerate_rules_are_rejected() {
        let cases = [
            ("max_vel", Rules { max_vel: 0.0, ..Rules::standard() }),
            ("max_accel", Rules { max_accel: -0.1, ..Rules::standard() }),
            ("max_intercept_dist", Rules { max_intercept_dist: 0.0, ..Rules::standard() }),
            ("arena_size.0", Rules { arena_size: (0.0, 36.0), ..Rules::standard() }),
            ("arena_size.1", Rules { arena_size: (18.0, f64::NAN), ..Rules::standard() }),
            ("player_radius", Rules { player_radius: -0.5, ..Rules::standard() }),
            ("min_intercept_chance", Rules { min_intercept_chance: -0.2, ..Rules::standard() }),
            ("max_intercept_chance", Rules { max_intercept_chance: 1.5, ..Rules::standard() }),
        ];
        for (field, rules) in cases {
            match rules.validate() {
                Err(SimError::Config(msg)) => assert!(msg.starts_with(field), "{msg}"),
                other => panic!("{field}: expected config error, got {other:?}"),
            }

            // the same values coming from a file fail at load time
            let yaml = serde_yaml::to_string(&rules).unwrap();
            assert!(matches!(Rules::from_yaml_str(&yaml), Err(SimError::Config(_))), "{field}");
            if rules.arena_size.1.is_finite() {
                let json = serde_json::to_string(&rules).unwrap();
                assert!(matches!(Rules::from_json_str(&json), Err(SimError::Config(_))), "{field}");
            }
        }
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(Rules::preset("simple"), Some(Rules::simple()));
        assert!(Rules::preset("hardcore").is_none());
    }
}
