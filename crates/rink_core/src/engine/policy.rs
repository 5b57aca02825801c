//! Mapping from a player's tick decision onto the discrete learning outputs.
//!
//! Outputs 0-8 are the 3×3 left-stick directions expressed relative to the
//! attack direction, followed by one-hot SKATE / SHOOT / PASS.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::arena::sign;
use super::types::Vec2;

pub struct Outputs;

impl Outputs {
    pub const STICK_DIRECTIONS: usize = 9;
    pub const SKATE: usize = 9;
    pub const SHOOT: usize = 10;
    pub const PASS: usize = 11;
    pub const NUM: usize = 12;
    /// Stick index of a neutral stick.
    pub const NEUTRAL: usize = 4;
}

pub type PolicyVector = [f64; Outputs::NUM];

/// What a player produced this tick, in learning terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Ordinal of the chosen [`Action`].
    pub action_index: usize,
    pub policy: PolicyVector,
    pub value_estimate: f64,
}

/// Stick direction index with the input flipped into attack space.
pub fn input_to_policy_index(attack_dir: f64, input: &Vec2) -> usize {
    let sx = sign(input.x * attack_dir);
    let sz = sign(input.y * attack_dir);
    ((sx + 1.0) * 3.0 + sz + 1.0) as usize
}

pub fn policy_index_to_input(attack_dir: f64, index: usize) -> Vec2 {
    let x = (index / 3) as f64 - 1.0;
    let z = (index % 3) as f64 - 1.0;
    Vec2::new(x, z) * attack_dir
}

pub fn policy_vector(action: Action, attack_dir: f64, input: &Vec2) -> PolicyVector {
    let mut policy = [0.0; Outputs::NUM];
    let kind = match action {
        Action::Shoot => Outputs::SHOOT,
        a if a.is_pass() => Outputs::PASS,
        _ => Outputs::SKATE,
    };
    policy[kind] = 1.0;
    policy[input_to_policy_index(attack_dir, input)] = 1.0;
    policy
}

pub fn decision_record(action: Action, attack_dir: f64, input: &Vec2) -> DecisionRecord {
    DecisionRecord {
        action_index: action.ordinal(),
        policy: policy_vector(action, attack_dir, input),
        // no learned critic in the loop
        value_estimate: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_indices() {
        assert_eq!(input_to_policy_index(1.0, &Vec2::zeros()), Outputs::NEUTRAL);
        assert_eq!(input_to_policy_index(1.0, &Vec2::new(0.0, 1.0)), 5);
        assert_eq!(input_to_policy_index(1.0, &Vec2::new(-1.0, 1.0)), 2);
        assert_eq!(input_to_policy_index(1.0, &Vec2::new(1.0, -1.0)), 6);
        // attacking towards -z flips everything
        assert_eq!(input_to_policy_index(-1.0, &Vec2::new(0.0, -1.0)), 5);
    }

    #[test]
    fn test_index_inverse() {
        for dir in [-1.0, 1.0] {
            for index in 0..Outputs::STICK_DIRECTIONS {
                let input = policy_index_to_input(dir, index);
                assert_eq!(input_to_policy_index(dir, &input), index);
            }
        }
    }

    #[test]
    fn test_policy_vector_is_two_hot() {
        let v = policy_vector(Action::Pass3, 1.0, &Vec2::new(1.0, 0.0));
        assert_eq!(v[Outputs::PASS], 1.0);
        assert_eq!(v[7], 1.0);
        assert_eq!(v.iter().sum::<f64>(), 2.0);

        let stunned = policy_vector(Action::Stunned, -1.0, &Vec2::zeros());
        assert_eq!(stunned[Outputs::SKATE], 1.0);
        assert_eq!(stunned[Outputs::NEUTRAL], 1.0);
    }

    #[test]
    fn test_record_uses_action_ordinal() {
        let record = decision_record(Action::Shoot, 1.0, &Vec2::zeros());
        assert_eq!(record.action_index, 0);
        assert_eq!(record.policy[Outputs::SHOOT], 1.0);
        assert_eq!(record.value_estimate, 0.0);
    }
}
