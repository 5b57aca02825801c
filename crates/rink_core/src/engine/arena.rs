//! Rink geometry.
//!
//! The rink is centred on the origin. x runs across the rink, z along it.
//! The net indexed by a side is that side's own net; teams attack the net of
//! the opposite side.

use super::types::{TeamSide, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    pub size: (f64, f64),
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
    nets: [Vec2; 2],
}

impl Arena {
    pub fn new(size: (f64, f64)) -> Self {
        let max_x = size.0 / 2.0;
        let max_z = size.1 / 2.0;
        Self {
            size,
            min_x: -max_x,
            max_x,
            min_z: -max_z,
            max_z,
            nets: [Vec2::new(0.0, max_z), Vec2::new(0.0, -max_z)],
        }
    }

    pub fn mins(&self) -> Vec2 {
        Vec2::new(self.min_x, self.min_z)
    }

    pub fn maxs(&self) -> Vec2 {
        Vec2::new(self.max_x, self.max_z)
    }

    /// Net owned (defended) by `side`.
    pub fn net_position(&self, side: TeamSide) -> Vec2 {
        self.nets[side.index()]
    }

    /// Net that `side` shoots at.
    pub fn attacking_net(&self, side: TeamSide) -> Vec2 {
        self.net_position(side.opposite())
    }

    /// Sign of the z coordinate of `side`'s own net.
    pub fn attack_z(&self, side: TeamSide) -> f64 {
        sign(self.net_position(side).y)
    }

    /// Sign of the z coordinate of the net `side` shoots at.
    pub fn attack_dir(&self, side: TeamSide) -> f64 {
        sign(self.attacking_net(side).y)
    }

    /// Length of the rink diagonal.
    pub fn diagonal(&self) -> f64 {
        (self.size.0 * self.size.0 + self.size.1 * self.size.1).sqrt()
    }

    /// World position to `[0, 1]²`.
    pub fn normalize(&self, pos: &Vec2) -> Vec2 {
        (pos - self.mins()).component_div(&(self.maxs() - self.mins()))
    }

    /// `[0, 1]²` back to world position.
    pub fn denormalize(&self, pos: &Vec2) -> Vec2 {
        pos.component_mul(&(self.maxs() - self.mins())) + self.mins()
    }
}

/// numpy-style sign: 0 stays 0.
pub(crate) fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
