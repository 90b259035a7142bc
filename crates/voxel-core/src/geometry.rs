//! World-space geometry in the game's conventions.
//!
//! Yaw is measured in degrees clockwise from +z (south): 0 faces south, 90 west, 180 north,
//! 270 east. Positive pitch looks down.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Eye height above the feet position reported by the observation.
pub const EYE_HEIGHT: f64 = 1.62;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(self, other: Position) -> f64 {
        let (dx, dy, dz) = (other.x - self.x, other.y - self.y, other.z - self.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn horizontal_distance(self, other: Position) -> f64 {
        let (dx, dz) = (other.x - self.x, other.z - self.z);
        (dx * dx + dz * dz).sqrt()
    }

    /// The block containing this point.
    pub fn block(self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }

    pub fn eye(self) -> Position {
        Position::new(self.x, self.y + EYE_HEIGHT, self.z)
    }

    /// Yaw (degrees) that faces `target` from this point.
    pub fn yaw_towards(self, target: Position) -> f64 {
        let (dx, dz) = (target.x - self.x, target.z - self.z);
        (-dx).atan2(dz).to_degrees()
    }

    /// Pitch (degrees, positive down) that faces `target` from this point.
    pub fn pitch_towards(self, target: Position) -> f64 {
        let dy = target.y - self.y;
        -dy.atan2(self.horizontal_distance(target)).to_degrees()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// Integer block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Saturates at the edge of the coordinate range.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.z.saturating_add(dz),
        )
    }

    pub fn checked_offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
            self.z.checked_add(dz)?,
        ))
    }

    pub fn center(self) -> Position {
        Position::new(
            self.x as f64 + 0.5,
            self.y as f64 + 0.5,
            self.z as f64 + 0.5,
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Signed difference `to - from` wrapped into `[-180, 180)`.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Unit block step in front of an agent facing `yaw`, snapped to the dominant axis.
pub fn forward_step(yaw: f64) -> (i32, i32) {
    let rad = yaw.to_radians();
    let (fx, fz) = (-rad.sin(), rad.cos());
    if fx.abs() > fz.abs() {
        (fx.signum() as i32, 0)
    } else {
        (0, fz.signum() as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn yaw(self) -> f64 {
        match self {
            Direction::South => 0.0,
            Direction::West => 90.0,
            Direction::North => 180.0,
            Direction::East => 270.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        f.write_str(s)
    }
}
