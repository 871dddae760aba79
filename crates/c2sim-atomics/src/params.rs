//! Enumerated parameter domains accepted by the catalog.
//!
//! Each domain parses from the keyword spelled in program text; anything else
//! is rejected when the tree is compiled.

use c2sim_core::Heading;
use strum::VariantNames;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A domain of keyword parameters.
pub trait Param: core::str::FromStr + VariantNames + Copy {
    /// Human name used in diagnostics.
    const WHAT: &'static str;
}

macro_rules! param {
    ($ty:ident, $what:literal) => {
        impl Param for $ty {
            const WHAT: &'static str = $what;
        }
    };
}

/// Target selection rule shared by `attack` and relative `move`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::VariantNames,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Qualifier {
    Closest,
    Furthest,
    Strongest,
    Weakest,
}
param!(Qualifier, "qualifier");

impl Qualifier {
    /// Rank by the health feature instead of distance.
    pub fn by_health(self) -> bool {
        matches!(self, Qualifier::Strongest | Qualifier::Weakest)
    }

    pub fn prefers_min(self) -> bool {
        matches!(self, Qualifier::Closest | Qualifier::Weakest)
    }
}

/// Unit catalog, in one-hot order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::VariantNames,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum UnitType {
    Marine,
    Marauder,
    Stalker,
    Zealot,
    Zergling,
    Hydralisk,
}
param!(UnitType, "unit type");

impl UnitType {
    /// Position within the type one-hot block.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::VariantNames,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Team {
    Foe,
    Friend,
}
param!(Team, "team");

/// Whose features a predicate reads.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::VariantNames,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Subject {
    #[strum(serialize = "self")]
    Own,
    Foe,
    Friend,
}
param!(Subject, "subject");

impl Subject {
    pub fn team(self) -> Option<Team> {
        match self {
            Subject::Own => None,
            Subject::Foe => Some(Team::Foe),
            Subject::Friend => Some(Team::Friend),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::VariantNames,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HpLevel {
    Low,
    Middle,
    High,
}
param!(HpLevel, "hp level");

impl HpLevel {
    pub fn threshold(self) -> f32 {
        match self {
            HpLevel::Low => 0.25,
            HpLevel::Middle => 0.5,
            HpLevel::High => 0.75,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::VariantNames,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Negation {
    A,
    NotA,
}
param!(Negation, "negation");

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::VariantNames,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Course {
    Toward,
    AwayFrom,
}
param!(Course, "course");

/// Compass keyword: a cardinal heading or the center.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::VariantNames,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
    Center,
}
param!(Direction, "direction");

impl Direction {
    pub fn heading(self) -> Option<Heading> {
        match self {
            Direction::North => Some(Heading::North),
            Direction::East => Some(Heading::East),
            Direction::South => Some(Heading::South),
            Direction::West => Some(Heading::West),
            Direction::Center => None,
        }
    }
}

/// One cell of the 3x3 map partition, as (row, column) in `-1..=1`.
///
/// Row grows northwards, column grows eastwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    pub row: i8,
    pub col: i8,
}

impl Region {
    /// `in_region x y`; a single keyword stands for `x x`.
    ///
    /// Only the centre and the eight compass cells are nameable.
    pub fn from_pair(x: Direction, y: Direction) -> Option<Self> {
        use Direction::*;
        let (row, col) = match (x, y) {
            (North, West) => (1, -1),
            (North, North) => (1, 0),
            (North, East) => (1, 1),
            (West, West) => (0, -1),
            (Center, Center) => (0, 0),
            (East, East) => (0, 1),
            (South, West) => (-1, -1),
            (South, South) => (-1, 0),
            (South, East) => (-1, 1),
            _ => return None,
        };
        Some(Region { row, col })
    }

    /// Cell containing a map-normalized position.
    pub fn of_position(x: f32, y: f32) -> Self {
        fn band(v: f32) -> i8 {
            if v > 2.0 / 3.0 {
                1
            } else if v < 1.0 / 3.0 {
                -1
            } else {
                0
            }
        }
        Region {
            row: band(y),
            col: band(x),
        }
    }
}
