#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    Success,
    Failure,
    Running,
}

impl Status {
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Status::Success
        } else {
            Status::Failure
        }
    }

    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    pub fn is_failure(self) -> bool {
        self == Status::Failure
    }
}

/// Discrete action code handed back to the simulation.
///
/// The numbering is the environment's contract:
/// - `0..=3` cardinal moves (north, east, south, west)
/// - `4` stand / no-op
/// - `5 + slot` attack the foe occupying `slot` in the foe segment of the observation
///
/// The core only constructs codes through the named constructors and never
/// reinterprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Action(pub u32);

impl Action {
    pub const NORTH: Action = Action(0);
    pub const EAST: Action = Action(1);
    pub const SOUTH: Action = Action(2);
    pub const WEST: Action = Action(3);
    pub const STAND: Action = Action(4);

    const ATTACK_OFFSET: u32 = 5;

    /// `None` when the slot has no code.
    pub fn attack(foe_slot: usize) -> Option<Self> {
        u32::try_from(foe_slot)
            .ok()
            .and_then(|slot| slot.checked_add(Self::ATTACK_OFFSET))
            .map(Action)
    }

    pub fn code(self) -> u32 {
        self.0
    }

    pub fn is_stand(self) -> bool {
        self == Action::STAND
    }

    pub fn attack_slot(self) -> Option<usize> {
        self.0
            .checked_sub(Self::ATTACK_OFFSET)
            .map(|slot| slot as usize)
    }
}

impl Default for Action {
    fn default() -> Self {
        Action::STAND
    }
}

/// Cardinal heading used by movement atomics and quadrant bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    pub fn action(self) -> Action {
        match self {
            Heading::North => Action::NORTH,
            Heading::East => Action::EAST,
            Heading::South => Action::SOUTH,
            Heading::West => Action::WEST,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Heading::North => Heading::South,
            Heading::East => Heading::West,
            Heading::South => Heading::North,
            Heading::West => Heading::East,
        }
    }

    /// Unit step in map coordinates (y grows northwards).
    pub fn unit(self) -> (f32, f32) {
        match self {
            Heading::North => (0.0, 1.0),
            Heading::East => (1.0, 0.0),
            Heading::South => (0.0, -1.0),
            Heading::West => (-1.0, 0.0),
        }
    }

    /// Bucket a relative position into a quadrant whose boundaries are the diagonals.
    pub fn of_offset(x: f32, y: f32) -> Self {
        let below_main = x > y;
        let above_anti = x > -y;
        match (below_main, above_anti) {
            (true, true) => Heading::East,
            (true, false) => Heading::South,
            (false, true) => Heading::North,
            (false, false) => Heading::West,
        }
    }
}
