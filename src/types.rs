// Core game types shared by the engine, the wire layer and the orchestrator

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D coordinate on the board. North is -y, south is +y.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Loc {
    pub x: i32,
    pub y: i32,
}

impl Loc {
    pub const fn new(x: i32, y: i32) -> Self {
        Loc { x, y }
    }

    /// Calculates the Manhattan distance between two locations
    pub fn manhattan_distance(self, other: Loc) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Returns the neighbouring location one step in `dir`
    pub fn step(self, dir: Direction) -> Loc {
        let (dx, dy) = dir.offset();
        Loc {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Component-wise sum. Two robots swapping places produce the same sum.
    pub fn sum(self, other: Loc) -> Loc {
        Loc {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// The eight surrounding locations, not bounds-checked
    pub fn surrounding(self) -> [Loc; 8] {
        let Loc { x, y } = self;
        [
            Loc::new(x - 1, y - 1),
            Loc::new(x, y - 1),
            Loc::new(x + 1, y - 1),
            Loc::new(x - 1, y),
            Loc::new(x + 1, y),
            Loc::new(x - 1, y + 1),
            Loc::new(x, y + 1),
            Loc::new(x + 1, y + 1),
        ]
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four axis-aligned directions a robot can move or attack in
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// (dx, dy) offset of one step in this direction
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

/// What a board cell allows
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// Never occupiable
    #[default]
    Invalid,
    /// Occupiable, never spawns robots
    Valid,
    /// Occupiable and eligible for new robots
    Spawn,
}

impl CellType {
    pub fn is_occupiable(&self) -> bool {
        matches!(self, CellType::Valid | CellType::Spawn)
    }
}

/// One of the two sides in a match. P1 spawns on the left half, P2 on the mirror.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Faction {
    P1,
    P2,
}

/// Uniquely identifies a robot for the lifetime of a board
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RobotId(pub u32);

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single piece on a board
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Robot {
    pub id: RobotId,
    pub health: i32,
    pub faction: Faction,
}

/// What a robot intends to do this round. The default waits.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(tag = "kind", content = "direction", rename_all = "snake_case")]
pub enum Action {
    #[default]
    Wait,
    Move(Direction),
    Attack(Direction),
    SelfDestruct,
    Guard,
}

impl Action {
    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move(_))
    }
}

/// A robot's action for one round, as submitted by a participant
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub id: RobotId,
    pub action: Action,
}

impl Turn {
    pub fn new(id: u32, action: Action) -> Self {
        Turn {
            id: RobotId(id),
            action,
        }
    }
}
