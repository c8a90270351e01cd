use nalgebra::{Vector2, Point2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::SimError;

pub mod signals;
pub mod vehicle;
pub mod traffic;
pub mod control;

pub use signals::*;
pub use vehicle::*;
pub use traffic::*;
pub use control::*;

pub type Vec2 = Vector2<f32>;
pub type Point = Point2<f32>;

/// Distance from the intersection centre at which vehicles leave the simulated area.
pub const BOUNDARY: f32 = 600.0;
/// Cross-axis offset of each travel lane from the road centre line.
pub const LANE_OFFSET: f32 = 35.0;
/// Distance from the intersection centre to every stop line.
pub const STOP_LINE_OFFSET: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    East,
    West,
    North,
    South,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Opposing directions that share right-of-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionGroup {
    EastWest,
    NorthSouth,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::East, Direction::West, Direction::North, Direction::South];

    pub fn index(self) -> usize {
        match self {
            Direction::East => 0,
            Direction::West => 1,
            Direction::North => 2,
            Direction::South => 3,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::East | Direction::West => Axis::X,
            Direction::North | Direction::South => Axis::Y,
        }
    }

    /// +1 when travelling towards increasing coordinates, -1 otherwise.
    pub fn sign(self) -> f32 {
        match self {
            Direction::East | Direction::North => 1.0,
            Direction::West | Direction::South => -1.0,
        }
    }

    pub fn group(self) -> DirectionGroup {
        match self.axis() {
            Axis::X => DirectionGroup::EastWest,
            Axis::Y => DirectionGroup::NorthSouth,
        }
    }

    pub fn heading_degrees(self) -> f32 {
        match self {
            Direction::East => 0.0,
            Direction::North => 90.0,
            Direction::West => 180.0,
            Direction::South => 270.0,
        }
    }

    pub fn unit_vector(self) -> Vec2 {
        match self.axis() {
            Axis::X => Vec2::new(self.sign(), 0.0),
            Axis::Y => Vec2::new(0.0, self.sign()),
        }
    }

    /// Coordinate along the travel axis where new vehicles appear.
    pub fn spawn_position(self) -> f32 {
        -self.sign() * BOUNDARY
    }

    /// Fixed cross-axis coordinate of this direction's lane. Traffic keeps right.
    pub fn lane_offset(self) -> f32 {
        match self {
            Direction::East => -LANE_OFFSET,
            Direction::West => LANE_OFFSET,
            Direction::North => LANE_OFFSET,
            Direction::South => -LANE_OFFSET,
        }
    }

    pub fn spawn_point(self) -> Point {
        self.to_world(self.spawn_position())
    }

    /// Coordinate along the travel axis where a stopped vehicle's front bumper halts.
    pub fn stop_line(self) -> f32 {
        -self.sign() * STOP_LINE_OFFSET
    }

    pub fn has_left_bounds(self, position: f32) -> bool {
        self.sign() * position > BOUNDARY
    }

    /// Maps a coordinate along this direction's axis into the 2-D world.
    pub fn to_world(self, position: f32) -> Point {
        match self.axis() {
            Axis::X => Point::new(position, self.lane_offset()),
            Axis::Y => Point::new(self.lane_offset(), position),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::East => "east",
            Direction::West => "west",
            Direction::North => "north",
            Direction::South => "south",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "east" | "e" => Ok(Direction::East),
            "west" | "w" => Ok(Direction::West),
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            _ => Err(SimError::UnknownDirection(s.to_string())),
        }
    }
}

impl DirectionGroup {
    pub fn members(self) -> [Direction; 2] {
        match self {
            DirectionGroup::EastWest => [Direction::East, Direction::West],
            DirectionGroup::NorthSouth => [Direction::North, Direction::South],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalState {
    Green,
    Yellow,
    Red,
}

impl SignalState {
    /// Red and yellow both oblige an approaching vehicle to stop at the line.
    pub fn requires_stop(self) -> bool {
        matches!(self, SignalState::Red | SignalState::Yellow)
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalState::Green => "green",
            SignalState::Yellow => "yellow",
            SignalState::Red => "red",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic tick counter for the whole simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationClock {
    ticks: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}
