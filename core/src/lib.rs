#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bomber engine.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure systems, and adapters. Players express what they want to do as
//! [`Intent`] values, the world resolves them once per tick, and deaths are
//! reported back to the affected players through the [`Observer`] capability
//! as [`EventKind`] values. Randomness is consumed exclusively through the
//! [`Dice`] capability so that every match can be replayed deterministically.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};

pub mod config;
mod error;

pub use config::{BombConfig, GameConfig, HostileConfig, WallLayout};
pub use error::{BlastError, ConfigError, GridError, QueryError, WorldError};

/// Location of a single board cell expressed as column and row coordinates.
///
/// Row zero is the top edge of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    x: u32,
    y: u32,
}

impl Point {
    /// Creates a new board coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the point.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the point.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the orthogonal neighbour in the provided direction.
    ///
    /// Yields `None` when the step would leave the non-negative quadrant. The
    /// upper board bounds are not known here and must be checked by callers.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Point> {
        match direction {
            Direction::North => self.y.checked_sub(1).map(|y| Point::new(self.x, y)),
            Direction::East => self.x.checked_add(1).map(|x| Point::new(x, self.y)),
            Direction::South => self.y.checked_add(1).map(|y| Point::new(self.x, y)),
            Direction::West => self.x.checked_sub(1).map(|x| Point::new(x, self.y)),
        }
    }

    /// Iterates the orthogonal neighbours in canonical direction order.
    pub fn neighbors(self) -> impl Iterator<Item = (Direction, Point)> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(direction).map(|point| (direction, point)))
    }

    /// Computes the Manhattan distance between two points.
    #[must_use]
    pub fn manhattan_distance(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Canonical enumeration order used whenever neighbours are listed.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Dimensions of the rectangular board measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    width: u32,
    height: u32,
}

impl BoardSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the point lies within the board.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    /// Total number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.height);
        usize::try_from(count).unwrap_or(0)
    }

    /// Row-major index of the point, or `None` when it lies outside the board.
    #[must_use]
    pub fn index(&self, point: Point) -> Option<usize> {
        if !self.contains(point) {
            return None;
        }
        let row = usize::try_from(point.y).ok()?;
        let column = usize::try_from(point.x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }

    /// Iterates every point of the board in row-major order.
    pub fn points(self) -> impl Iterator<Item = Point> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Point::new(x, y)))
    }
}

/// Unique identifier assigned to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Unique identifier assigned to a bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BombId(u32);

impl BombId {
    /// Creates a new bomb identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Distinguishes player-controlled agents from autonomous hostiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// Agent steered by a player through a view.
    Player,
    /// Autonomous meat chopper that wanders the board.
    Hostile,
}

/// Action a player wants to perform during the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Step one cell in the provided direction.
    Move(Direction),
    /// Drop a bomb on the currently occupied cell.
    PlaceBomb,
}

/// Commands that drive the world state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Records the intent a player acts on during the next tick.
    QueueIntent {
        /// Player that expressed the intent.
        agent: AgentId,
        /// Action to attempt; replaces any intent queued earlier.
        intent: Intent,
    },
    /// Resolves one full tick: intents, hostiles, bombs, and deaths.
    Tick,
    /// Restarts the round on the same board.
    NewGame,
}

/// Reason an agent died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Burned by a blast.
    Blast {
        /// Bomb whose blast first reached the victim's cell.
        bomb: BombId,
        /// Player that placed the bomb.
        owner: AgentId,
    },
    /// Caught by a hostile sharing the same cell.
    Hostile {
        /// Hostile responsible for the collision.
        hostile: AgentId,
    },
}

/// Notification delivered to a player's observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EventKind {
    /// The observer's own agent died.
    AgentKilled,
    /// A hostile died in a blast from one of the observer's bombs.
    HostileKilled,
}

/// Routed event record emitted by the world after each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Event {
    /// Tick, within the current round, that produced the event.
    pub tick: u64,
    /// Player whose observer received the event.
    pub recipient: AgentId,
    /// Agent that died.
    pub victim: AgentId,
    /// Kind delivered to the observer.
    pub kind: EventKind,
    /// What killed the victim.
    pub cause: DeathCause,
}

/// Player-relative description of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellView {
    /// Nothing occupies the cell.
    Empty,
    /// Permanent wall.
    Wall,
    /// The viewer's own live agent.
    SelfAgent,
    /// The viewer's own live agent standing on a bomb.
    SelfAgentOnBomb,
    /// The viewer's own corpse.
    SelfAgentDead,
    /// Another player's live agent.
    OtherAgent,
    /// Another player's live agent standing on a bomb.
    OtherAgentOnBomb,
    /// Another player's corpse.
    OtherAgentDead,
    /// Live hostile.
    Hostile,
    /// Hostile corpse.
    HostileDead,
    /// Ticking bomb.
    Bomb {
        /// Full ticks left before detonation.
        countdown: u32,
    },
    /// Cell burned by the blast of the current tick.
    Blast,
}

/// Capability that receives events attributed to a single player.
pub trait Observer: Send {
    /// Invoked once per event, in causal order for this observer.
    fn on_event(&mut self, event: EventKind);
}

impl<F> Observer for F
where
    F: FnMut(EventKind) + Send,
{
    fn on_event(&mut self, event: EventKind) {
        self(event);
    }
}

/// Observer that records every event it receives.
///
/// Clones share the same log so a test or driver can keep one handle while
/// the world owns another.
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<EventKind>>>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the recorded events in delivery order.
    #[must_use]
    pub fn events(&self) -> Vec<EventKind> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Counts the recorded events of the provided kind.
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|recorded| **recorded == kind)
            .count()
    }
}

impl Observer for EventRecorder {
    fn on_event(&mut self, event: EventKind) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Source of randomness consumed by the world.
pub trait Dice: Send + fmt::Debug {
    /// Returns a value in `[0, bound)`. Callers never pass a zero bound.
    fn next(&mut self, bound: u32) -> u32;
}
