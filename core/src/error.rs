//! Error taxonomy shared by the world and its systems.

use thiserror::Error;

use crate::{AgentId, Point};

/// Reasons a board cannot be constructed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height is zero.
    #[error("board must have at least one row and one column")]
    EmptyBoard,
    /// A wall was listed outside the board.
    #[error("wall {0} lies outside the board")]
    WallOutOfBounds(Point),
}

/// Reasons a [`crate::GameConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The board layout is invalid.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// A spawn point lies outside the board.
    #[error("spawn {0} lies outside the board")]
    SpawnOutOfBounds(Point),
    /// A spawn point lies on a wall.
    #[error("spawn {0} lies on a wall")]
    SpawnOnWall(Point),
    /// Two spawn points share a cell.
    #[error("spawn {0} is listed more than once")]
    DuplicateSpawn(Point),
    /// Bombs would detonate the moment they are placed.
    #[error("bomb countdown must be at least one tick")]
    ZeroCountdown,
    /// Players would never be able to place a bomb.
    #[error("bomb allowance must be at least one")]
    ZeroAllowance,
}

/// Precondition violations detected by the blast engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BlastError {
    /// The detonation source lies outside the board.
    #[error("blast source {0} lies outside the board")]
    SourceOutOfBounds(Point),
    /// The detonation source lies on an obstacle.
    #[error("blast source {0} lies on an obstacle")]
    SourceIsObstacle(Point),
}

/// Failures surfaced while building or joining a world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Every configured player spawn is already taken.
    #[error("no free player spawn left")]
    NoFreeSpawn,
    /// The board has too few free cells for the requested hostiles.
    #[error("placed {placed} of {requested} hostiles")]
    HostilePlacement {
        /// Number of hostiles the configuration asked for.
        requested: usize,
        /// Number of hostiles that fit on the board.
        placed: usize,
    },
}

/// Failures surfaced by read-only queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The queried point lies outside the board.
    #[error("point {0} lies outside the board")]
    OutOfBounds(Point),
    /// No agent with the identifier is registered.
    #[error("{0} is not registered")]
    UnknownAgent(AgentId),
}
