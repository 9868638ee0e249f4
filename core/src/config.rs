//! Match configuration consumed when a world is built.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{BoardSize, ConfigError, GridError, Point};

const DEFAULT_BOARD_SIDE: u32 = 15;
const DEFAULT_COUNTDOWN: u32 = 5;
const DEFAULT_POWER: u32 = 1;
const DEFAULT_ALLOWANCE: u32 = 1;
const DEFAULT_HOSTILES: usize = 4;
const DEFAULT_SEED: u64 = 0x5eed_b0b5_1e55_d1ce;

/// Complete description of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of board columns.
    pub width: u32,
    /// Number of board rows.
    pub height: u32,
    /// Permanent wall layout.
    pub walls: WallLayout,
    /// Start cells handed out to players in join order.
    pub player_spawns: Vec<Point>,
    /// Bomb parameters shared by every player.
    pub bomb: BombConfig,
    /// Hostile population.
    pub hostiles: HostileConfig,
    /// Seed for the production dice.
    pub seed: u64,
}

impl GameConfig {
    /// Board dimensions described by the configuration.
    #[must_use]
    pub const fn size(&self) -> BoardSize {
        BoardSize::new(self.width, self.height)
    }

    /// Checks that the configuration describes a playable match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.size();
        let walls = self.walls.resolve(size)?;

        if self.bomb.countdown == 0 {
            return Err(ConfigError::ZeroCountdown);
        }
        if self.bomb.allowance == 0 {
            return Err(ConfigError::ZeroAllowance);
        }

        let mut claimed = BTreeSet::new();
        for &spawn in self.player_spawns.iter().chain(&self.hostiles.spawns) {
            if !size.contains(spawn) {
                return Err(ConfigError::SpawnOutOfBounds(spawn));
            }
            if walls.contains(&spawn) {
                return Err(ConfigError::SpawnOnWall(spawn));
            }
            if !claimed.insert(spawn) {
                return Err(ConfigError::DuplicateSpawn(spawn));
            }
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let far = DEFAULT_BOARD_SIDE - 2;
        Self {
            width: DEFAULT_BOARD_SIDE,
            height: DEFAULT_BOARD_SIDE,
            walls: WallLayout::Pillars,
            player_spawns: vec![
                Point::new(1, 1),
                Point::new(far, 1),
                Point::new(1, far),
                Point::new(far, far),
            ],
            bomb: BombConfig::default(),
            hostiles: HostileConfig::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Bomb parameters applied to every placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombConfig {
    /// Full ticks between placement and detonation.
    pub countdown: u32,
    /// Geodesic blast radius.
    pub power: u32,
    /// Maximum number of live bombs per player.
    pub allowance: u32,
}

impl Default for BombConfig {
    fn default() -> Self {
        Self {
            countdown: DEFAULT_COUNTDOWN,
            power: DEFAULT_POWER,
            allowance: DEFAULT_ALLOWANCE,
        }
    }
}

/// Hostile population placed at the start of every round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileConfig {
    /// Total number of hostiles.
    pub count: usize,
    /// Fixed cells used before falling back to random placement.
    pub spawns: Vec<Point>,
}

impl Default for HostileConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_HOSTILES,
            spawns: Vec::new(),
        }
    }
}

/// Permanent wall layouts understood by the world.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallLayout {
    /// No walls at all.
    #[default]
    Open,
    /// A ring of walls around the board edge.
    Border,
    /// Border ring plus a pillar wherever both coordinates are even.
    Pillars,
    /// Explicit list of wall cells.
    Custom {
        /// Cells occupied by walls.
        cells: Vec<Point>,
    },
}

impl WallLayout {
    /// Expands the layout into the set of wall cells for a board.
    pub fn resolve(&self, size: BoardSize) -> Result<BTreeSet<Point>, GridError> {
        if size.width() == 0 || size.height() == 0 {
            return Err(GridError::EmptyBoard);
        }

        let on_border = |point: Point| {
            point.x() == 0
                || point.y() == 0
                || point.x() + 1 == size.width()
                || point.y() + 1 == size.height()
        };

        let walls = match self {
            Self::Open => BTreeSet::new(),
            Self::Border => size.points().filter(|point| on_border(*point)).collect(),
            Self::Pillars => size
                .points()
                .filter(|point| on_border(*point) || (point.x() % 2 == 0 && point.y() % 2 == 0))
                .collect(),
            Self::Custom { cells } => {
                if let Some(outside) = cells.iter().find(|cell| !size.contains(**cell)) {
                    return Err(GridError::WallOutOfBounds(*outside));
                }
                cells.iter().copied().collect()
            }
        };

        Ok(walls)
    }
}
