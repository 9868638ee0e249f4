//! Read-only inspection of the world.
//!
//! Nothing in this module mutates the world; every function takes a shared
//! reference and copies out what callers need.

use bomber_core::{
    AgentId, AgentKind, BoardSize, BombId, CellView, DeathCause, Direction, Intent, Point,
    QueryError,
};

use crate::{registry::Agent, Grid, World};

/// Provides read-only access to the static board.
#[must_use]
pub fn grid(world: &World) -> &Grid {
    &world.grid
}

/// Captures every registered agent, players and hostiles, in registration order.
#[must_use]
pub fn agents(world: &World) -> Vec<AgentSnapshot> {
    world.registry.agents().iter().map(snapshot).collect()
}

/// Captures a single agent.
pub fn agent(world: &World, id: AgentId) -> Result<AgentSnapshot, QueryError> {
    world
        .registry
        .agent(id)
        .map(snapshot)
        .ok_or(QueryError::UnknownAgent(id))
}

/// Counts the live agents of the provided kind.
#[must_use]
pub fn live_count(world: &World, kind: AgentKind) -> usize {
    world.registry.live_agents_of(kind).count()
}

/// Captures every ticking bomb in placement order.
#[must_use]
pub fn bombs(world: &World) -> Vec<BombSnapshot> {
    world
        .registry
        .bombs()
        .iter()
        .map(|bomb| BombSnapshot {
            id: bomb.id,
            owner: bomb.owner,
            position: bomb.position,
            countdown: bomb.countdown,
            power: bomb.power,
        })
        .collect()
}

/// Cells burned during the most recent tick, in ascending order.
#[must_use]
pub fn blast_cells(world: &World) -> Vec<Point> {
    world.registry.blast().keys().copied().collect()
}

/// Describes a single cell from the perspective of `viewer`.
///
/// The most significant occupant wins: the viewer's own agent, then other
/// players (live before dead), then hostiles (live before dead), then blast,
/// bombs, and finally walls.
pub fn cell_view(world: &World, viewer: AgentId, point: Point) -> Result<CellView, QueryError> {
    if !world.grid.in_bounds(point) {
        return Err(QueryError::OutOfBounds(point));
    }
    Ok(describe(world, viewer, point))
}

/// Captures the whole board from the perspective of `viewer`.
#[must_use]
pub fn board_view(world: &World, viewer: AgentId) -> BoardView {
    let size = world.grid.size();
    let cells = size
        .points()
        .map(|point| describe(world, viewer, point))
        .collect();
    BoardView { size, cells }
}

fn describe(world: &World, viewer: AgentId, point: Point) -> CellView {
    let registry = &world.registry;
    let on_bomb = registry.bomb_at(point);
    let mut players = registry
        .agents()
        .iter()
        .filter(|agent| agent.position == point && agent.kind() == AgentKind::Player);

    if let Some(own) = registry
        .agent(viewer)
        .filter(|agent| agent.position == point && agent.kind() == AgentKind::Player)
    {
        return match (own.is_alive(), on_bomb) {
            (false, _) => CellView::SelfAgentDead,
            (true, Some(_)) => CellView::SelfAgentOnBomb,
            (true, None) => CellView::SelfAgent,
        };
    }

    if players.clone().any(|agent| agent.is_alive()) {
        return match on_bomb {
            Some(_) => CellView::OtherAgentOnBomb,
            None => CellView::OtherAgent,
        };
    }
    if players.any(|agent| !agent.is_alive()) {
        return CellView::OtherAgentDead;
    }

    let mut hostiles = registry
        .agents()
        .iter()
        .filter(|agent| agent.position == point && agent.kind() == AgentKind::Hostile);
    if hostiles.clone().any(|agent| agent.is_alive()) {
        return CellView::Hostile;
    }
    if hostiles.next().is_some() {
        return CellView::HostileDead;
    }

    if registry.blast().contains_key(&point) {
        return CellView::Blast;
    }
    if let Some(bomb) = on_bomb {
        return CellView::Bomb {
            countdown: bomb.countdown,
        };
    }
    if world.grid.is_wall(point) {
        return CellView::Wall;
    }
    CellView::Empty
}

/// Read-only description of a single agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentSnapshot {
    /// Identifier of the agent.
    pub id: AgentId,
    /// Whether the agent is a player or a hostile.
    pub kind: AgentKind,
    /// Cell the agent occupies.
    pub position: Point,
    /// Direction of the agent's last step attempt.
    pub facing: Direction,
    /// Intent queued for the next tick, if any.
    pub pending: Option<Intent>,
    /// Cause of death, or `None` while the agent lives.
    pub death: Option<DeathCause>,
}

impl AgentSnapshot {
    /// Reports whether the agent is still alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.death.is_none()
    }
}

fn snapshot(agent: &Agent) -> AgentSnapshot {
    AgentSnapshot {
        id: agent.id,
        kind: agent.kind(),
        position: agent.position,
        facing: agent.facing,
        pending: agent.intent,
        death: agent.life.cause(),
    }
}

/// Read-only description of a ticking bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BombSnapshot {
    /// Identifier of the bomb.
    pub id: BombId,
    /// Player that placed the bomb.
    pub owner: AgentId,
    /// Cell the bomb occupies.
    pub position: Point,
    /// Full ticks left before detonation.
    pub countdown: u32,
    /// Blast radius in steps.
    pub power: u32,
}

/// Player-relative snapshot of every board cell, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardView {
    size: BoardSize,
    cells: Vec<CellView>,
}

impl BoardView {
    /// Dimensions of the captured board.
    #[must_use]
    pub const fn size(&self) -> BoardSize {
        self.size
    }

    /// Looks up a single cell, or `None` when the point lies outside the board.
    #[must_use]
    pub fn cell(&self, point: Point) -> Option<CellView> {
        self.size
            .index(point)
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    /// Iterates the board row by row.
    pub fn rows(&self) -> impl Iterator<Item = &[CellView]> {
        let width = usize::try_from(self.size.width()).unwrap_or(usize::MAX).max(1);
        self.cells.chunks(width)
    }

    /// Iterates every cell together with its coordinate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellView)> + '_ {
        self.size.points().zip(self.cells.iter().copied())
    }
}
