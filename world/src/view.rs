//! Shared ownership of a world and per-player handles onto it.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use bomber_core::{
    AgentId, AgentKind, CellView, Command, Event, Intent, Observer, Point, QueryError, WorldError,
};

use crate::{
    apply,
    query::{self, AgentSnapshot, BoardView},
    World,
};

/// Thread-safe handle onto a single world.
///
/// Every operation takes the lock for its full duration, so a tick is never
/// observed half-applied. Observers run while the lock is held and must not
/// call back into the world.
#[derive(Clone)]
pub struct SharedWorld {
    inner: Arc<Mutex<World>>,
}

impl SharedWorld {
    /// Wraps a world for shared access.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(Mutex::new(world)),
        }
    }

    /// Locks the world for exclusive access, recovering from poisoning.
    pub fn lock(&self) -> MutexGuard<'_, World> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a command while holding the lock.
    pub fn apply(&self, command: Command, out_events: &mut Vec<Event>) {
        apply(&mut self.lock(), command, out_events);
    }
}

impl fmt::Debug for SharedWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWorld")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

/// Player-scoped handle that can only steer and inspect its own agent.
#[derive(Clone, Debug)]
pub struct PlayerView {
    world: SharedWorld,
    agent: AgentId,
}

impl PlayerView {
    /// Joins the world as a new player, registering `observer` for its events.
    pub fn join<O>(world: &SharedWorld, observer: O) -> Result<Self, WorldError>
    where
        O: Observer + 'static,
    {
        let agent = world.lock().join(Box::new(observer))?;
        Ok(Self {
            world: world.clone(),
            agent,
        })
    }

    /// Reattaches to an existing player.
    pub fn bind(world: &SharedWorld, agent: AgentId) -> Result<Self, QueryError> {
        let snapshot = query::agent(&world.lock(), agent)?;
        if snapshot.kind != AgentKind::Player {
            return Err(QueryError::UnknownAgent(agent));
        }
        Ok(Self {
            world: world.clone(),
            agent,
        })
    }

    /// Identity of the steered agent.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent
    }

    /// Queues the intent for the next tick, replacing any earlier one.
    pub fn queue_intent(&self, intent: Intent) -> Result<(), QueryError> {
        let mut world = self.world.lock();
        let _ = query::agent(&world, self.agent)?;
        let command = Command::QueueIntent {
            agent: self.agent,
            intent,
        };
        apply(&mut world, command, &mut Vec::new());
        Ok(())
    }

    /// Restarts the round. Every player sharing the world is affected.
    pub fn new_game(&self) {
        self.world.apply(Command::NewGame, &mut Vec::new());
    }

    /// Current state of the steered agent.
    pub fn agent(&self) -> Result<AgentSnapshot, QueryError> {
        query::agent(&self.world.lock(), self.agent)
    }

    /// Describes one cell as seen by this player.
    pub fn cell(&self, point: Point) -> Result<CellView, QueryError> {
        query::cell_view(&self.world.lock(), self.agent, point)
    }

    /// Captures the whole board as seen by this player.
    #[must_use]
    pub fn snapshot(&self) -> BoardView {
        query::board_view(&self.world.lock(), self.agent)
    }
}
