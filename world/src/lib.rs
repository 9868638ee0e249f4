#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Bomber.
//!
//! A [`World`] owns the board, every agent and bomb, the active blast, and
//! the observers registered for each player. It only changes through
//! [`apply`] and when a player joins; everything else reads it through the
//! [`query`] module or a [`PlayerView`].

use std::collections::BTreeSet;

use bomber_core::{
    AgentId, Command, ConfigError, Dice, Event, GameConfig, Intent, Observer, Point, WorldError,
};
use bomber_system_wander::{scatter, SeededDice};
use tracing::{debug, info};

mod grid;
pub mod query;
mod registry;
mod router;
mod tick;
mod view;

pub use grid::Grid;
pub use view::{PlayerView, SharedWorld};

use registry::Registry;
use router::EventRouter;

/// Represents the authoritative Bomber world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    grid: Grid,
    registry: Registry,
    router: EventRouter,
    dice: Box<dyn Dice>,
    hostile_spawns: Vec<Point>,
    tick_index: u64,
    round: u64,
}

impl World {
    /// Builds a world from a validated configuration and an injected dice.
    ///
    /// Hostiles listed in the configuration keep their cells; the rest of the
    /// population is scattered with the dice once, and the same placement is
    /// reused by every later [`Command::NewGame`].
    pub fn new(config: GameConfig, mut dice: Box<dyn Dice>) -> Result<Self, WorldError> {
        config.validate()?;
        let grid = Grid::from_layout(config.size(), &config.walls).map_err(ConfigError::from)?;

        let requested = config.hostiles.count;
        let mut hostile_spawns: Vec<Point> = config
            .hostiles
            .spawns
            .iter()
            .copied()
            .take(requested)
            .collect();

        let reserved: BTreeSet<Point> = config
            .player_spawns
            .iter()
            .chain(&hostile_spawns)
            .copied()
            .collect();
        let missing = requested - hostile_spawns.len();
        hostile_spawns.extend(scatter(missing, grid.size(), dice.as_mut(), |cell| {
            grid.is_walkable(cell) && !reserved.contains(&cell)
        }));

        if hostile_spawns.len() < requested {
            return Err(WorldError::HostilePlacement {
                requested,
                placed: hostile_spawns.len(),
            });
        }

        let mut registry = Registry::default();
        for &spawn in &hostile_spawns {
            let _ = registry.spawn_hostile(spawn);
        }

        info!(
            width = grid.size().width(),
            height = grid.size().height(),
            walls = grid.walls().len(),
            hostiles = hostile_spawns.len(),
            "world created"
        );

        Ok(Self {
            config,
            grid,
            registry,
            router: EventRouter::default(),
            dice,
            hostile_spawns,
            tick_index: 0,
            round: 0,
        })
    }

    /// Builds a world whose dice are seeded from the configuration.
    pub fn seeded(config: GameConfig) -> Result<Self, WorldError> {
        let dice = SeededDice::new(config.seed);
        Self::new(config, Box::new(dice))
    }

    /// Registers a player at the next free spawn cell.
    ///
    /// A spawn is free when no other player starts there and no live agent or
    /// bomb currently occupies it. The observer receives every event
    /// attributed to the new player.
    pub fn join(&mut self, observer: Box<dyn Observer>) -> Result<AgentId, WorldError> {
        let Some(start) = self
            .config
            .player_spawns
            .iter()
            .copied()
            .find(|&cell| self.registry.is_free_spawn(cell))
        else {
            return Err(WorldError::NoFreeSpawn);
        };

        let id = self.registry.spawn_player(start, self.config.bomb);
        self.router.register(id, observer);
        info!(agent = %id, %start, "player joined");
        Ok(id)
    }

    /// Stores the intent a player will act on during the next tick.
    ///
    /// A later intent replaces an earlier one. Intents for hostiles or
    /// unregistered agents are dropped; those of dead players are dropped by
    /// the next tick.
    fn queue_intent(&mut self, agent: AgentId, intent: Intent) {
        match self.registry.agent_mut(agent) {
            Some(target) if target.loadout().is_some() => {
                target.intent = Some(intent);
                debug!(%agent, ?intent, "intent queued");
            }
            _ => debug!(%agent, ?intent, "intent for a non-player dropped"),
        }
    }

    /// Starts a new round on the same board.
    ///
    /// Bombs and blasts vanish, every player respawns alive at its start cell
    /// with a full bomb allowance, and hostiles return to their initial cells.
    fn new_game(&mut self) {
        self.registry.reset_round(&self.hostile_spawns);
        self.round = self.round.saturating_add(1);
        self.tick_index = 0;
        info!(round = self.round, "new game started");
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of full ticks resolved in the current round.
    #[must_use]
    pub const fn tick_index(&self) -> u64 {
        self.tick_index
    }

    /// Number of restarts since the world was built.
    #[must_use]
    pub const fn round(&self) -> u64 {
        self.round
    }
}

/// Applies the provided command to the world.
///
/// Events delivered to observers while resolving a tick are appended to
/// `out_events` in causal order.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::QueueIntent { agent, intent } => world.queue_intent(agent, intent),
        Command::Tick => world.tick(out_events),
        Command::NewGame => world.new_game(),
    }
}
