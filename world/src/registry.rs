//! Entity registry owning every agent, bomb, and the active blast.

use std::collections::{BTreeMap, BTreeSet};

use bomber_core::{AgentId, AgentKind, BombConfig, BombId, DeathCause, Direction, Intent, Point};

const SPAWN_FACING: Direction = Direction::South;

/// Tagged life state; corpses stay registered until the next restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LifeState {
    Alive,
    Dead(DeathCause),
}

impl LifeState {
    pub(crate) const fn cause(&self) -> Option<DeathCause> {
        match self {
            Self::Alive => None,
            Self::Dead(cause) => Some(*cause),
        }
    }
}

/// Player-only attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Loadout {
    pub(crate) start: Point,
    pub(crate) bombs: BombConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Role {
    Player(Loadout),
    Hostile,
}

#[derive(Clone, Debug)]
pub(crate) struct Agent {
    pub(crate) id: AgentId,
    pub(crate) role: Role,
    pub(crate) position: Point,
    pub(crate) life: LifeState,
    pub(crate) intent: Option<Intent>,
    pub(crate) facing: Direction,
}

impl Agent {
    fn spawn(id: AgentId, role: Role, position: Point) -> Self {
        Self {
            id,
            role,
            position,
            life: LifeState::Alive,
            intent: None,
            facing: SPAWN_FACING,
        }
    }

    pub(crate) const fn kind(&self) -> AgentKind {
        match self.role {
            Role::Player(_) => AgentKind::Player,
            Role::Hostile => AgentKind::Hostile,
        }
    }

    pub(crate) const fn is_alive(&self) -> bool {
        matches!(self.life, LifeState::Alive)
    }

    pub(crate) const fn loadout(&self) -> Option<Loadout> {
        match self.role {
            Role::Player(loadout) => Some(loadout),
            Role::Hostile => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Bomb {
    pub(crate) id: BombId,
    pub(crate) owner: AgentId,
    pub(crate) position: Point,
    pub(crate) countdown: u32,
    pub(crate) power: u32,
}

/// Attribution of a burning cell to the detonation that reached it first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BlastCell {
    pub(crate) bomb: BombId,
    pub(crate) owner: AgentId,
}

/// Hands out the lowest free identifier and takes released ones back.
#[derive(Clone, Debug, Default)]
struct IdPool {
    next: u32,
    released: BTreeSet<u32>,
}

impl IdPool {
    fn acquire(&mut self) -> u32 {
        if let Some(id) = self.released.pop_first() {
            return id;
        }
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    fn release(&mut self, id: u32) {
        let _ = self.released.insert(id);
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Registry {
    agents: Vec<Agent>,
    bombs: Vec<Bomb>,
    blast: BTreeMap<Point, BlastCell>,
    agent_ids: IdPool,
    bomb_ids: IdPool,
}

impl Registry {
    pub(crate) fn spawn_player(&mut self, start: Point, bombs: BombConfig) -> AgentId {
        let id = AgentId::new(self.agent_ids.acquire());
        let role = Role::Player(Loadout { start, bombs });
        self.agents.push(Agent::spawn(id, role, start));
        id
    }

    pub(crate) fn spawn_hostile(&mut self, position: Point) -> AgentId {
        let id = AgentId::new(self.agent_ids.acquire());
        self.agents.push(Agent::spawn(id, Role::Hostile, position));
        id
    }

    /// Agents in registration order.
    pub(crate) fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub(crate) fn agents_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    pub(crate) fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub(crate) fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|agent| agent.id == id)
    }

    /// Whether a joining player may start on `cell`.
    pub(crate) fn is_free_spawn(&self, cell: Point) -> bool {
        let claimed = self.agents.iter().any(|agent| {
            agent.loadout().is_some_and(|loadout| loadout.start == cell)
                || (agent.is_alive() && agent.position == cell)
        });
        !claimed && self.bomb_at(cell).is_none()
    }

    pub(crate) fn live_agents_of(&self, kind: AgentKind) -> impl Iterator<Item = &Agent> {
        self.agents
            .iter()
            .filter(move |agent| agent.kind() == kind && agent.is_alive())
    }

    pub(crate) fn live_hostile_at(&self, cell: Point) -> Option<AgentId> {
        self.live_agents_of(AgentKind::Hostile)
            .find(|agent| agent.position == cell)
            .map(|agent| agent.id)
    }

    pub(crate) fn relocate(&mut self, id: AgentId, position: Point, facing: Direction) {
        if let Some(agent) = self.agent_mut(id) {
            agent.position = position;
            agent.facing = facing;
        }
    }

    pub(crate) fn turn(&mut self, id: AgentId, facing: Direction) {
        if let Some(agent) = self.agent_mut(id) {
            agent.facing = facing;
        }
    }

    /// Marks a live agent dead. Returns `false` when it was already dead.
    pub(crate) fn kill(&mut self, id: AgentId, cause: DeathCause) -> bool {
        match self.agent_mut(id) {
            Some(agent) if agent.is_alive() => {
                agent.life = LifeState::Dead(cause);
                agent.intent = None;
                true
            }
            _ => false,
        }
    }

    /// Bombs in placement order.
    pub(crate) fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub(crate) fn bomb_at(&self, cell: Point) -> Option<&Bomb> {
        self.bombs.iter().find(|bomb| bomb.position == cell)
    }

    pub(crate) fn bombs_owned_by(&self, owner: AgentId) -> usize {
        self.bombs.iter().filter(|bomb| bomb.owner == owner).count()
    }

    pub(crate) fn place_bomb(
        &mut self,
        owner: AgentId,
        position: Point,
        config: BombConfig,
    ) -> BombId {
        let id = BombId::new(self.bomb_ids.acquire());
        self.bombs.push(Bomb {
            id,
            owner,
            position,
            countdown: config.countdown,
            power: config.power,
        });
        id
    }

    /// Ages every bomb by one tick and lists those whose fuse ran out.
    pub(crate) fn age_bombs(&mut self) -> Vec<BombId> {
        self.bombs
            .iter_mut()
            .filter_map(|bomb| {
                bomb.countdown = bomb.countdown.saturating_sub(1);
                (bomb.countdown == 0).then_some(bomb.id)
            })
            .collect()
    }

    pub(crate) fn remove_bomb(&mut self, id: BombId) -> Option<Bomb> {
        let index = self.bombs.iter().position(|bomb| bomb.id == id)?;
        let bomb = self.bombs.remove(index);
        self.bomb_ids.release(id.get());
        Some(bomb)
    }

    pub(crate) fn blast(&self) -> &BTreeMap<Point, BlastCell> {
        &self.blast
    }

    /// Burns a cell unless an earlier detonation of this pass already did.
    pub(crate) fn burn(&mut self, cell: Point, origin: BlastCell) {
        let _ = self.blast.entry(cell).or_insert(origin);
    }

    pub(crate) fn clear_blast(&mut self) {
        self.blast.clear();
    }

    /// Restores the start-of-round state.
    ///
    /// Players return to their start cells alive, hostiles are dropped and
    /// recreated at `hostile_spawns`, and every bomb and blast disappears.
    pub(crate) fn reset_round(&mut self, hostile_spawns: &[Point]) {
        for bomb in self.bombs.drain(..) {
            self.bomb_ids.release(bomb.id.get());
        }
        self.blast.clear();

        let agent_ids = &mut self.agent_ids;
        self.agents.retain(|agent| match agent.role {
            Role::Player(_) => true,
            Role::Hostile => {
                agent_ids.release(agent.id.get());
                false
            }
        });

        for agent in &mut self.agents {
            if let Role::Player(loadout) = agent.role {
                *agent = Agent::spawn(agent.id, agent.role, loadout.start);
            }
        }

        for &spawn in hostile_spawns {
            let _ = self.spawn_hostile(spawn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_identifiers_are_reused_lowest_first() {
        let mut pool = IdPool::default();
        let first = pool.acquire();
        let second = pool.acquire();
        let third = pool.acquire();
        pool.release(third);
        pool.release(first);

        assert_eq!(pool.acquire(), first);
        assert_eq!(pool.acquire(), third);
        assert_eq!(pool.acquire(), second + 2);
    }

    #[test]
    fn reset_round_reclaims_hostile_identities() {
        let mut registry = Registry::default();
        let hostile = registry.spawn_hostile(Point::new(3, 3));
        let player = registry.spawn_player(Point::new(0, 0), BombConfig::default());
        let _ = registry.kill(player, DeathCause::Hostile { hostile });
        registry.relocate(hostile, Point::new(2, 3), Direction::West);

        registry.reset_round(&[Point::new(3, 3)]);

        let agents = registry.agents();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].id, player);
        assert!(agents[0].is_alive());
        assert_eq!(agents[0].position, Point::new(0, 0));
        assert_eq!(agents[1].id, hostile);
        assert_eq!(agents[1].position, Point::new(3, 3));
    }

    #[test]
    fn spawns_are_free_only_when_unclaimed_and_unoccupied() {
        let mut registry = Registry::default();
        let _ = registry.spawn_player(Point::new(0, 0), BombConfig::default());
        let hostile = registry.spawn_hostile(Point::new(2, 0));
        let _ = registry.place_bomb(AgentId::new(0), Point::new(3, 0), BombConfig::default());

        assert!(!registry.is_free_spawn(Point::new(0, 0)));
        assert!(registry.is_free_spawn(Point::new(1, 0)));
        assert!(!registry.is_free_spawn(Point::new(2, 0)));
        assert!(!registry.is_free_spawn(Point::new(3, 0)));

        let _ = registry.kill(
            hostile,
            DeathCause::Blast {
                bomb: BombId::new(0),
                owner: AgentId::new(0),
            },
        );
        assert!(registry.is_free_spawn(Point::new(2, 0)));
    }

    #[test]
    fn first_burn_keeps_attribution() {
        let mut registry = Registry::default();
        let cell = Point::new(1, 1);
        let first = BlastCell {
            bomb: BombId::new(0),
            owner: AgentId::new(4),
        };
        registry.burn(cell, first);
        registry.burn(
            cell,
            BlastCell {
                bomb: BombId::new(1),
                owner: AgentId::new(5),
            },
        );

        assert_eq!(registry.blast().get(&cell), Some(&first));
    }

    #[test]
    fn bomb_identities_are_reclaimed_after_detonation() {
        let mut registry = Registry::default();
        let owner = AgentId::new(0);
        let config = BombConfig {
            countdown: 1,
            ..BombConfig::default()
        };
        let bomb = registry.place_bomb(owner, Point::new(0, 0), config);

        assert_eq!(registry.age_bombs(), vec![bomb]);
        assert!(registry.remove_bomb(bomb).is_some());
        assert_eq!(registry.bombs_owned_by(owner), 0);
        assert_eq!(registry.place_bomb(owner, Point::new(1, 0), config), bomb);
    }
}
