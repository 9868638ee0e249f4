//! Two-phase resolution of a full tick.
//!
//! The plan half-step reads every queued intent against one snapshot of
//! positions. The commit half-step then applies surviving placements and
//! moves before hostiles advance and bombs go off. No agent moves during
//! planning.

use std::collections::{BTreeSet, VecDeque};

use bomber_core::{AgentId, AgentKind, BombConfig, DeathCause, Direction, Event, Intent, Point};
use bomber_system_blast::compute_blast_with;
use bomber_system_wander::choose_step;
use tracing::{debug, error, info, trace, trace_span};

use crate::{registry::BlastCell, router::Death, World};

#[derive(Debug, Default)]
struct Plan {
    moves: Vec<StagedMove>,
    bombs: Vec<StagedBomb>,
}

#[derive(Clone, Copy, Debug)]
struct StagedMove {
    agent: AgentId,
    direction: Direction,
    target: Option<Point>,
}

#[derive(Clone, Copy, Debug)]
struct StagedBomb {
    owner: AgentId,
    position: Point,
    config: BombConfig,
}

impl World {
    /// Advances the world by one full tick.
    pub(crate) fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        let _span = trace_span!("tick", round = self.round, tick = self.tick_index).entered();

        self.registry.clear_blast();
        let plan = self.plan();
        trace!(
            moves = plan.moves.len(),
            bombs = plan.bombs.len(),
            "plan half-step complete"
        );

        let deaths = self.commit(plan);
        self.router.route(self.tick_index, &deaths, out_events);
    }

    fn plan(&mut self) -> Plan {
        let mut plan = Plan::default();
        let mut queued = Vec::new();

        for agent in self.registry.agents_mut() {
            let Some(intent) = agent.intent.take() else {
                continue;
            };
            let Some(loadout) = agent.loadout() else {
                continue;
            };
            if !agent.is_alive() {
                continue;
            }
            queued.push((agent.id, agent.position, intent, loadout.bombs));
        }

        for (agent, position, intent, config) in queued {
            match intent {
                Intent::Move(direction) => plan.moves.push(StagedMove {
                    agent,
                    direction,
                    target: position.step(direction),
                }),
                Intent::PlaceBomb => {
                    if self.can_place_bomb(agent, position, config) {
                        plan.bombs.push(StagedBomb {
                            owner: agent,
                            position,
                            config,
                        });
                    } else {
                        debug!(%agent, %position, "bomb placement rejected");
                    }
                }
            }
        }

        plan
    }

    fn can_place_bomb(&self, owner: AgentId, position: Point, config: BombConfig) -> bool {
        let allowance = usize::try_from(config.allowance).unwrap_or(usize::MAX);
        self.grid.is_walkable(position)
            && self.registry.bomb_at(position).is_none()
            && self.registry.bombs_owned_by(owner) < allowance
    }

    fn commit(&mut self, plan: Plan) -> Vec<Death> {
        let mut deaths = Vec::new();

        for staged in plan.bombs {
            let bomb = self
                .registry
                .place_bomb(staged.owner, staged.position, staged.config);
            debug!(
                owner = %staged.owner,
                position = %staged.position,
                bomb = bomb.get(),
                "bomb placed"
            );
        }

        self.commit_moves(&plan.moves);
        self.resolve_collisions(&mut deaths);
        self.advance_hostiles();
        self.resolve_collisions(&mut deaths);
        self.detonate(&mut deaths);

        deaths
    }

    /// Applies staged moves; the first registered mover wins a contested cell.
    fn commit_moves(&mut self, moves: &[StagedMove]) {
        let occupied: BTreeSet<Point> = self
            .registry
            .live_agents_of(AgentKind::Player)
            .map(|agent| agent.position)
            .collect();
        let mut claimed = BTreeSet::new();

        for staged in moves {
            let target = staged
                .target
                .filter(|cell| self.grid.is_walkable(*cell))
                .filter(|cell| self.registry.bomb_at(*cell).is_none())
                .filter(|cell| !occupied.contains(cell));

            match target {
                Some(cell) if claimed.insert(cell) => {
                    self.registry.relocate(staged.agent, cell, staged.direction);
                }
                _ => {
                    self.registry.turn(staged.agent, staged.direction);
                    debug!(agent = %staged.agent, direction = ?staged.direction, "move rejected");
                }
            }
        }
    }

    /// Kills every live player sharing a cell with a live hostile.
    fn resolve_collisions(&mut self, deaths: &mut Vec<Death>) {
        let caught: Vec<(AgentId, AgentId)> = self
            .registry
            .live_agents_of(AgentKind::Player)
            .filter_map(|player| {
                self.registry
                    .live_hostile_at(player.position)
                    .map(|hostile| (player.id, hostile))
            })
            .collect();

        for (victim, hostile) in caught {
            let cause = DeathCause::Hostile { hostile };
            self.record_death(victim, AgentKind::Player, cause, deaths);
        }
    }

    fn advance_hostiles(&mut self) {
        let hostiles: Vec<(AgentId, Point)> = self
            .registry
            .live_agents_of(AgentKind::Hostile)
            .map(|agent| (agent.id, agent.position))
            .collect();

        for (id, from) in hostiles {
            let grid = &self.grid;
            let registry = &self.registry;
            let step = choose_step(from, grid.size(), self.dice.as_mut(), |cell| {
                grid.is_wall(cell)
                    || registry.bomb_at(cell).is_some()
                    || registry.live_hostile_at(cell).is_some()
            });

            if let Some((direction, to)) = step {
                self.registry.relocate(id, to, direction);
                debug!(hostile = %id, %from, %to, "hostile stepped");
            }
        }
    }

    /// Ages bombs, resolves chain reactions, and burns whatever stands in the blast.
    fn detonate(&mut self, deaths: &mut Vec<Death>) {
        let mut pending: VecDeque<_> = self.registry.age_bombs().into();

        while let Some(bomb_id) = pending.pop_front() {
            let Some(bomb) = self.registry.remove_bomb(bomb_id) else {
                continue;
            };

            let grid = &self.grid;
            let blast = compute_blast_with(grid.size(), bomb.position, bomb.power, |cell| {
                grid.is_wall(cell)
            });
            debug_assert!(blast.is_ok(), "bomb placed on an invalid cell: {blast:?}");
            let cells = match blast {
                Ok(cells) => cells,
                Err(error) => {
                    error!(%error, bomb = bomb_id.get(), "detonation skipped");
                    continue;
                }
            };

            info!(
                bomb = bomb_id.get(),
                owner = %bomb.owner,
                position = %bomb.position,
                cells = cells.len(),
                "bomb detonated"
            );

            let origin = BlastCell {
                bomb: bomb.id,
                owner: bomb.owner,
            };
            for cell in cells {
                self.registry.burn(cell, origin);
                if let Some(chained) = self.registry.bomb_at(cell) {
                    if !pending.contains(&chained.id) {
                        pending.push_back(chained.id);
                    }
                }
            }
        }

        let burned: Vec<(AgentId, AgentKind, BlastCell)> = self
            .registry
            .agents()
            .iter()
            .filter(|agent| agent.is_alive())
            .filter_map(|agent| {
                self.registry
                    .blast()
                    .get(&agent.position)
                    .map(|origin| (agent.id, agent.kind(), *origin))
            })
            .collect();

        for (victim, kind, origin) in burned {
            let cause = DeathCause::Blast {
                bomb: origin.bomb,
                owner: origin.owner,
            };
            self.record_death(victim, kind, cause, deaths);
        }
    }

    fn record_death(
        &mut self,
        victim: AgentId,
        kind: AgentKind,
        cause: DeathCause,
        deaths: &mut Vec<Death>,
    ) {
        if self.registry.kill(victim, cause) {
            info!(agent = %victim, ?kind, ?cause, "agent died");
            deaths.push(Death {
                victim,
                kind,
                cause,
            });
        }
    }
}
