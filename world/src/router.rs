//! Attribution of deaths to the observers that should hear about them.

use std::{collections::BTreeMap, fmt};

use bomber_core::{AgentId, AgentKind, DeathCause, Event, EventKind, Observer};
use tracing::warn;

/// Death recorded during a resolution step, in causal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Death {
    pub(crate) victim: AgentId,
    pub(crate) kind: AgentKind,
    pub(crate) cause: DeathCause,
}

/// Maps player identities to their observers.
#[derive(Default)]
pub(crate) struct EventRouter {
    observers: BTreeMap<AgentId, Box<dyn Observer>>,
}

impl EventRouter {
    pub(crate) fn register(&mut self, agent: AgentId, observer: Box<dyn Observer>) {
        let _ = self.observers.insert(agent, observer);
    }

    /// Delivers one event per attributable death, preserving causal order.
    pub(crate) fn route(&mut self, tick: u64, deaths: &[Death], out_events: &mut Vec<Event>) {
        for death in deaths {
            let Some((recipient, kind)) = attribute(death) else {
                continue;
            };

            let Some(observer) = self.observers.get_mut(&recipient) else {
                warn!(%recipient, victim = %death.victim, "no observer registered for recipient");
                continue;
            };

            observer.on_event(kind);
            out_events.push(Event {
                tick,
                recipient,
                victim: death.victim,
                kind,
                cause: death.cause,
            });
        }
    }
}

impl fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("observers", &self.observers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Players hear about their own deaths; hostile kills credit the bomb owner.
fn attribute(death: &Death) -> Option<(AgentId, EventKind)> {
    match (death.kind, death.cause) {
        (AgentKind::Player, _) => Some((death.victim, EventKind::AgentKilled)),
        (AgentKind::Hostile, DeathCause::Blast { owner, .. }) => {
            Some((owner, EventKind::HostileKilled))
        }
        (AgentKind::Hostile, DeathCause::Hostile { .. }) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomber_core::{BombId, EventRecorder};

    #[test]
    fn player_death_notifies_the_victim_only() {
        let victim = AgentId::new(1);
        let bomber = AgentId::new(2);
        let victim_log = EventRecorder::new();
        let bomber_log = EventRecorder::new();
        let mut router = EventRouter::default();
        router.register(victim, Box::new(victim_log.clone()));
        router.register(bomber, Box::new(bomber_log.clone()));

        let mut out = Vec::new();
        router.route(
            3,
            &[Death {
                victim,
                kind: AgentKind::Player,
                cause: DeathCause::Blast {
                    bomb: BombId::new(0),
                    owner: bomber,
                },
            }],
            &mut out,
        );

        assert_eq!(victim_log.events(), vec![EventKind::AgentKilled]);
        assert!(bomber_log.events().is_empty());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipient, victim);
        assert_eq!(out[0].tick, 3);
    }

    #[test]
    fn hostile_death_credits_the_bomb_owner() {
        let bomber = AgentId::new(2);
        let bomber_log = EventRecorder::new();
        let mut router = EventRouter::default();
        router.register(bomber, Box::new(bomber_log.clone()));

        let mut out = Vec::new();
        router.route(
            1,
            &[Death {
                victim: AgentId::new(7),
                kind: AgentKind::Hostile,
                cause: DeathCause::Blast {
                    bomb: BombId::new(4),
                    owner: bomber,
                },
            }],
            &mut out,
        );

        assert_eq!(bomber_log.events(), vec![EventKind::HostileKilled]);
        assert_eq!(out[0].victim, AgentId::new(7));
    }
}
