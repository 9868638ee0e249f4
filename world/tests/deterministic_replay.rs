use bomber_core::{
    AgentKind, Command, Dice, Direction, Event, EventRecorder, GameConfig, Intent, Point,
};
use bomber_system_wander::SeededDice;
use bomber_world::{
    apply,
    query::{self, AgentSnapshot, BombSnapshot},
    World,
};

#[derive(Debug, PartialEq)]
struct Frame {
    agents: Vec<AgentSnapshot>,
    bombs: Vec<BombSnapshot>,
    blast: Vec<Point>,
    events: Vec<Event>,
}

#[test]
fn seeded_matches_replay_identically() {
    let config = GameConfig {
        seed: 0xb0b,
        ..GameConfig::default()
    };

    let first = replay(config.clone(), 11, 250);
    let second = replay(config, 11, 250);

    assert_eq!(first.len(), second.len());
    for (tick, (left, right)) in first.iter().zip(&second).enumerate() {
        assert_eq!(left, right, "replay diverged on tick {}", tick + 1);
    }
}

#[test]
fn restarted_rounds_reuse_the_initial_hostile_placement() {
    let mut world = World::seeded(GameConfig::default()).expect("valid world");
    let hostiles = |world: &World| -> Vec<Point> {
        query::agents(world)
            .into_iter()
            .filter(|agent| agent.kind == AgentKind::Hostile)
            .map(|agent| agent.position)
            .collect()
    };
    let initial = hostiles(&world);
    assert_eq!(initial.len(), GameConfig::default().hostiles.count);

    for _ in 0..20 {
        apply(&mut world, Command::Tick, &mut Vec::new());
    }
    apply(&mut world, Command::NewGame, &mut Vec::new());

    assert_eq!(hostiles(&world), initial);
}

fn replay(config: GameConfig, intent_seed: u64, ticks: usize) -> Vec<Frame> {
    let players = config.player_spawns.len();
    let mut world = World::seeded(config).expect("valid world");
    let ids: Vec<_> = (0..players)
        .map(|_| world.join(Box::new(EventRecorder::new())).expect("spawn"))
        .collect();
    let mut intents = SeededDice::new(intent_seed);
    let mut frames = Vec::with_capacity(ticks);

    for _ in 0..ticks {
        for id in &ids {
            let intent = match intents.next(5) {
                0 => Intent::PlaceBomb,
                roll => Intent::Move(Direction::ALL[(roll - 1) as usize]),
            };
            let command = Command::QueueIntent { agent: *id, intent };
            apply(&mut world, command, &mut Vec::new());
        }

        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        frames.push(Frame {
            agents: query::agents(&world),
            bombs: query::bombs(&world),
            blast: query::blast_cells(&world),
            events,
        });

        if query::live_count(&world, AgentKind::Player) == 0 {
            apply(&mut world, Command::NewGame, &mut Vec::new());
        }
    }

    frames
}
