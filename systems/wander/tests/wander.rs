use std::collections::BTreeSet;

use bomber_core::{BoardSize, Direction, Point};
use bomber_system_wander::{choose_step, legal_steps, scatter, ScriptedDice, SeededDice};

#[test]
fn legal_steps_skip_edges_and_blocked_cells() {
    let blocked = BTreeSet::from([Point::new(1, 0)]);
    let steps = legal_steps(Point::new(0, 0), BoardSize::new(3, 3), |cell| {
        blocked.contains(&cell)
    });

    assert_eq!(steps, vec![(Direction::South, Point::new(0, 1))]);
}

#[test]
fn roll_indexes_into_legal_steps() {
    let mut dice = ScriptedDice::constant(2);
    let step = choose_step(Point::new(2, 0), BoardSize::new(5, 5), &mut dice, |_| false);

    assert_eq!(step, Some((Direction::West, Point::new(1, 0))));
    assert_eq!(dice.requested_bounds(), vec![3]);
}

#[test]
fn boxed_in_hostile_does_not_roll() {
    let mut dice = ScriptedDice::constant(0);
    let step = choose_step(Point::new(1, 1), BoardSize::new(3, 3), &mut dice, |_| true);

    assert_eq!(step, None);
    assert!(dice.requested_bounds().is_empty());
}

#[test]
fn scatter_places_distinct_free_cells() {
    let size = BoardSize::new(4, 4);
    let reserved = BTreeSet::from([Point::new(0, 0), Point::new(3, 3)]);
    let mut dice = SeededDice::new(99);

    let placed = scatter(6, size, &mut dice, |cell| !reserved.contains(&cell));
    let unique: BTreeSet<_> = placed.iter().copied().collect();

    assert_eq!(placed.len(), 6);
    assert_eq!(unique.len(), 6);
    assert!(placed.iter().all(|cell| !reserved.contains(cell)));
}

#[test]
fn scatter_stops_when_the_board_is_full() {
    let mut dice = ScriptedDice::default();
    let pillar = Point::new(1, 1);
    let placed = scatter(10, BoardSize::new(2, 2), &mut dice, |cell| cell != pillar);

    assert_eq!(
        placed,
        vec![Point::new(0, 0), Point::new(1, 0), Point::new(0, 1)]
    );
}
