#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Random-walk system that steers hostiles and scatters them across the board.
//!
//! All randomness flows through the [`Dice`] capability. [`SeededDice`] backs
//! real matches while [`ScriptedDice`] replays a fixed roll sequence so tests
//! can dictate every hostile step.

use std::sync::{Arc, Mutex, PoisonError};

use bomber_core::{BoardSize, Dice, Direction, Point};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lists the neighbours a hostile may step onto, in canonical direction order.
pub fn legal_steps<F>(from: Point, bounds: BoardSize, mut is_blocked: F) -> Vec<(Direction, Point)>
where
    F: FnMut(Point) -> bool,
{
    from.neighbors()
        .filter(|(_, cell)| bounds.contains(*cell) && !is_blocked(*cell))
        .collect()
}

/// Picks one legal neighbour uniformly at random.
///
/// Returns `None` without rolling when every neighbour is blocked.
pub fn choose_step<F>(
    from: Point,
    bounds: BoardSize,
    dice: &mut dyn Dice,
    is_blocked: F,
) -> Option<(Direction, Point)>
where
    F: FnMut(Point) -> bool,
{
    let legal = legal_steps(from, bounds, is_blocked);
    if legal.is_empty() {
        return None;
    }

    let bound = u32::try_from(legal.len()).ok()?;
    let roll = dice.next(bound) % bound;
    legal.get(usize::try_from(roll).ok()?).copied()
}

/// Picks up to `count` distinct free cells, one roll per pick.
///
/// Candidates are enumerated in row-major order and each roll selects among
/// the cells that remain, so the result never repeats a cell. Fewer than
/// `count` cells are returned when the board runs out of free space.
pub fn scatter<F>(
    count: usize,
    bounds: BoardSize,
    dice: &mut dyn Dice,
    mut is_free: F,
) -> Vec<Point>
where
    F: FnMut(Point) -> bool,
{
    let mut candidates: Vec<Point> = bounds.points().filter(|cell| is_free(*cell)).collect();
    let mut placed = Vec::with_capacity(count.min(candidates.len()));

    while placed.len() < count && !candidates.is_empty() {
        let Ok(bound) = u32::try_from(candidates.len()) else {
            break;
        };
        let roll = dice.next(bound) % bound;
        let Ok(index) = usize::try_from(roll) else {
            break;
        };
        placed.push(candidates.remove(index));
    }

    placed
}

/// Production dice backed by a seeded ChaCha stream.
#[derive(Clone, Debug)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    /// Creates dice whose roll sequence is fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Dice for SeededDice {
    fn next(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }
}

/// Deterministic dice that replays a fixed roll sequence.
///
/// The sequence repeats once exhausted and an empty script always rolls zero.
/// Rolls are reduced modulo the requested bound. Clones share the log of
/// requested bounds, so a test can keep one handle while the world owns
/// another.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    script: Vec<u32>,
    cursor: usize,
    requests: Arc<Mutex<Vec<u32>>>,
}

impl ScriptedDice {
    /// Creates dice that replay the provided rolls in order.
    #[must_use]
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self {
            script: script.into_iter().collect(),
            cursor: 0,
            requests: Arc::default(),
        }
    }

    /// Creates dice that always roll the same value.
    #[must_use]
    pub fn constant(value: u32) -> Self {
        Self::new([value])
    }

    /// Bounds passed to every roll so far, in order.
    #[must_use]
    pub fn requested_bounds(&self) -> Vec<u32> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Dice for ScriptedDice {
    fn next(&mut self, bound: u32) -> u32 {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(bound);

        if self.script.is_empty() || bound == 0 {
            return 0;
        }
        let value = self.script[self.cursor % self.script.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value % bound
    }
}
