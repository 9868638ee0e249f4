//! Naive bot that steers one seat through its player view.

use bomber_core::{CellView, Direction, Intent, QueryError};
use bomber_world::PlayerView;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Ticks spent running away after dropping a bomb.
const FLEE_TICKS: u32 = 4;

#[derive(Debug)]
pub(crate) struct Autopilot {
    view: PlayerView,
    rng: ChaCha8Rng,
    fleeing: u32,
}

impl Autopilot {
    pub(crate) fn new(view: PlayerView, seed: u64) -> Self {
        Self {
            view,
            rng: ChaCha8Rng::seed_from_u64(seed),
            fleeing: 0,
        }
    }

    pub(crate) fn view(&self) -> &PlayerView {
        &self.view
    }

    /// Queues the next intent, or nothing when the agent is dead or boxed in.
    pub(crate) fn steer(&mut self) -> Result<Option<Intent>, QueryError> {
        let me = self.view.agent()?;
        if !me.is_alive() {
            self.fleeing = 0;
            return Ok(None);
        }

        let open: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|direction| {
                me.position
                    .step(*direction)
                    .is_some_and(|cell| matches!(self.view.cell(cell), Ok(CellView::Empty)))
            })
            .collect();

        let intent = if self.fleeing > 0 {
            self.fleeing -= 1;
            if open.contains(&me.facing) {
                Some(Intent::Move(me.facing))
            } else {
                open.choose(&mut self.rng).copied().map(Intent::Move)
            }
        } else if !open.is_empty() && self.rng.gen_ratio(1, 6) {
            self.fleeing = FLEE_TICKS;
            Some(Intent::PlaceBomb)
        } else {
            open.choose(&mut self.rng).copied().map(Intent::Move)
        };

        if let Some(intent) = intent {
            self.view.queue_intent(intent)?;
        }
        Ok(intent)
    }
}
