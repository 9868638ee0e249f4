#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure blast system that computes which cells a detonation reaches.
//!
//! The blast spreads breadth-first through the four orthogonal neighbours and
//! stops once the geodesic distance from the source exceeds the bomb's power.
//! Obstacles are never burned and never crossed, so clustered walls cast
//! shadows: cells behind them are only reached if a detour around the cluster
//! still fits in the distance budget.

use std::collections::{BTreeSet, VecDeque};

use bomber_core::{BlastError, BoardSize, Point};

const UNVISITED: u32 = u32::MAX;

/// Computes the cells burned by a detonation at `source`.
///
/// The returned set always contains `source` and never contains an obstacle.
pub fn compute_blast(
    obstacles: &BTreeSet<Point>,
    bounds: BoardSize,
    source: Point,
    radius: u32,
) -> Result<BTreeSet<Point>, BlastError> {
    compute_blast_with(bounds, source, radius, |cell| obstacles.contains(&cell))
}

/// Computes the cells burned by a detonation, querying obstacles lazily.
///
/// Fails when `source` is outside `bounds` or is itself an obstacle; callers
/// are expected to never detonate a bomb in either position.
pub fn compute_blast_with<F>(
    bounds: BoardSize,
    source: Point,
    radius: u32,
    mut is_obstacle: F,
) -> Result<BTreeSet<Point>, BlastError>
where
    F: FnMut(Point) -> bool,
{
    let Some(source_index) = bounds.index(source) else {
        return Err(BlastError::SourceOutOfBounds(source));
    };
    if is_obstacle(source) {
        return Err(BlastError::SourceIsObstacle(source));
    }

    let mut distances = vec![UNVISITED; bounds.cell_count()];
    let mut burned = BTreeSet::new();
    let mut queue = VecDeque::new();

    distances[source_index] = 0;
    let _ = burned.insert(source);
    queue.push_back(source);

    while let Some(cell) = queue.pop_front() {
        let Some(current_index) = bounds.index(cell) else {
            continue;
        };
        let current_distance = distances[current_index];
        if current_distance >= radius {
            continue;
        }

        for (_, neighbor) in cell.neighbors() {
            let Some(neighbor_index) = bounds.index(neighbor) else {
                continue;
            };
            if distances[neighbor_index] != UNVISITED || is_obstacle(neighbor) {
                continue;
            }

            distances[neighbor_index] = current_distance + 1;
            let _ = burned.insert(neighbor);
            queue.push_back(neighbor);
        }
    }

    Ok(burned)
}
