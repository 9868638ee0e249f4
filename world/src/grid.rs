//! Static board geometry.

use std::collections::BTreeSet;

use bomber_core::{BoardSize, GridError, Point, WallLayout};

/// Fixed-size board and the permanent walls placed on it.
///
/// Walls never change after construction; there is no mutation API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: BoardSize,
    walls: BTreeSet<Point>,
}

impl Grid {
    /// Creates a grid from explicit wall cells.
    pub fn new<I>(size: BoardSize, walls: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = Point>,
    {
        Self::from_layout(
            size,
            &WallLayout::Custom {
                cells: walls.into_iter().collect(),
            },
        )
    }

    /// Creates a grid from one of the built-in wall layouts.
    pub fn from_layout(size: BoardSize, layout: &WallLayout) -> Result<Self, GridError> {
        let walls = layout.resolve(size)?;
        Ok(Self { size, walls })
    }

    /// Board dimensions.
    #[must_use]
    pub const fn size(&self) -> BoardSize {
        self.size
    }

    /// Reports whether the point lies on the board.
    #[must_use]
    pub const fn in_bounds(&self, point: Point) -> bool {
        self.size.contains(point)
    }

    /// Reports whether a wall occupies the point.
    #[must_use]
    pub fn is_wall(&self, point: Point) -> bool {
        self.walls.contains(&point)
    }

    /// Reports whether an agent may stand on the point, ignoring other entities.
    #[must_use]
    pub fn is_walkable(&self, point: Point) -> bool {
        self.in_bounds(point) && !self.is_wall(point)
    }

    /// Every wall cell in ascending order.
    #[must_use]
    pub fn walls(&self) -> &BTreeSet<Point> {
        &self.walls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_are_not_walkable() {
        let grid = Grid::new(BoardSize::new(3, 3), [Point::new(1, 1)]).expect("valid grid");

        assert!(grid.is_wall(Point::new(1, 1)));
        assert!(!grid.is_walkable(Point::new(1, 1)));
        assert!(grid.is_walkable(Point::new(0, 1)));
        assert!(!grid.is_walkable(Point::new(3, 1)));
    }

    #[test]
    fn walls_outside_the_board_are_rejected() {
        let result = Grid::new(BoardSize::new(2, 2), [Point::new(2, 0)]);
        assert_eq!(result, Err(GridError::WallOutOfBounds(Point::new(2, 0))));
    }

    #[test]
    fn empty_board_is_rejected() {
        let result = Grid::from_layout(BoardSize::new(0, 4), &WallLayout::Open);
        assert_eq!(result, Err(GridError::EmptyBoard));
    }
}
