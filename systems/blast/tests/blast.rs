use std::collections::BTreeSet;

use bomber_core::{BoardSize, Point, WallLayout};
use bomber_system_blast::{compute_blast, compute_blast_with};

#[test]
fn open_board_blast_is_a_diamond() {
    assert_blast(
        BoardSize::new(7, 7),
        &BTreeSet::new(),
        Point::new(3, 3),
        2,
        concat!(
            "       \n",
            "   *   \n",
            "  ***  \n",
            " **@** \n",
            "  ***  \n",
            "   *   \n",
            "       \n",
        ),
    );
}

#[test]
fn wall_cluster_casts_a_shadow() {
    let obstacles = BTreeSet::from([Point::new(3, 1), Point::new(3, 2), Point::new(3, 3)]);
    let burned = assert_blast(
        BoardSize::new(7, 5),
        &obstacles,
        Point::new(1, 2),
        4,
        concat!(
            "****   \n",
            "***X   \n",
            "*@*X   \n",
            "***X   \n",
            "****   \n",
        ),
    );

    let behind = Point::new(4, 2);
    assert!(behind.manhattan_distance(Point::new(1, 2)) <= 4);
    assert!(
        !burned.contains(&behind),
        "detour around the wall exceeds the radius"
    );
}

#[test]
fn pillars_channel_the_blast_into_corridors() {
    let size = BoardSize::new(9, 9);
    let obstacles = WallLayout::Pillars.resolve(size).expect("valid board");
    let _ = assert_blast(
        size,
        &obstacles,
        Point::new(3, 3),
        2,
        concat!(
            "XXXXXXXXX\n",
            "X  *    X\n",
            "X X*X X X\n",
            "X**@**  X\n",
            "X X*X X X\n",
            "X  *    X\n",
            "X X X X X\n",
            "X       X\n",
            "XXXXXXXXX\n",
        ),
    );
}

#[test]
fn enclosed_pocket_is_never_reached() {
    let size = BoardSize::new(5, 5);
    let obstacles = BTreeSet::from([Point::new(3, 4), Point::new(4, 3)]);
    let burned = compute_blast(&obstacles, size, Point::new(0, 0), 100).expect("valid source");

    assert!(!burned.contains(&Point::new(4, 4)));
    assert_eq!(burned.len(), 25 - obstacles.len() - 1);
}

#[test]
fn blast_never_burns_obstacles_or_exceeds_radius() {
    let size = BoardSize::new(11, 11);
    let obstacles = WallLayout::Pillars.resolve(size).expect("valid board");

    for source in size.points().filter(|point| !obstacles.contains(point)) {
        for radius in 0..4 {
            let burned = compute_blast(&obstacles, size, source, radius).expect("valid source");
            assert!(burned.contains(&source));
            for cell in &burned {
                assert!(!obstacles.contains(cell), "obstacle {cell} was burned");
                assert!(
                    cell.manhattan_distance(source) <= radius,
                    "{cell} lies beyond radius {radius} of {source}"
                );
            }
        }
    }
}

#[test]
fn blast_is_deterministic_for_fixed_inputs() {
    let size = BoardSize::new(9, 9);
    let obstacles = BTreeSet::from([Point::new(4, 3), Point::new(4, 4), Point::new(3, 4)]);
    let source = Point::new(5, 5);

    let first = compute_blast(&obstacles, size, source, 6).expect("valid source");
    let second = compute_blast(&obstacles, size, source, 6).expect("valid source");
    let lazy = compute_blast_with(size, source, 6, |cell| obstacles.contains(&cell))
        .expect("valid source");

    assert_eq!(first, second);
    assert_eq!(first, lazy);
}

fn assert_blast(
    size: BoardSize,
    obstacles: &BTreeSet<Point>,
    source: Point,
    radius: u32,
    expected: &str,
) -> BTreeSet<Point> {
    let burned = compute_blast(obstacles, size, source, radius).expect("valid source");
    assert_eq!(render(size, obstacles, source, &burned), expected);
    burned
}

fn render(
    size: BoardSize,
    obstacles: &BTreeSet<Point>,
    source: Point,
    burned: &BTreeSet<Point>,
) -> String {
    let mut out = String::new();
    for y in 0..size.height() {
        for x in 0..size.width() {
            let point = Point::new(x, y);
            let glyph = if point == source {
                '@'
            } else if obstacles.contains(&point) {
                'X'
            } else if burned.contains(&point) {
                '*'
            } else {
                ' '
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}
