//! Plain-text board rendering.

use bomber_core::CellView;
use bomber_world::query::BoardView;

fn glyph(cell: CellView) -> char {
    match cell {
        CellView::Empty => '.',
        CellView::Wall => '#',
        CellView::SelfAgent => '@',
        CellView::SelfAgentOnBomb => 'Q',
        CellView::SelfAgentDead => 'x',
        CellView::OtherAgent => 'P',
        CellView::OtherAgentOnBomb => 'R',
        CellView::OtherAgentDead => 'p',
        CellView::Hostile => 'H',
        CellView::HostileDead => 'h',
        CellView::Bomb { countdown } => char::from_digit(countdown.min(9), 10).unwrap_or('*'),
        CellView::Blast => '*',
    }
}

/// Renders the board one row per line.
pub(crate) fn board(view: &BoardView) -> String {
    view.rows()
        .map(|row| row.iter().copied().map(glyph).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bombs_show_their_countdown() {
        assert_eq!(glyph(CellView::Bomb { countdown: 3 }), '3');
        assert_eq!(glyph(CellView::Bomb { countdown: 42 }), '9');
    }
}
