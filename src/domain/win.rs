/// Bingo detection: any full row, column, or either diagonal.

use super::card::{Card, GRID_DIM};

fn marked_row(card: &Card, row: usize) -> bool {
    (0..GRID_DIM).all(|col| card.is_marked(row, col))
}

fn marked_col(card: &Card, col: usize) -> bool {
    (0..GRID_DIM).all(|row| card.is_marked(row, col))
}

fn marked_diag_forward(card: &Card) -> bool {
    (0..GRID_DIM).all(|k| card.is_marked(k, k))
}

fn marked_diag_backward(card: &Card) -> bool {
    (0..GRID_DIM).all(|k| card.is_marked(k, GRID_DIM - k - 1))
}

/// Row k and column k are tested together, then both diagonals.
pub fn has_bingo(card: &Card) -> bool {
    (0..GRID_DIM).any(|k| marked_row(card, k) || marked_col(card, k))
        || marked_diag_forward(card)
        || marked_diag_backward(card)
}
