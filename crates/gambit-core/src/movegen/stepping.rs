//! Single-step move generation (king, knight).

use crate::board::Board;
use crate::color::Color;
use crate::square::Square;

/// One candidate square per offset: kept if on the grid and empty or enemy-held.
pub fn step(board: &Board, offsets: &[(i8, i8)], from: Square, color: Color) -> Vec<Square> {
    offsets
        .iter()
        .map(|&(d_row, d_col)| from.offset(d_row, d_col))
        .filter(|&dst| board.is_vacant(dst) || board.is_enemy(dst, color))
        .collect()
}
