//! Game rules for Omok
//!
//! This module implements the rule set:
//! - Win conditions (five in a row, overline reported separately)
//! - Forbidden moves (double-three)
//!
//! Every function here is pure: boards are borrowed, never mutated, and
//! off-board coordinates count as "no match" rather than an error.

pub mod forbidden;
pub mod win;

use serde::Serialize;

use crate::board::{Board, Pos, Stone};

// Re-exports for convenient access
pub use forbidden::{count_open_threes, creates_double_three};
pub use win::{creates_overline, get_winning_line, is_winning_move, WinQuery};

/// Direction vectors for line checking, in scan order
pub const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal down
    (-1, 1), // Diagonal up
];

/// Bounds check, `0 <= row, col < N`
#[inline]
pub fn is_inside(board: &Board, row: i32, col: i32) -> bool {
    board.is_inside(row, col)
}

/// Length of the same-color run through `pos` along `(dr, dc)`.
///
/// The cell at `pos` always counts as one, whatever the board holds there,
/// so this works on boards from before or after the stone is placed.
pub(crate) fn run_length(board: &Board, pos: Pos, color: Stone, dr: i32, dc: i32) -> usize {
    1 + ray_length(board, pos, color, dr, dc) + ray_length(board, pos, color, -dr, -dc)
}

/// Consecutive `color` stones starting one step from `pos`
pub(crate) fn ray_length(board: &Board, pos: Pos, color: Stone, dr: i32, dc: i32) -> usize {
    let mut count = 0;
    let mut dist = 1;
    loop {
        let (r, c) = pos.offset(dr, dc, dist);
        match board.cell(r, c) {
            Some(cell) if cell == color => {
                count += 1;
                dist += 1;
            }
            _ => return count,
        }
    }
}

/// Check if a move is legal for `color`
///
/// A move is valid if:
/// 1. The position is on the board
/// 2. The position is empty
/// 3. It doesn't create a double-three
pub fn is_valid_move(board: &Board, pos: Pos, color: Stone) -> bool {
    board.contains(pos) && board.is_empty(pos) && !creates_double_three(board, pos, color)
}

/// Everything the rules say about one candidate placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAssessment {
    pub inside: bool,
    pub occupied: bool,
    pub double_three: bool,
    pub winning: bool,
    pub overline: bool,
}

impl MoveAssessment {
    /// Whether the placement passes every legality check
    pub fn is_legal(&self) -> bool {
        self.inside && !self.occupied && !self.double_three
    }
}

/// Run all predicates for `color` playing at `pos`
pub fn assess_move(board: &Board, pos: Pos, color: Stone) -> MoveAssessment {
    if !board.contains(pos) {
        return MoveAssessment {
            inside: false,
            occupied: false,
            double_three: false,
            winning: false,
            overline: false,
        };
    }
    MoveAssessment {
        inside: true,
        occupied: !board.is_empty(pos),
        double_three: creates_double_three(board, pos, color),
        winning: is_winning_move(board, pos, color),
        overline: creates_overline(board, pos, color),
    }
}
