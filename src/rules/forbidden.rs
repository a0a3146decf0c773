//! Double-three forbidden move rule
//!
//! A double-three is a move that creates two or more open threes at once,
//! each in a different line direction through the new stone.
//!
//! Open three, as window patterns read along one direction:
//! - `_XXX_`: contiguous, window of 5
//! - `_XX_X_` or `_X_XX_`: one gap, window of 6, no opponent stone
//!
//! Every window must contain the new stone and lie entirely on the board;
//! the board edge never counts as an open end.

use crate::board::{Board, Pos, Stone};

use super::DIRECTIONS;

const CONTIGUOUS_WINDOW: usize = 5;
const BROKEN_WINDOW: usize = 6;

/// Read `len` cells along `(dr, dc)` starting `start` steps from `pos`.
/// `None` when any cell is off the board.
fn read_window(board: &Board, pos: Pos, dr: i32, dc: i32, start: i32, len: usize) -> Option<Vec<Stone>> {
    (0..len as i32)
        .map(|i| {
            let (r, c) = pos.offset(dr, dc, start + i);
            board.cell(r, c)
        })
        .collect()
}

/// `_XXX_`
fn is_contiguous_three(window: &[Stone], color: Stone) -> bool {
    window.len() == CONTIGUOUS_WINDOW
        && window[0] == Stone::Empty
        && window[4] == Stone::Empty
        && window[1..4].iter().all(|&s| s == color)
}

/// `_XX_X_` or `_X_XX_`
fn is_broken_three(window: &[Stone], color: Stone) -> bool {
    if window.len() != BROKEN_WINDOW
        || window[0] != Stone::Empty
        || window[5] != Stone::Empty
        || window.contains(&color.opponent())
    {
        return false;
    }
    let interior = &window[1..5];
    let stones = interior.iter().filter(|&&s| s == color).count();
    let gaps = interior.iter().filter(|&&s| s == Stone::Empty).count();
    // The gap must sit inside the three, not at its edge
    stones == 3 && gaps == 1 && (interior[1] == Stone::Empty || interior[2] == Stone::Empty)
}

/// Whether any window through `pos` along `(dr, dc)` is an open three.
/// `after` already holds the new stone.
fn open_three_in_direction(after: &Board, pos: Pos, color: Stone, dr: i32, dc: i32) -> bool {
    let contiguous = (-(CONTIGUOUS_WINDOW as i32 - 1)..=0).any(|start| {
        read_window(after, pos, dr, dc, start, CONTIGUOUS_WINDOW)
            .is_some_and(|w| is_contiguous_three(&w, color))
    });
    if contiguous {
        return true;
    }
    (-(BROKEN_WINDOW as i32 - 1)..=0).any(|start| {
        read_window(after, pos, dr, dc, start, BROKEN_WINDOW)
            .is_some_and(|w| is_broken_three(&w, color))
    })
}

/// Count the directions in which placing `color` at `pos` makes an open three.
///
/// Returns 0 for off-board or occupied positions and for `Stone::Empty`.
pub fn count_open_threes(board: &Board, pos: Pos, color: Stone) -> u8 {
    if !board.contains(pos) || !board.is_empty(pos) || !color.is_stone() {
        return 0;
    }
    let after = board.with_stone(pos, color);

    DIRECTIONS
        .iter()
        .filter(|&&(dr, dc)| open_three_in_direction(&after, pos, color, dr, dc))
        .count() as u8
}

/// Check if a move is a double-three (forbidden)
///
/// # Arguments
/// * `board` - Board before the move
/// * `pos` - Position being considered
/// * `color` - Color of the stone being placed
///
/// # Returns
/// `true` if the move creates open threes in two or more directions
pub fn creates_double_three(board: &Board, pos: Pos, color: Stone) -> bool {
    count_open_threes(board, pos, color) >= 2
}
