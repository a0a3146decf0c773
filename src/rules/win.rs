//! Win condition checking
//!
//! Five or more contiguous stones of one color in any of the four line
//! directions win. Overlines (six or more) are reported by a separate
//! predicate so callers can pick their own rule variant; nothing in the
//! commit path rejects them.

use crate::board::{Board, Pos, Stone};

use super::{ray_length, run_length, DIRECTIONS};

/// Stones needed in a row to win
pub const WIN_LENGTH: usize = 5;

/// Check whether `color` playing at `pos` makes five or more in a row.
///
/// The cell at `pos` counts as one stone whether or not the board already
/// holds it. Each direction is checked on its own.
pub fn is_winning_move(board: &Board, pos: Pos, color: Stone) -> bool {
    if !board.contains(pos) || !color.is_stone() {
        return false;
    }
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| run_length(board, pos, color, dr, dc) >= WIN_LENGTH)
}

/// Check whether `color` playing at `pos` makes six or more in a row
pub fn creates_overline(board: &Board, pos: Pos, color: Stone) -> bool {
    if !board.contains(pos) || !color.is_stone() {
        return false;
    }
    DIRECTIONS
        .iter()
        .any(|&(dr, dc)| run_length(board, pos, color, dr, dc) > WIN_LENGTH)
}

/// Hints for [`get_winning_line`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinQuery {
    /// Last move played; checked first when `color` is also known
    pub last_move: Option<Pos>,
    /// Restrict the search to one color
    pub color: Option<Stone>,
}

/// Locate a five-or-more line on the board.
///
/// With both `last_move` and `color`, only lines through that position are
/// checked first. If that finds nothing (or no hint was given) the whole
/// board is scanned in row-major order, Black before White on each cell,
/// directions in [`DIRECTIONS`] order. The returned line is the full run,
/// ordered from its first to its last cell along the direction.
pub fn get_winning_line(board: &Board, query: WinQuery) -> Option<Vec<Pos>> {
    if let (Some(pos), Some(color)) = (query.last_move, query.color) {
        if board.get(pos) == color {
            if let Some(line) = line_through(board, pos, color) {
                return Some(line);
            }
        }
    }

    let colors: &[Stone] = match query.color {
        Some(Stone::Black) => &[Stone::Black],
        Some(Stone::White) => &[Stone::White],
        Some(Stone::Empty) => &[],
        None => &[Stone::Black, Stone::White],
    };

    for pos in board.occupied() {
        for &color in colors {
            if board.get(pos) != color {
                continue;
            }
            if let Some(line) = line_through(board, pos, color) {
                return Some(line);
            }
        }
    }
    None
}

/// First qualifying run through `pos`, in direction order
fn line_through(board: &Board, pos: Pos, color: Stone) -> Option<Vec<Pos>> {
    for &(dr, dc) in &DIRECTIONS {
        let back = ray_length(board, pos, color, -dr, -dc) as i32;
        let fwd = ray_length(board, pos, color, dr, dc) as i32;
        if (back + fwd + 1) as usize >= WIN_LENGTH {
            let line = (-back..=fwd)
                .map(|dist| {
                    let (r, c) = pos.offset(dr, dc, dist);
                    Pos::new(r as u8, c as u8)
                })
                .collect();
            return Some(line);
        }
    }
    None
}
