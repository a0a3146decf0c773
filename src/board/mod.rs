//! Board representation for Omok

pub mod bitboard;
pub mod board;


use serde::{Deserialize, Serialize};

// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;

/// Default board size (19x19)
pub const BOARD_SIZE: usize = 19;
/// Largest side length; positions are stored as `u8`
pub const MAX_BOARD_SIZE: usize = u8::MAX as usize;

/// Cell contents. Also used as the player color (`Black` or `White`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    #[default]
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Read a cell from an untrusted JSON value.
    ///
    /// Only the exact strings `"black"` and `"white"` are stones;
    /// everything else is `Empty`.
    pub fn from_json(value: &serde_json::Value) -> Stone {
        match value.as_str() {
            Some("black") => Stone::Black,
            Some("white") => Stone::White,
            _ => Stone::Empty,
        }
    }

    #[inline]
    pub fn is_stone(self) -> bool {
        self != Stone::Empty
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major index on a board of side `size`
    #[inline]
    pub fn to_index(self, size: usize) -> usize {
        self.row as usize * size + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize, size: usize) -> Self {
        Self {
            row: (idx / size) as u8,
            col: (idx % size) as u8,
        }
    }

    /// Step `dist` cells along `(dr, dc)`, as signed coordinates
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, dist: i32) -> (i32, i32) {
        (self.row as i32 + dr * dist, self.col as i32 + dc * dist)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}
