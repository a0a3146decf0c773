//! Board structure

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

use super::bitboard::Bitboard;
use super::{Pos, Stone, BOARD_SIZE, MAX_BOARD_SIZE};

/// Square game board of fixed side length.
///
/// The side length is chosen at construction and never changes. Cloning
/// is a deep copy: the clone shares no storage with the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Black stones bitboard
    black: Bitboard,
    /// White stones bitboard
    white: Bitboard,
}

impl Board {
    /// Empty board of the default size
    pub fn new() -> Self {
        Self::with_size(BOARD_SIZE)
    }

    /// Empty board of side `size`.
    ///
    /// Sizes above [`MAX_BOARD_SIZE`] are clamped to it, since positions
    /// are `u8`. Use [`MatchConfig::validate`](crate::config::MatchConfig::validate)
    /// to reject them instead.
    pub fn with_size(size: usize) -> Self {
        let size = if size > MAX_BOARD_SIZE {
            tracing::warn!(size, max = MAX_BOARD_SIZE, "board size too large, clamping");
            MAX_BOARD_SIZE
        } else {
            size
        };
        let cells = size * size;
        Self {
            size,
            black: Bitboard::new(cells),
            white: Bitboard::new(cells),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bounds check on signed coordinates
    #[inline]
    pub fn is_inside(&self, row: i32, col: i32) -> bool {
        let n = self.size as i32;
        row >= 0 && row < n && col >= 0 && col < n
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        (pos.row as usize) < self.size && (pos.col as usize) < self.size
    }

    /// Get stone at position. Positions off the board read as `Empty`.
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if !self.contains(pos) {
            return Stone::Empty;
        }
        let idx = pos.to_index(self.size);
        if self.black.get(idx) {
            Stone::Black
        } else if self.white.get(idx) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Get stone at signed coordinates, `None` when off the board
    #[inline]
    pub fn cell(&self, row: i32, col: i32) -> Option<Stone> {
        if self.is_inside(row, col) {
            Some(self.get(Pos::new(row as u8, col as u8)))
        } else {
            None
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == Stone::Empty
    }

    /// Place a stone in place, overwriting whatever was there.
    ///
    /// Placing `Empty` clears the cell. Off-board positions are ignored.
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        if !self.contains(pos) {
            return;
        }
        let idx = pos.to_index(self.size);
        self.black.clear(idx);
        self.white.clear(idx);
        match stone {
            Stone::Black => self.black.set(idx),
            Stone::White => self.white.set(idx),
            Stone::Empty => {}
        }
    }

    /// Copy of this board with `stone` at `pos`.
    ///
    /// The caller checks that the cell was empty.
    pub fn with_stone(&self, pos: Pos, stone: Stone) -> Board {
        let mut next = self.clone();
        next.place_stone(pos, stone);
        next
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    /// Color whose turn it is. Black always moves first.
    #[inline]
    pub fn side_to_move(&self) -> Stone {
        if self.stone_count() % 2 == 0 {
            Stone::Black
        } else {
            Stone::White
        }
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == self.size * self.size
    }

    /// Occupied positions in row-major order
    pub fn occupied(&self) -> Vec<Pos> {
        self.black
            .union(&self.white)
            .iter_ones()
            .map(|idx| Pos::from_index(idx, self.size))
            .collect()
    }

    /// Board contents as rows of cells
    pub fn rows(&self) -> Vec<Vec<Stone>> {
        (0..self.size)
            .map(|r| {
                (0..self.size)
                    .map(|c| self.get(Pos::new(r as u8, c as u8)))
                    .collect()
            })
            .collect()
    }

    /// Rebuild a board from an untrusted JSON value.
    ///
    /// Expects an array of rows of cells. Anything that is not an array is
    /// treated as an empty board; missing rows and cells are padded with
    /// `Empty`, extra ones are dropped, and any cell other than exactly
    /// `"black"` or `"white"` becomes `Empty`.
    pub fn normalize(raw: &Value, size: usize) -> Board {
        let mut board = Board::with_size(size);
        let Some(rows) = raw.as_array() else {
            if !raw.is_null() {
                tracing::warn!(kind = json_kind(raw), "board is not an array, using empty board");
            }
            return board;
        };

        if rows.len() != size {
            tracing::warn!(rows = rows.len(), size, "board row count mismatch, resizing");
        }

        for (r, row) in rows.iter().take(size).enumerate() {
            let Some(cells) = row.as_array() else {
                tracing::warn!(row = r, "board row is not an array, treating as empty");
                continue;
            };
            for (c, cell) in cells.iter().take(size).enumerate() {
                let stone = Stone::from_json(cell);
                if stone.is_stone() {
                    board.place_stone(Pos::new(r as u8, c as u8), stone);
                }
            }
        }
        board
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.size))?;
        for row in self.rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}
