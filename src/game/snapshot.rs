//! Committed-state wire shape and loading of untrusted initial state.

use serde::Serialize;
use serde_json::Value;

use crate::board::Board;
use crate::config::{ConfigError, MatchConfig};

use super::colors::ColorAssignment;
use super::state::MatchState;
use super::types::Move;

/// `{ board, move?, playerColors }` as exchanged with the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub board: Board,
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub last_move: Option<Move>,
    pub player_colors: ColorAssignment,
}

impl MatchState {
    /// Build a match from an untrusted `{ board?, move?, playerColors? }`
    /// value.
    ///
    /// Missing or malformed fields fall back to "no moves played": the board
    /// goes through [`Board::normalize`], a move that does not parse, has a
    /// zero sequence number, or points off the board is dropped, and bad
    /// color entries are skipped. Only an invalid `config` is an error.
    pub fn from_initial(raw: &Value, config: &MatchConfig) -> Result<MatchState, ConfigError> {
        config.validate()?;
        let size = config.board_size;

        let board = Board::normalize(raw.get("board").unwrap_or(&Value::Null), size);
        let last_move = raw.get("move").and_then(|value| parse_move(value, &board));
        let colors = ColorAssignment::from_json(raw.get("playerColors").unwrap_or(&Value::Null));

        Ok(MatchState::restore(board, last_move, colors))
    }
}

fn parse_move(value: &Value, board: &Board) -> Option<Move> {
    if value.is_null() {
        return None;
    }
    let mv: Move = match serde_json::from_value(value.clone()) {
        Ok(mv) => mv,
        Err(err) => {
            tracing::warn!(%err, "initial move does not parse, ignoring");
            return None;
        }
    };
    if mv.sequence_number == 0 {
        tracing::warn!("initial move has sequence number 0, ignoring");
        return None;
    }
    if !board.contains(mv.position) {
        tracing::warn!(position = %mv.position, "initial move is off the board, ignoring");
        return None;
    }
    Some(mv)
}
