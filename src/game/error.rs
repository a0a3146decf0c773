//! Error types for the match state machine.

use thiserror::Error;

use crate::board::{Pos, Stone};

use super::types::PlayerId;

/// A rejected transition. The state is never modified when one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The proposer's color is not the color to move
    #[error("not your turn: {to_move:?} to move")]
    NotYourTurn { to_move: Stone },

    #[error("cell {0} is already occupied")]
    CellOccupied(Pos),

    /// The placement would create two or more open threes
    #[error("placing at {0} would make a forbidden double-three")]
    DoubleThreeForbidden(Pos),

    #[error("match already concluded")]
    MatchAlreadyConcluded,

    /// A proposal is staged and must be confirmed or cancelled first
    #[error("a pending move already exists")]
    PendingMoveAlreadyExists,

    #[error("position {0} is off the board")]
    OutOfBounds(Pos),

    #[error("no pending move to confirm or cancel")]
    NoPendingMove,

    /// The viewer is not one of the named participants, or both colors
    /// belong to other players
    #[error("{0} is not playing in this match")]
    NotAParticipant(PlayerId),
}

/// Color assignment conflicts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("{0:?} is not a player color")]
    NotAColor(Stone),

    #[error("{color:?} is already held by {holder}")]
    SlotTaken { color: Stone, holder: PlayerId },

    #[error("{player} already plays {color:?}")]
    AlreadyAssigned { player: PlayerId, color: Stone },
}

/// Failure while handing a confirmed move to a commit sink
#[derive(Debug, Error)]
pub enum CommitError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Move(#[from] MoveError),

    /// The sink refused the record; the pending move is still staged
    #[error("commit sink failed: {0}")]
    Sink(#[source] E),
}
