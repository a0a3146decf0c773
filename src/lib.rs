//! Omok (five-in-a-row) rules engine
//!
//! Rules and move lifecycle for a two-player Omok match played between
//! independent clients:
//! - 19x19 board by default, any size from 5 up
//! - 5-in-a-row to win (overlines reported, not forbidden)
//! - Double-three forbidden for both colors
//! - Optimistic move staging with confirm/cancel, and last-write-wins
//!   replay of moves committed elsewhere
//! - Spoiler gating of fresh opponent moves
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Pure rule predicates (win, overline, double-three)
//! - [`game`]: Per-match state machine and its wire shapes
//! - [`reveal`]: Spoiler gate
//! - [`config`]: Match configuration
//!
//! # Quick Start
//!
//! ```
//! use omok::{MatchState, Outcome, PlayerId, Pos};
//!
//! let alice = PlayerId::new("alice");
//! let bob = PlayerId::new("bob");
//! let mut game = MatchState::default().with_participants(alice.clone(), bob.clone());
//!
//! // Alice moves first and becomes Black
//! game.propose_placement(&alice, Pos::new(9, 9)).unwrap();
//! let committed = game.confirm_pending_move().unwrap();
//! assert_eq!(committed.sequence_number, 1);
//!
//! // Bob stages a move, then changes their mind
//! game.propose_placement(&bob, Pos::new(9, 10)).unwrap();
//! game.cancel_pending_move().unwrap();
//! assert_eq!(game.committed_board().stone_count(), 1);
//! assert_eq!(game.outcome(), &Outcome::InProgress);
//! ```

pub mod board;
pub mod cli;
pub mod config;
pub mod game;
pub mod logging;
pub mod reveal;
pub mod rules;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone, BOARD_SIZE};
pub use config::{ConfigError, MatchConfig};
pub use game::{
    ColorAssignment, CommitError, CommitRecord, CommitSink, MatchSnapshot, MatchState, Move,
    MoveError, Outcome, PlayerId, RemoteOutcome, RevealSink,
};
pub use reveal::{acknowledge_reveal, is_revealed, RevealAck, RevealSignals, ViewRecord};
