//! Match state machine
//!
//! Each client owns one [`MatchState`] per match. Clients stay in sync by
//! relaying committed moves; [`MatchState::receive_committed_move`] keeps
//! the newest sequence number and ignores everything older.

mod colors;
mod error;
mod sink;
mod snapshot;
mod state;
mod types;

pub use colors::ColorAssignment;
pub use error::{ColorError, CommitError, MoveError};
pub use sink::{CommitRecord, CommitSink, RevealSink};
pub use snapshot::MatchSnapshot;
pub use state::{MatchState, PendingSlot, StagedMove};
pub use types::{Move, Outcome, PlayerId, RemoteOutcome};
