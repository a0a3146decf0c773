//! Outbound collaborators the application plugs into the engine.
//!
//! Both traits are implemented for plain closures, so callers can pass
//! `|record| relay.send(record)` without a wrapper type.

use serde::Serialize;

use super::snapshot::MatchSnapshot;

/// What the application persists and relays once a move is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Committed state after the move
    pub state: MatchSnapshot,
    pub sequence_number: u32,
    pub is_winning_move: bool,
    /// Committed state before the move
    pub previous_state: MatchSnapshot,
}

/// Persists and broadcasts a confirmed move.
pub trait CommitSink {
    type Error: std::error::Error + 'static;

    fn commit(&mut self, record: &CommitRecord) -> Result<(), Self::Error>;
}

impl<F, E> CommitSink for F
where
    F: FnMut(&CommitRecord) -> Result<(), E>,
    E: std::error::Error + 'static,
{
    type Error = E;

    fn commit(&mut self, record: &CommitRecord) -> Result<(), E> {
        self(record)
    }
}

/// Records remotely that a viewer revealed a hidden move.
pub trait RevealSink {
    type Error: std::error::Error + 'static;

    fn acknowledge(&mut self, ack: &crate::reveal::RevealAck) -> Result<(), Self::Error>;
}

impl<F, E> RevealSink for F
where
    F: FnMut(&crate::reveal::RevealAck) -> Result<(), E>,
    E: std::error::Error + 'static,
{
    type Error = E;

    fn acknowledge(&mut self, ack: &crate::reveal::RevealAck) -> Result<(), E> {
        self(ack)
    }
}
