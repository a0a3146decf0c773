//! Core match types shared across the state machine and the wire.

use serde::{Deserialize, Serialize};

use crate::board::Pos;

/// Opaque player identifier, as issued by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A placed stone.
///
/// `sequence_number` starts at 1 and equals the number of stones on the
/// board before the move plus one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub sequence_number: u32,
    pub placed_by: PlayerId,
    pub position: Pos,
}

impl Move {
    pub fn new(sequence_number: u32, placed_by: PlayerId, position: Pos) -> Self {
        Self {
            sequence_number,
            placed_by,
            position,
        }
    }
}

/// Match result. `InProgress` is the only non-terminal value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "player", rename_all = "camelCase")]
pub enum Outcome {
    #[default]
    InProgress,
    WonBy(PlayerId),
    Draw,
    Aborted,
}

impl Outcome {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        match self {
            Outcome::WonBy(player) => Some(player),
            _ => None,
        }
    }
}

/// Terminal results decided outside the engine (timeout, resignation,
/// agreement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteOutcome {
    Draw,
    Aborted,
}

impl From<RemoteOutcome> for Outcome {
    fn from(remote: RemoteOutcome) -> Self {
        match remote {
            RemoteOutcome::Draw => Outcome::Draw,
            RemoteOutcome::Aborted => Outcome::Aborted,
        }
    }
}
