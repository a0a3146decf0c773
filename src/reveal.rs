//! Spoiler gate for freshly played moves
//!
//! A just-played opponent move stays hidden from a viewer until they choose
//! to reveal it. Visibility is recomputed from [`RevealSignals`] on every
//! render; nothing here is stored by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{MatchState, Move, PlayerId, RevealSink};

/// Inputs to the reveal decision, supplied by the application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealSignals {
    /// A turn countdown is running for this move
    pub countdown_active: bool,
    pub move_owner_is_viewer: bool,
    /// The viewer is the last player recorded as having viewed the match
    pub viewer_is_last_viewer: bool,
    /// The move already carries a "viewed" timestamp
    pub already_viewed: bool,
    /// Sequence number of the move in the message being rendered
    pub message_sequence: u32,
    /// Latest committed sequence number known for the match
    pub latest_sequence: u32,
}

impl RevealSignals {
    /// Whether the board may be shown without a spoiler placeholder
    pub fn is_revealed(&self) -> bool {
        self.countdown_active
            || self.move_owner_is_viewer
            || self.viewer_is_last_viewer
            || self.already_viewed
            || self.message_sequence < self.latest_sequence
    }

    /// Signals for `viewer` looking at a message carrying `message_move`
    pub fn for_viewer(
        viewer: &PlayerId,
        message_move: &Move,
        latest_sequence: u32,
        record: &ViewRecord,
        countdown_active: bool,
    ) -> Self {
        Self {
            countdown_active,
            move_owner_is_viewer: &message_move.placed_by == viewer,
            viewer_is_last_viewer: record.last_viewer.as_ref() == Some(viewer),
            already_viewed: record.viewed_at.is_some(),
            message_sequence: message_move.sequence_number,
            latest_sequence,
        }
    }

    /// Signals for `viewer` looking at the match's own committed move.
    /// Before any move there is nothing to hide.
    pub fn for_match(
        viewer: &PlayerId,
        state: &MatchState,
        record: &ViewRecord,
        countdown_active: bool,
    ) -> Option<Self> {
        let mv = state.committed_move()?;
        Some(Self::for_viewer(
            viewer,
            mv,
            state.last_sequence(),
            record,
            countdown_active,
        ))
    }
}

/// Free-function form of [`RevealSignals::is_revealed`]
pub fn is_revealed(signals: &RevealSignals) -> bool {
    signals.is_revealed()
}

/// Who last looked at a match move, and when it was first marked viewed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub last_viewer: Option<PlayerId>,
    pub viewed_at: Option<DateTime<Utc>>,
}

/// Sent to the reveal sink when a viewer opens a hidden move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealAck {
    pub viewer: PlayerId,
    pub sequence_number: u32,
    pub viewed_at: DateTime<Utc>,
}

/// Record that `viewer` revealed `message_move`.
///
/// `record` is only updated once the sink accepts the acknowledgment.
pub fn acknowledge_reveal<S: RevealSink>(
    viewer: &PlayerId,
    message_move: &Move,
    record: &mut ViewRecord,
    sink: &mut S,
) -> Result<RevealAck, S::Error> {
    let ack = RevealAck {
        viewer: viewer.clone(),
        sequence_number: message_move.sequence_number,
        viewed_at: Utc::now(),
    };
    if let Err(err) = sink.acknowledge(&ack) {
        tracing::warn!(%viewer, seq = ack.sequence_number, %err, "reveal acknowledgment failed");
        return Err(err);
    }
    record.last_viewer = Some(viewer.clone());
    record.viewed_at.get_or_insert(ack.viewed_at);
    tracing::debug!(%viewer, seq = ack.sequence_number, "move revealed");
    Ok(ack)
}
