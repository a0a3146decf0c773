//! Per-match state machine
//!
//! A match is `InProgress` until it is won, drawn or aborted. While in
//! progress the local viewer may stage one optimistic placement at a time;
//! the staged move only reaches the committed board when it is confirmed.
//! Remote moves are applied last-write-wins on their sequence number.

use tracing::instrument;

use crate::board::{Board, Pos, Stone};
use crate::config::{ConfigError, MatchConfig};
use crate::rules::{creates_double_three, get_winning_line, is_winning_move, WinQuery};

use super::colors::ColorAssignment;
use super::error::{ColorError, CommitError, MoveError};
use super::sink::{CommitRecord, CommitSink};
use super::snapshot::MatchSnapshot;
use super::types::{Move, Outcome, PlayerId, RemoteOutcome};

/// A locally proposed placement waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedMove {
    /// Committed board with the new stone added
    pub board: Board,
    pub mv: Move,
    pub color: Stone,
    /// Color assignment including the mover (and opponent, when known)
    pub colors: ColorAssignment,
    pub is_winning_move: bool,
}

/// The pending-move slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PendingSlot {
    #[default]
    NoPendingMove,
    HasPendingMove(Box<StagedMove>),
}

/// Mutable state of one match, owned by one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    committed_board: Board,
    committed_move: Option<Move>,
    colors: ColorAssignment,
    pending: PendingSlot,
    outcome: Outcome,
    /// The two players of the channel, when the application knows them
    participants: Vec<PlayerId>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::with_board(Board::new())
    }
}

impl MatchState {
    /// Fresh match on an empty board
    pub fn new(config: &MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_board(Board::with_size(config.board_size)))
    }

    fn with_board(board: Board) -> Self {
        Self {
            committed_board: board,
            committed_move: None,
            colors: ColorAssignment::new(),
            pending: PendingSlot::NoPendingMove,
            outcome: Outcome::InProgress,
            participants: Vec::new(),
        }
    }

    /// Rebuild from already-committed data.
    ///
    /// The last mover gets the color of the stone at the move's position if
    /// they have none yet, and a board showing a five through that position
    /// restores as won.
    pub(crate) fn restore(board: Board, last_move: Option<Move>, colors: ColorAssignment) -> Self {
        let mut state = Self::with_board(board);
        state.colors = colors;
        if let Some(mv) = last_move {
            state.adopt_committed(mv);
        }
        state
    }

    /// Name both players, so the first mover's opponent is assigned the
    /// other color at the same time.
    pub fn with_participants(mut self, first: PlayerId, second: PlayerId) -> Self {
        self.participants = vec![first, second];
        self
    }

    pub fn committed_board(&self) -> &Board {
        &self.committed_board
    }

    pub fn committed_move(&self) -> Option<&Move> {
        self.committed_move.as_ref()
    }

    pub fn colors(&self) -> &ColorAssignment {
        &self.colors
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn pending_slot(&self) -> &PendingSlot {
        &self.pending
    }

    pub fn pending(&self) -> Option<&StagedMove> {
        match &self.pending {
            PendingSlot::HasPendingMove(staged) => Some(staged),
            PendingSlot::NoPendingMove => None,
        }
    }

    pub fn has_pending(&self) -> bool {
        matches!(self.pending, PendingSlot::HasPendingMove(_))
    }

    /// Color to move, from the committed stone count
    pub fn to_move(&self) -> Stone {
        self.committed_board.side_to_move()
    }

    /// Sequence number of the last committed move, 0 before the first
    pub fn last_sequence(&self) -> u32 {
        self.committed_move.as_ref().map_or(0, |mv| mv.sequence_number)
    }

    /// Sequence number the next placement will carry
    pub fn next_sequence(&self) -> u32 {
        self.committed_board.stone_count() + 1
    }

    /// Committed state in its wire shape
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            board: self.committed_board.clone(),
            last_move: self.committed_move.clone(),
            player_colors: self.colors.clone(),
        }
    }

    /// Five-in-a-row on the committed board, for highlighting
    pub fn winning_line(&self) -> Option<Vec<Pos>> {
        let last_move = self.committed_move.as_ref().map(|mv| mv.position);
        let color = last_move.map(|pos| self.committed_board.get(pos));
        get_winning_line(&self.committed_board, WinQuery { last_move, color })
    }

    fn opponent_of(&self, viewer: &PlayerId) -> Option<&PlayerId> {
        if !self.participants.contains(viewer) {
            return None;
        }
        self.participants.iter().find(|p| *p != viewer)
    }

    /// Color the viewer would place with, and the assignment that results.
    fn resolve_color(&self, viewer: &PlayerId) -> Result<(Stone, ColorAssignment), MoveError> {
        if !self.participants.is_empty() && !self.participants.contains(viewer) {
            return Err(MoveError::NotAParticipant(viewer.clone()));
        }
        let to_move = self.to_move();

        if let Some(color) = self.colors.color_of(viewer) {
            if color != to_move {
                return Err(MoveError::NotYourTurn { to_move });
            }
            return Ok((color, self.colors.clone()));
        }

        let mut colors = self.colors.clone();
        match colors.assign(viewer.clone(), to_move) {
            Ok(()) => {}
            Err(ColorError::SlotTaken { .. }) => {
                // The other color is free: the viewer just has to wait
                return Err(if colors.player_for(to_move.opponent()).is_none() {
                    MoveError::NotYourTurn { to_move }
                } else {
                    MoveError::NotAParticipant(viewer.clone())
                });
            }
            Err(ColorError::AlreadyAssigned { .. } | ColorError::NotAColor(_)) => {
                return Err(MoveError::NotYourTurn { to_move });
            }
        }

        if let Some(opponent) = self.opponent_of(viewer) {
            if colors.color_of(opponent).is_none() {
                if let Err(err) = colors.assign(opponent.clone(), to_move.opponent()) {
                    tracing::debug!(%opponent, %err, "opponent color left unassigned");
                }
            }
        }
        Ok((to_move, colors))
    }

    /// Stage a placement for `viewer` at `position`.
    ///
    /// Nothing is committed and no collaborator is called; the staged move
    /// can still be cancelled.
    #[instrument(skip(self), fields(seq = self.next_sequence()))]
    pub fn propose_placement(
        &mut self,
        viewer: &PlayerId,
        position: Pos,
    ) -> Result<&StagedMove, MoveError> {
        if self.outcome.is_terminal() {
            return Err(MoveError::MatchAlreadyConcluded);
        }
        if self.has_pending() {
            return Err(MoveError::PendingMoveAlreadyExists);
        }
        if !self.committed_board.contains(position) {
            return Err(MoveError::OutOfBounds(position));
        }
        if !self.committed_board.is_empty(position) {
            return Err(MoveError::CellOccupied(position));
        }

        let (color, colors) = self.resolve_color(viewer)?;

        if creates_double_three(&self.committed_board, position, color) {
            return Err(MoveError::DoubleThreeForbidden(position));
        }

        let mv = Move::new(self.next_sequence(), viewer.clone(), position);
        let board = self.committed_board.with_stone(position, color);
        let winning = is_winning_move(&board, position, color);

        tracing::debug!(?color, winning, "placement staged");
        self.pending = PendingSlot::HasPendingMove(Box::new(StagedMove {
            board,
            mv,
            color,
            colors,
            is_winning_move: winning,
        }));
        self.pending().ok_or(MoveError::NoPendingMove)
    }

    /// Record handed to a commit sink for the staged move
    pub fn commit_record(&self) -> Result<CommitRecord, MoveError> {
        let staged = self.pending().ok_or(MoveError::NoPendingMove)?;
        Ok(CommitRecord {
            state: MatchSnapshot {
                board: staged.board.clone(),
                last_move: Some(staged.mv.clone()),
                player_colors: staged.colors.clone(),
            },
            sequence_number: staged.mv.sequence_number,
            is_winning_move: staged.is_winning_move,
            previous_state: self.snapshot(),
        })
    }

    /// Promote the staged move to the committed state.
    ///
    /// A winning move concludes the match for its mover; a non-winning move
    /// that fills the board concludes it as a draw.
    #[instrument(skip(self))]
    pub fn confirm_pending_move(&mut self) -> Result<Move, MoveError> {
        let staged = match std::mem::take(&mut self.pending) {
            PendingSlot::HasPendingMove(staged) => staged,
            PendingSlot::NoPendingMove => return Err(MoveError::NoPendingMove),
        };
        let StagedMove {
            board,
            mv,
            colors,
            is_winning_move,
            ..
        } = *staged;

        self.committed_board = board;
        self.committed_move = Some(mv.clone());
        self.colors = colors;

        if is_winning_move {
            self.outcome = Outcome::WonBy(mv.placed_by.clone());
        } else if self.committed_board.is_full() {
            self.outcome = Outcome::Draw;
        }

        tracing::debug!(seq = mv.sequence_number, outcome = ?self.outcome, "move committed");
        Ok(mv)
    }

    /// Hand the staged move to `sink`, then confirm it.
    ///
    /// If the sink fails the staged move stays in place, so the caller can
    /// retry or cancel.
    pub fn commit_with<S: CommitSink>(&mut self, sink: &mut S) -> Result<Move, CommitError<S::Error>> {
        let record = self.commit_record()?;
        if let Err(err) = sink.commit(&record) {
            tracing::warn!(seq = record.sequence_number, %err, "commit sink failed, move still pending");
            return Err(CommitError::Sink(err));
        }
        Ok(self.confirm_pending_move()?)
    }

    /// Drop the staged move without touching the committed state
    #[instrument(skip(self))]
    pub fn cancel_pending_move(&mut self) -> Result<StagedMove, MoveError> {
        match std::mem::take(&mut self.pending) {
            PendingSlot::HasPendingMove(staged) => {
                tracing::debug!(seq = staged.mv.sequence_number, "pending move cancelled");
                Ok(*staged)
            }
            PendingSlot::NoPendingMove => Err(MoveError::NoPendingMove),
        }
    }

    /// End the match on an external decision.
    ///
    /// Any staged move is discarded. Returns `false` when the match had
    /// already concluded, in which case the outcome is left as it was.
    #[instrument(skip(self))]
    pub fn apply_remote_outcome(&mut self, outcome: RemoteOutcome) -> bool {
        self.pending = PendingSlot::NoPendingMove;
        if self.outcome.is_terminal() {
            tracing::debug!(current = ?self.outcome, "match already concluded, remote outcome ignored");
            return false;
        }
        self.outcome = outcome.into();
        tracing::debug!(outcome = ?self.outcome, "match concluded remotely");
        true
    }

    /// Apply a move committed by another client.
    ///
    /// Only a move newer than the last committed one is applied; duplicates
    /// and out-of-order stale moves are ignored and `false` is returned.
    /// A board of a different size is also ignored.
    #[instrument(skip(self, board), fields(seq = mv.sequence_number))]
    pub fn receive_committed_move(&mut self, mv: Move, board: Board) -> bool {
        if self.committed_move.is_some() && mv.sequence_number <= self.last_sequence() {
            tracing::debug!(last = self.last_sequence(), "stale committed move ignored");
            return false;
        }
        if board.size() != self.committed_board.size() {
            tracing::warn!(
                expected = self.committed_board.size(),
                got = board.size(),
                "committed move carries a board of the wrong size, ignoring"
            );
            return false;
        }

        let superseded = self
            .pending()
            .is_some_and(|staged| staged.mv.sequence_number <= mv.sequence_number);
        if superseded {
            tracing::debug!("pending move superseded by remote move");
            self.pending = PendingSlot::NoPendingMove;
        }

        self.committed_board = board;
        self.adopt_committed(mv);
        true
    }

    /// Make `mv` the committed move of the current board. A five through
    /// the move concludes the match for its mover, and a full board without
    /// one concludes it as a draw.
    fn adopt_committed(&mut self, mv: Move) {
        let color = self.committed_board.get(mv.position);
        if color.is_stone() && self.colors.color_of(&mv.placed_by).is_none() {
            if let Err(err) = self.colors.assign(mv.placed_by.clone(), color) {
                tracing::warn!(player = %mv.placed_by, %err, "cannot assign mover color");
            }
        }

        if !self.outcome.is_terminal() {
            if color.is_stone() && is_winning_move(&self.committed_board, mv.position, color) {
                self.outcome = Outcome::WonBy(mv.placed_by.clone());
            } else if self.committed_board.is_full() {
                self.outcome = Outcome::Draw;
            }
            if self.outcome.is_terminal() {
                self.pending = PendingSlot::NoPendingMove;
            }
        }
        self.committed_move = Some(mv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> PlayerId {
        PlayerId::new("alice")
    }

    fn bob() -> PlayerId {
        PlayerId::new("bob")
    }

    fn duel() -> MatchState {
        MatchState::default().with_participants(alice(), bob())
    }

    fn play(state: &mut MatchState, player: &PlayerId, row: u8, col: u8) -> Move {
        state.propose_placement(player, Pos::new(row, col)).unwrap();
        state.confirm_pending_move().unwrap()
    }

    #[test]
    fn test_first_move_assigns_both_colors() {
        let mut state = duel();
        let staged = state.propose_placement(&alice(), Pos::new(9, 9)).unwrap();
        assert_eq!(staged.color, Stone::Black);
        assert_eq!(staged.mv.sequence_number, 1);
        assert_eq!(staged.colors.color_of(&bob()), Some(Stone::White));
        // Not committed yet
        assert!(state.colors().is_empty());

        state.confirm_pending_move().unwrap();
        assert_eq!(state.colors().color_of(&alice()), Some(Stone::Black));
        assert_eq!(state.colors().color_of(&bob()), Some(Stone::White));
    }

    #[test]
    fn test_unknown_opponent_left_unassigned() {
        let mut state = MatchState::default();
        play(&mut state, &alice(), 9, 9);
        assert_eq!(state.colors().len(), 1);

        // Bob shows up and takes white lazily
        let staged = state.propose_placement(&bob(), Pos::new(9, 10)).unwrap();
        assert_eq!(staged.color, Stone::White);
        assert_eq!(staged.mv.sequence_number, 2);
    }

    #[test]
    fn test_not_your_turn() {
        let mut state = duel();
        play(&mut state, &alice(), 9, 9);
        let before = state.clone();

        assert_eq!(
            state.propose_placement(&alice(), Pos::new(0, 0)),
            Err(MoveError::NotYourTurn { to_move: Stone::White })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_unassigned_viewer_waits_for_own_color() {
        let mut state = MatchState::default();
        play(&mut state, &alice(), 9, 9);
        play(&mut state, &bob(), 9, 10);
        // Black's turn again, black is alice's
        assert_eq!(
            state.propose_placement(&"carol".into(), Pos::new(0, 0)),
            Err(MoveError::NotAParticipant("carol".into()))
        );
    }

    #[test]
    fn test_second_player_blocked_until_first_moves() {
        let mut state = MatchState::default();
        state.colors.assign(alice(), Stone::Black).unwrap();
        assert_eq!(
            state.propose_placement(&bob(), Pos::new(0, 0)),
            Err(MoveError::NotYourTurn { to_move: Stone::Black })
        );
    }

    #[test]
    fn test_own_stone_out_of_turn_is_occupied() {
        let mut state = duel();
        play(&mut state, &alice(), 9, 9);
        let before = state.clone();
        assert_eq!(
            state.propose_placement(&alice(), Pos::new(9, 9)),
            Err(MoveError::CellOccupied(Pos::new(9, 9)))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_outsider_rejected_when_participants_known() {
        let mut state = duel();
        let carol = PlayerId::new("carol");
        assert_eq!(
            state.propose_placement(&carol, Pos::new(9, 9)),
            Err(MoveError::NotAParticipant(carol.clone()))
        );
        assert_eq!(state, duel());

        // Alice still gets the first move
        let staged = state.propose_placement(&alice(), Pos::new(9, 9)).unwrap();
        assert_eq!(staged.color, Stone::Black);
    }

    #[test]
    fn test_receive_full_board_is_draw() {
        let mut state = MatchState::new(&MatchConfig::with_board_size(5))
            .unwrap()
            .with_participants(alice(), bob());
        let mut board = Board::with_size(5);
        for r in 0..5u8 {
            for c in 0..5u8 {
                let stone = if (r / 2 + c) % 2 == 0 { Stone::Black } else { Stone::White };
                board.place_stone(Pos::new(r, c), stone);
            }
        }
        assert!(state.receive_committed_move(Move::new(25, alice(), Pos::new(4, 4)), board));
        assert_eq!(state.outcome(), &Outcome::Draw);
    }

    #[test]
    fn test_cell_occupied() {
        let mut state = duel();
        play(&mut state, &alice(), 9, 9);
        let before = state.clone();
        assert_eq!(
            state.propose_placement(&bob(), Pos::new(9, 9)),
            Err(MoveError::CellOccupied(Pos::new(9, 9)))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut state = MatchState::new(&MatchConfig::with_board_size(9)).unwrap();
        assert_eq!(
            state.propose_placement(&alice(), Pos::new(9, 0)),
            Err(MoveError::OutOfBounds(Pos::new(9, 0)))
        );
    }

    #[test]
    fn test_pending_blocks_new_proposal() {
        let mut state = duel();
        state.propose_placement(&alice(), Pos::new(9, 9)).unwrap();
        assert_eq!(
            state.propose_placement(&alice(), Pos::new(9, 10)),
            Err(MoveError::PendingMoveAlreadyExists)
        );
    }

    #[test]
    fn test_confirm_and_cancel_need_pending() {
        let mut state = duel();
        assert_eq!(state.confirm_pending_move(), Err(MoveError::NoPendingMove));
        assert_eq!(state.cancel_pending_move(), Err(MoveError::NoPendingMove));
        assert!(matches!(state.commit_record(), Err(MoveError::NoPendingMove)));
    }

    #[test]
    fn test_cancel_restores_turn() {
        let mut state = duel();
        let before = state.clone();
        state.propose_placement(&alice(), Pos::new(9, 9)).unwrap();
        assert_eq!(state.committed_board(), before.committed_board());

        let cancelled = state.cancel_pending_move().unwrap();
        assert_eq!(cancelled.mv.position, Pos::new(9, 9));
        assert_eq!(state, before);

        // Same turn, different cell
        let staged = state.propose_placement(&alice(), Pos::new(3, 3)).unwrap();
        assert_eq!(staged.mv.sequence_number, 1);
    }

    #[test]
    fn test_double_three_rejected() {
        let mut state = duel();
        // Black: (9,8) (9,10) (8,9) (10,9); White far away
        let moves = [
            (alice(), 9, 8),
            (bob(), 0, 0),
            (alice(), 9, 10),
            (bob(), 0, 2),
            (alice(), 8, 9),
            (bob(), 0, 4),
            (alice(), 10, 9),
            (bob(), 0, 6),
        ];
        for (player, r, c) in &moves {
            play(&mut state, player, *r, *c);
        }
        let before = state.clone();
        assert_eq!(
            state.propose_placement(&alice(), Pos::new(9, 9)),
            Err(MoveError::DoubleThreeForbidden(Pos::new(9, 9)))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_winning_move_concludes() {
        let mut state = duel();
        for c in 0..4 {
            play(&mut state, &alice(), 9, c);
            play(&mut state, &bob(), 0, c * 2);
        }
        let staged = state.propose_placement(&alice(), Pos::new(9, 4)).unwrap();
        assert!(staged.is_winning_move);
        assert_eq!(state.outcome(), &Outcome::InProgress);

        state.confirm_pending_move().unwrap();
        assert_eq!(state.outcome(), &Outcome::WonBy(alice()));
        assert_eq!(
            state.winning_line(),
            Some((0..5).map(|c| Pos::new(9, c)).collect())
        );
        assert_eq!(
            state.propose_placement(&bob(), Pos::new(5, 5)),
            Err(MoveError::MatchAlreadyConcluded)
        );
    }

    #[test]
    fn test_full_board_is_draw() {
        let mut state = MatchState::new(&MatchConfig::with_board_size(5)).unwrap();
        // Fill all but (4,4) with a pattern that has no five
        for r in 0..5u8 {
            for c in 0..5u8 {
                if (r, c) == (4, 4) {
                    continue;
                }
                let stone = if (r / 2 + c) % 2 == 0 { Stone::Black } else { Stone::White };
                state.committed_board.place_stone(Pos::new(r, c), stone);
            }
        }
        let color = state.to_move();
        let player = alice();
        state.colors.assign(player.clone(), color).unwrap();

        state.propose_placement(&player, Pos::new(4, 4)).unwrap();
        state.confirm_pending_move().unwrap();
        assert!(state.committed_board().is_full());
        assert_eq!(state.outcome(), &Outcome::Draw);
    }

    #[test]
    fn test_remote_outcome_clears_pending() {
        let mut state = duel();
        state.propose_placement(&alice(), Pos::new(9, 9)).unwrap();
        assert!(state.apply_remote_outcome(RemoteOutcome::Aborted));
        assert!(!state.has_pending());
        assert_eq!(state.outcome(), &Outcome::Aborted);
        assert_eq!(state.committed_board().stone_count(), 0);
    }

    #[test]
    fn test_outcome_is_monotonic() {
        let mut state = duel();
        assert!(state.apply_remote_outcome(RemoteOutcome::Draw));
        assert!(!state.apply_remote_outcome(RemoteOutcome::Aborted));
        assert_eq!(state.outcome(), &Outcome::Draw);
    }

    #[test]
    fn test_receive_applies_newer_and_ignores_stale() {
        let mut state = duel();
        let board = Board::new().with_stone(Pos::new(9, 9), Stone::Black);
        let mv = Move::new(1, alice(), Pos::new(9, 9));

        assert!(state.receive_committed_move(mv.clone(), board.clone()));
        let after_first = state.clone();
        assert!(!state.receive_committed_move(mv, board));
        assert_eq!(state, after_first);
        assert_eq!(state.colors().color_of(&alice()), Some(Stone::Black));
    }

    #[test]
    fn test_receive_rejects_wrong_size_board() {
        let mut state = duel();
        let board = Board::with_size(9).with_stone(Pos::new(4, 4), Stone::Black);
        assert!(!state.receive_committed_move(Move::new(1, alice(), Pos::new(4, 4)), board));
        assert_eq!(state, duel());
    }

    #[test]
    fn test_receive_drops_superseded_pending() {
        let mut state = duel();
        play(&mut state, &alice(), 9, 9);
        state.propose_placement(&bob(), Pos::new(9, 10)).unwrap();

        // Bob's other client already committed move 2 elsewhere
        let board = state
            .committed_board()
            .with_stone(Pos::new(0, 0), Stone::White);
        assert!(state.receive_committed_move(Move::new(2, bob(), Pos::new(0, 0)), board));
        assert!(!state.has_pending());
        assert_eq!(state.to_move(), Stone::Black);
    }

    #[test]
    fn test_receive_winning_move_concludes() {
        let mut state = duel();
        let mut board = Board::new();
        for c in 0..5 {
            board.place_stone(Pos::new(4, c), Stone::White);
        }
        for c in 0..5 {
            board.place_stone(Pos::new(10, c * 2), Stone::Black);
        }
        assert!(state.receive_committed_move(Move::new(10, bob(), Pos::new(4, 2)), board));
        assert_eq!(state.outcome(), &Outcome::WonBy(bob()));
        assert_eq!(state.colors().color_of(&bob()), Some(Stone::White));
    }
}
