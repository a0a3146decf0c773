//! Command line front end
//!
//! `check` reports what the rules say about one placement on a stored
//! state; `replay` drives a list of placements through the match state
//! machine. Both print JSON on stdout and log to stderr.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::board::{Pos, BOARD_SIZE};
use crate::config::MatchConfig;
use crate::game::{CommitRecord, MatchState, PlayerId};
use crate::rules::assess_move;

#[derive(Debug, Parser)]
#[command(name = "omok", version, about = "Omok rules engine: legality checks and match replay")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Side length of the board
    #[arg(long, env = "OMOK_BOARD_SIZE", default_value_t = BOARD_SIZE, global = true)]
    pub board_size: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report what the rules say about one placement
    Check {
        /// Initial state JSON (`{ board?, move?, playerColors? }`); empty board if omitted
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(long)]
        row: u8,
        #[arg(long)]
        col: u8,
        /// Also try staging the placement for this player
        #[arg(long)]
        player: Option<String>,
    },
    /// Play a JSON list of `{ player, row, col }` placements
    Replay {
        file: PathBuf,
        /// Initial state to start from
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

/// One line of a replay file
#[derive(Debug, Clone, Deserialize)]
pub struct Placement {
    pub player: PlayerId,
    pub row: u8,
    pub col: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Rejection {
    index: usize,
    player: PlayerId,
    position: Pos,
    error: String,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = MatchConfig::with_board_size(cli.board_size);
    config.validate()?;

    let report = match cli.command {
        Command::Check {
            state,
            row,
            col,
            player,
        } => check(&load_state(state.as_deref(), &config)?, Pos::new(row, col), player)?,
        Command::Replay { file, state } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let placements: Vec<Placement> = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", file.display()))?;
            replay(load_state(state.as_deref(), &config)?, &placements)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_state(path: Option<&Path>, config: &MatchConfig) -> anyhow::Result<MatchState> {
    let Some(path) = path else {
        return Ok(MatchState::new(config)?);
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let raw: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(MatchState::from_initial(&raw, config)?)
}

/// Assessment of `pos` for the color to move, plus the result of staging it
/// for `player` when one is given
pub fn check(state: &MatchState, pos: Pos, player: Option<String>) -> anyhow::Result<Value> {
    let player = player.map(PlayerId::from);
    let color = player
        .as_ref()
        .and_then(|p| state.colors().color_of(p))
        .unwrap_or_else(|| state.to_move());
    let assessment = assess_move(state.committed_board(), pos, color);

    let proposal = player.map(|player| {
        let mut trial = state.clone();
        match trial.propose_placement(&player, pos) {
            Ok(staged) => json!({ "accepted": true, "isWinningMove": staged.is_winning_move }),
            Err(err) => json!({ "accepted": false, "error": err.to_string() }),
        }
    });

    Ok(json!({
        "toMove": state.to_move(),
        "color": color,
        "position": pos,
        "assessment": assessment,
        "proposal": proposal,
        "outcome": state.outcome(),
    }))
}

/// Propose and commit each placement in order, stopping at the first
/// rejected one
pub fn replay(state: MatchState, placements: &[Placement]) -> anyhow::Result<Value> {
    let mut state = with_first_players(state, placements);
    let mut commits: Vec<u32> = Vec::new();
    let mut rejected = None;

    for (index, placement) in placements.iter().enumerate() {
        let position = Pos::new(placement.row, placement.col);
        if let Err(err) = state.propose_placement(&placement.player, position) {
            tracing::info!(index, %err, "placement rejected, stopping replay");
            rejected = Some(Rejection {
                index,
                player: placement.player.clone(),
                position,
                error: err.to_string(),
            });
            break;
        }

        let mut sink = |record: &CommitRecord| -> Result<(), Infallible> {
            tracing::info!(
                seq = record.sequence_number,
                winning = record.is_winning_move,
                "move committed"
            );
            commits.push(record.sequence_number);
            Ok(())
        };
        state.commit_with(&mut sink)?;
    }

    Ok(json!({
        "snapshot": state.snapshot(),
        "outcome": state.outcome(),
        "winningLine": state.winning_line(),
        "commits": commits,
        "rejected": rejected,
    }))
}

/// Name the first two distinct players as participants
fn with_first_players(state: MatchState, placements: &[Placement]) -> MatchState {
    let mut players: Vec<&PlayerId> = Vec::new();
    for placement in placements {
        if !players.contains(&&placement.player) {
            players.push(&placement.player);
        }
        if players.len() == 2 {
            return state.with_participants(players[0].clone(), players[1].clone());
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(player: &str, row: u8, col: u8) -> Placement {
        Placement {
            player: player.into(),
            row,
            col,
        }
    }

    #[test]
    fn test_parse_check_args() {
        let cli = Cli::try_parse_from(["omok", "check", "--row", "9", "--col", "9", "--player", "alice"]).unwrap();
        assert_eq!(cli.board_size, 19);
        match cli.command {
            Command::Check { row, col, player, state } => {
                assert_eq!((row, col), (9, 9));
                assert_eq!(player.as_deref(), Some("alice"));
                assert!(state.is_none());
            }
            Command::Replay { .. } => panic!("expected check"),
        }
    }

    #[test]
    fn test_parse_replay_args() {
        let cli = Cli::try_parse_from(["omok", "-vv", "replay", "game.json", "--board-size", "15"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.board_size, 15);
        assert!(matches!(cli.command, Command::Replay { .. }));
    }

    #[test]
    fn test_check_reports_assessment() {
        let state = MatchState::default();
        let report = check(&state, Pos::new(9, 9), Some("alice".into())).unwrap();
        assert_eq!(report["toMove"], json!("black"));
        assert_eq!(report["assessment"]["occupied"], json!(false));
        assert_eq!(report["proposal"]["accepted"], json!(true));
    }

    #[test]
    fn test_replay_to_win() {
        let mut moves = Vec::new();
        for c in 0..5 {
            moves.push(placement("alice", 9, c));
            if c < 4 {
                moves.push(placement("bob", 0, c * 2));
            }
        }
        let report = replay(MatchState::default(), &moves).unwrap();
        assert_eq!(report["outcome"], json!({ "status": "wonBy", "player": "alice" }));
        assert_eq!(report["commits"].as_array().map(Vec::len), Some(9));
        assert_eq!(report["winningLine"][0], json!({ "row": 9, "col": 0 }));
        assert!(report["rejected"].is_null());
    }

    #[test]
    fn test_replay_stops_at_rejection() {
        let moves = vec![
            placement("alice", 9, 9),
            placement("bob", 9, 9),
            placement("bob", 9, 10),
        ];
        let report = replay(MatchState::default(), &moves).unwrap();
        assert_eq!(report["rejected"]["index"], json!(1));
        assert_eq!(report["commits"], json!([1]));
    }
}
