//! Match configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::BOARD_SIZE;
pub use crate::board::MAX_BOARD_SIZE;

/// Smallest board that can hold a five
pub const MIN_BOARD_SIZE: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board size {size} out of range (5..=255)")]
    BoardSize { size: usize },

    #[error("invalid match config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings fixed for the lifetime of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchConfig {
    /// Side length of the square board
    pub board_size: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
        }
    }
}

impl MatchConfig {
    pub fn with_board_size(board_size: usize) -> Self {
        Self { board_size }
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::BoardSize {
                size: self.board_size,
            });
        }
        Ok(())
    }
}
