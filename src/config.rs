//! Game configuration.
//!
//! All fields have defaults, so an empty file is a valid configuration:
//!
//! ```toml
//! book_capacity = 5
//! leaderboard_size = 5
//! points_per_book = 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::book::DEFAULT_BOOK_CAPACITY;
use crate::leaderboard::{RankingRules, DEFAULT_LEADERBOARD_SIZE, DEFAULT_POINTS_PER_BOOK};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("I/O error reading {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`GameConfig`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A field holds a value the game cannot run with.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Lines after which a book is complete
    pub book_capacity: usize,
    /// Leaderboard positions before tie extension
    pub leaderboard_size: usize,
    /// Points per complete book contributed to
    pub points_per_book: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            book_capacity: DEFAULT_BOOK_CAPACITY,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            points_per_book: DEFAULT_POINTS_PER_BOOK,
        }
    }
}

impl GameConfig {
    /// Read and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.book_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "book_capacity",
                reason: "a book must accept at least one line",
            });
        }
        if self.leaderboard_size == 0 {
            return Err(ConfigError::Invalid {
                field: "leaderboard_size",
                reason: "the leaderboard must show at least one player",
            });
        }
        if self.points_per_book == 0 {
            return Err(ConfigError::Invalid {
                field: "points_per_book",
                reason: "a complete book must be worth at least one point",
            });
        }
        Ok(())
    }

    #[inline]
    pub fn ranking_rules(&self) -> RankingRules {
        RankingRules {
            size: self.leaderboard_size,
            points_per_book: self.points_per_book,
        }
    }
}
