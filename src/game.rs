//! Game - The entry points a boundary layer (CLI, server, UI) drives.
//!
//! Wraps the [`BookStore`] with the configured book capacity and ranking
//! rules, and turns protocol outcomes into [`GameError`] values carrying the
//! caller-visible meaning of each failure.

use thiserror::Error;
use tracing::{debug, info};

use crate::book::Book;
use crate::config::GameConfig;
use crate::id::{BookId, IdSource};
use crate::leaderboard::{self, Standing};
use crate::outcome::{RetrievalOutcome, UpdateOutcome};
use crate::store::BookStore;

/// Caller-visible failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("book {0} does not exist")]
    NotFound(BookId),

    #[error("book {0} is locked by another player")]
    LockedByAnotherPlayer(BookId),

    #[error("player {player} does not hold the lock on book {id}")]
    NotLockHolder { id: BookId, player: String },

    #[error("no book supplied for update of book {0}")]
    NullBookSupplied(BookId),

    #[error("book {0} is already complete")]
    BookComplete(BookId),
}

impl GameError {
    /// HTTP status a web boundary would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            GameError::NotFound(_) => 404,
            GameError::LockedByAnotherPlayer(_) | GameError::NotLockHolder { .. } => 423,
            GameError::NullBookSupplied(_) => 500,
            GameError::BookComplete(_) => 409,
        }
    }

    /// True for conflicts a caller may retry later
    #[inline]
    pub fn is_conflict(&self) -> bool {
        matches!(self, GameError::LockedByAnotherPlayer(_))
    }

    fn from_update(outcome: UpdateOutcome, id: BookId, player: &str) -> Option<Self> {
        match outcome {
            UpdateOutcome::Success => None,
            UpdateOutcome::NotFound => Some(GameError::NotFound(id)),
            UpdateOutcome::NullBookSupplied => Some(GameError::NullBookSupplied(id)),
            UpdateOutcome::RequestingPlayerDoesNotHaveLock => Some(GameError::NotLockHolder {
                id,
                player: player.to_owned(),
            }),
        }
    }
}

/// The book game: a store plus the rules it is played by.
#[derive(Debug)]
pub struct BookGame {
    store: BookStore,
    config: GameConfig,
}

impl BookGame {
    /// Create a game with the given configuration.
    pub fn new(config: GameConfig) -> Self {
        Self {
            store: BookStore::new(),
            config,
        }
    }

    /// Create a game taking book identities from `ids`.
    pub fn with_id_source(config: GameConfig, ids: impl IdSource + 'static) -> Self {
        Self {
            store: BookStore::with_id_source(ids),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Create an empty book with the configured capacity.
    pub fn create_book(&self, name: &str) -> Book {
        self.store
            .create(Book::with_capacity(name, self.config.book_capacity))
    }

    /// Take the lock on a book for `player` and return the locked copy.
    pub fn acquire(&self, id: BookId, player: &str) -> Result<Book, GameError> {
        let retrieval = self.store.find_by_id_and_lock(id, player);
        match (retrieval.outcome, retrieval.book) {
            (RetrievalOutcome::Success, Some(book)) => Ok(book),
            (RetrievalOutcome::LockedByAnotherPlayer, _) => Err(GameError::LockedByAnotherPlayer(id)),
            _ => Err(GameError::NotFound(id)),
        }
    }

    /// Submit a modified copy back to the store.
    pub fn commit(
        &self,
        id: BookId,
        book: Option<Book>,
        player: &str,
        release: bool,
    ) -> Result<(), GameError> {
        let outcome = self.store.update(id, book, player, release);
        match GameError::from_update(outcome, id, player) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Acquire, append one line, commit and release.
    ///
    /// The lock is released even when the book turns out to be complete
    /// already; the append is then rejected with [`GameError::BookComplete`].
    pub fn add_line(&self, id: BookId, player: &str, text: &str) -> Result<Book, GameError> {
        let mut book = self.acquire(id, player)?;
        let appended = book.add_line(text, player);

        self.commit(id, Some(book.clone()), player, true)?;
        book.unlock();

        if !appended {
            debug!(book_id = id, player, "line rejected, book complete");
            return Err(GameError::BookComplete(id));
        }

        if book.is_complete() {
            info!(book_id = id, lines = book.line_count(), "final line written");
        }
        Ok(book)
    }

    /// Snapshot of every book in creation order.
    #[inline]
    pub fn list_books(&self) -> Vec<Book> {
        self.store.find_all()
    }

    /// Leaderboard over the current books.
    pub fn leaderboard(&self) -> Vec<Standing> {
        leaderboard::rank_with(&self.store.find_all(), self.config.ranking_rules())
    }

    /// Hash of every book's visible state, see [`BookStore::state_hash`].
    #[inline]
    pub fn state_hash(&self) -> u64 {
        self.store.state_hash()
    }
}

impl Default for BookGame {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
