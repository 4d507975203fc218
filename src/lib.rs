//! # Bookgame
//!
//! A shared, in-memory library of books that players extend one line at a
//! time, guarded by an advisory single-writer lock per book, plus a
//! leaderboard derived from the completed books.
//!
//! ## Design Principles
//!
//! - **Per-Book Locking**: Each book has its own holder; players working on
//!   different books never contend
//! - **Non-Blocking**: A player who cannot take a lock is told immediately,
//!   there is no queueing or waiting
//! - **Copies Out, Copies In**: Callers mutate copies and submit them back;
//!   the store re-checks ownership on every commit
//! - **Derived Ranking**: The leaderboard is recomputed from the books on
//!   every query
//!
//! ## Protocol
//!
//! ```text
//! find_by_id_and_lock(id, player) --Success--> [locked copy]
//!                                                   |
//!                                              add_line(..)
//!                                                   |
//! update(id, copy, player, release = true) <--------+
//! ```

pub mod id;
pub mod book;
pub mod outcome;
pub mod store;
pub mod leaderboard;
pub mod view;
pub mod config;
pub mod game;
pub mod simulation;
pub mod telemetry;

// Re-exports for convenience
pub use id::{BookId, IdGenerator, IdSource};
pub use book::{Book, Line, LineNumber, DEFAULT_BOOK_CAPACITY};
pub use outcome::{Retrieval, RetrievalOutcome, UpdateOutcome};
pub use store::BookStore;
pub use leaderboard::{rank, rank_with, RankingRules, Standing};
pub use view::BookView;
pub use config::{ConfigError, GameConfig};
pub use game::{BookGame, GameError};
