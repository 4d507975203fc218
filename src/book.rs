//! Book - The shared, append-only document that players extend line by line.
//!
//! A book carries its own advisory lock holder. The store hands out
//! independent copies of books; a player mutates the copy they were given and
//! submits it back through [`crate::store::BookStore::update`].

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use crate::id::BookId;

/// Default number of lines after which a book is complete.
pub const DEFAULT_BOOK_CAPACITY: usize = 5;

/// Line number within a book, starting at 1
pub type LineNumber = u32;

/// A single contributed line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// The contributed text
    pub text: String,
    /// Name of the contributing player
    pub player: String,
    /// When the line was appended
    pub written_at: DateTime<Utc>,
}

impl Line {
    pub fn new(text: impl Into<String>, player: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            player: player.into(),
            written_at: Utc::now(),
        }
    }
}

/// A collaboratively written book.
///
/// Equality and hashing consider only the identity, so two snapshots of the
/// same book taken at different moments compare equal.
#[derive(Clone, Debug)]
pub struct Book {
    id: BookId,
    name: String,
    lines: BTreeMap<LineNumber, Line>,
    complete: bool,
    locked_by: Option<String>,
    capacity: usize,
}

impl Book {
    /// Create an empty, unlocked book with the default capacity.
    ///
    /// The identity is 0 until the store assigns one.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_BOOK_CAPACITY)
    }

    /// Create an empty, unlocked book that completes after `capacity` lines.
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        debug_assert!(capacity > 0, "a book must accept at least one line");
        Self {
            id: 0,
            name: name.into(),
            lines: BTreeMap::new(),
            complete: false,
            locked_by: None,
            capacity,
        }
    }

    #[inline]
    pub fn id(&self) -> BookId {
        self.id
    }

    /// Assign the identity. Only the store calls this, once, at creation.
    pub(crate) fn set_id(&mut self, id: BookId) {
        self.id = id;
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Independent copy of the lines, keyed by line number.
    pub fn lines(&self) -> BTreeMap<LineNumber, Line> {
        self.lines.clone()
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The most recently appended line, if any
    pub fn last_line(&self) -> Option<&Line> {
        self.lines.values().next_back()
    }

    /// Distinct player names that contributed at least one line, sorted.
    pub fn contributors(&self) -> Vec<&str> {
        let mut players: Vec<&str> = self.lines.values().map(|l| l.player.as_str()).collect();
        players.sort_unstable();
        players.dedup();
        players
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Append a line written by `player`.
    ///
    /// Returns `false` and leaves the book untouched if it is already
    /// complete. Reaching capacity marks the book complete for good.
    pub fn add_line(&mut self, text: impl Into<String>, player: impl Into<String>) -> bool {
        if self.complete {
            return false;
        }

        let next = self.lines.keys().next_back().map_or(1, |n| n + 1);
        self.lines.insert(next, Line::new(text, player));

        if self.lines.len() >= self.capacity {
            self.complete = true;
        }

        true
    }

    // ========================================================================
    // Advisory Lock
    // ========================================================================

    /// The player currently holding the lock, if any
    #[inline]
    pub fn locked_by(&self) -> Option<&str> {
        self.locked_by.as_deref()
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked_by.is_some()
    }

    /// Returns true if `player` currently holds the lock
    #[inline]
    pub fn is_locked_by(&self, player: &str) -> bool {
        self.locked_by.as_deref() == Some(player)
    }

    /// Take the lock for `player` if nobody holds it.
    ///
    /// Returns `false` without changing anything if the book is already
    /// locked, even by `player` themselves.
    pub fn lock(&mut self, player: &str) -> bool {
        if self.locked_by.is_some() {
            return false;
        }
        self.locked_by = Some(player.to_owned());
        true
    }

    /// Clear the lock regardless of who holds it.
    pub fn unlock(&mut self) {
        self.locked_by = None;
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
