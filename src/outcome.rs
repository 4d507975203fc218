//! Outcome types for the lock-and-update protocol.
//!
//! Every condition the protocol can detect is a named value here. Nothing in
//! the store panics or returns an error for a lock conflict; callers match on
//! these and decide what to show.

use std::fmt;

use crate::book::Book;

// ============================================================================
// Retrieval
// ============================================================================

/// Outcome of a combined lookup-and-lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RetrievalOutcome {
    /// The caller holds the lock and received the book
    Success = 0,
    /// No book with the requested identity
    NotFound = 1,
    /// Another player holds the lock
    LockedByAnotherPlayer = 2,
}

impl fmt::Display for RetrievalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RetrievalOutcome::Success => "success",
            RetrievalOutcome::NotFound => "not found",
            RetrievalOutcome::LockedByAnotherPlayer => "locked by another player",
        })
    }
}

/// A retrieval outcome together with the book, present only on success.
#[derive(Clone, Debug)]
pub struct Retrieval {
    pub outcome: RetrievalOutcome,
    pub book: Option<Book>,
}

impl Retrieval {
    #[inline]
    pub fn success(book: Book) -> Self {
        Self {
            outcome: RetrievalOutcome::Success,
            book: Some(book),
        }
    }

    #[inline]
    pub fn not_found() -> Self {
        Self {
            outcome: RetrievalOutcome::NotFound,
            book: None,
        }
    }

    #[inline]
    pub fn locked() -> Self {
        Self {
            outcome: RetrievalOutcome::LockedByAnotherPlayer,
            book: None,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.outcome == RetrievalOutcome::Success
    }

    /// Consume the retrieval, yielding the book only on success
    #[inline]
    pub fn into_book(self) -> Option<Book> {
        self.book
    }
}

// ============================================================================
// Update
// ============================================================================

/// Outcome of submitting a book back to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UpdateOutcome {
    /// The stored book was replaced
    Success = 0,
    /// The submitted book is not locked by the submitting player
    RequestingPlayerDoesNotHaveLock = 1,
    /// No book was submitted
    NullBookSupplied = 2,
    /// No stored book has the submitted identity
    NotFound = 3,
}

impl UpdateOutcome {
    #[inline]
    pub fn is_success(self) -> bool {
        self == UpdateOutcome::Success
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpdateOutcome::Success => "success",
            UpdateOutcome::RequestingPlayerDoesNotHaveLock => "requesting player does not have lock",
            UpdateOutcome::NullBookSupplied => "no book supplied",
            UpdateOutcome::NotFound => "not found",
        })
    }
}
