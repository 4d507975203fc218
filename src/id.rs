//! Identity issuance for books.
//!
//! The store never invents identities itself. It asks an [`IdSource`] for the
//! next one, so tests can substitute a source and the default generator stays
//! a single atomic counter shared by every caller.

use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque book identity. Unique for the process lifetime, never reused.
pub type BookId = u64;

/// Issues strictly increasing, unique identities.
pub trait IdSource: Send + Sync {
    /// Returns the next identity. Every call yields a value greater than
    /// all values previously returned by this source.
    fn next_id(&self) -> BookId;
}

/// Monotonic counter starting at 1.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a generator whose first identity is 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator whose first identity is `first`
    pub fn starting_at(first: BookId) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for IdGenerator {
    #[inline]
    fn next_id(&self) -> BookId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
