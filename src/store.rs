//! Book Store - The in-memory, thread-safe collection of all books.
//!
//! Two levels of synchronization:
//!
//! - The collection (insertion order plus an identity index) sits behind a
//!   `RwLock`. Only `create` and `clear` take it for writing.
//! - Each book lives in its own slot behind a `Mutex`. The advisory lock
//!   transition and in-place replacement happen under that mutex only, so
//!   players working on different books never contend.
//!
//! Callers only ever see copies of books. A copy is mutated outside the store
//! and submitted back with [`BookStore::update`], which re-checks that the
//! submitting player holds the lock before replacing the stored book.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::book::Book;
use crate::id::{BookId, IdGenerator, IdSource};
use crate::outcome::{Retrieval, UpdateOutcome};

/// One stored book. The identity is duplicated outside the mutex so lookups
/// never need to lock the book itself.
#[derive(Debug)]
struct Slot {
    id: BookId,
    book: Mutex<Book>,
}

impl Slot {
    #[inline]
    fn snapshot(&self) -> Book {
        self.book.lock().clone()
    }

    #[inline]
    fn holder(&self) -> Option<String> {
        self.book.lock().locked_by().map(str::to_owned)
    }
}

#[derive(Debug, Default)]
struct Shelf {
    /// Slots in insertion order
    order: Vec<Arc<Slot>>,
    /// BookId -> position in `order`
    index: FxHashMap<BookId, usize>,
}

/// Thread-safe holder of every book in the process.
pub struct BookStore {
    ids: Box<dyn IdSource>,
    shelf: RwLock<Shelf>,
}

impl BookStore {
    /// Create an empty store issuing identities from 1.
    pub fn new() -> Self {
        Self::with_id_source(IdGenerator::new())
    }

    /// Create an empty store that takes identities from `ids`.
    pub fn with_id_source(ids: impl IdSource + 'static) -> Self {
        Self {
            ids: Box::new(ids),
            shelf: RwLock::new(Shelf::default()),
        }
    }

    // ========================================================================
    // Collection Operations
    // ========================================================================

    /// Store a new book under a fresh identity and return the stored copy.
    ///
    /// The identity is issued while the collection is write-locked, so
    /// insertion order and identity order agree.
    pub fn create(&self, mut book: Book) -> Book {
        let mut shelf = self.shelf.write();

        let id = self.ids.next_id();
        book.set_id(id);

        let position = shelf.order.len();
        shelf.order.push(Arc::new(Slot {
            id,
            book: Mutex::new(book.clone()),
        }));
        shelf.index.insert(id, position);

        info!(book_id = id, name = book.name(), "book created");
        book
    }

    /// Snapshot of every book in insertion order.
    ///
    /// Each book is copied under its own mutex; a book updated while the scan
    /// is running may appear in either its old or new state.
    pub fn find_all(&self) -> Vec<Book> {
        let slots: Vec<Arc<Slot>> = self.shelf.read().order.clone();
        slots.iter().map(|slot| slot.snapshot()).collect()
    }

    /// Number of stored books.
    #[inline]
    pub fn count(&self) -> usize {
        self.shelf.read().order.len()
    }

    /// Remove every book. Identities already issued are not reused.
    pub fn clear(&self) {
        let mut shelf = self.shelf.write();
        shelf.order.clear();
        shelf.index.clear();
        debug!("store cleared");
    }

    #[inline]
    fn slot(&self, id: BookId) -> Option<Arc<Slot>> {
        let shelf = self.shelf.read();
        shelf.index.get(&id).map(|&pos| Arc::clone(&shelf.order[pos]))
    }

    // ========================================================================
    // Lock-and-Update Protocol
    // ========================================================================

    /// Look up a book and try to take its lock for `player`.
    ///
    /// # Algorithm
    /// 1. Unknown identity: `NotFound`.
    /// 2. Unlocked: compare-and-set the holder. The winner persists the locked
    ///    book and gets it back. A player who loses the race between the check
    ///    and the set gets `LockedByAnotherPlayer`.
    /// 3. Already locked by `player`: `Success`, nothing changes.
    /// 4. Locked by someone else: `LockedByAnotherPlayer`.
    pub fn find_by_id_and_lock(&self, id: BookId, player: &str) -> Retrieval {
        let Some(slot) = self.slot(id) else {
            debug!(book_id = id, player, "lookup missed");
            return Retrieval::not_found();
        };

        match slot.holder() {
            None => self.lock_unlocked(&slot, player),
            Some(holder) if holder == player => {
                debug!(book_id = id, player, "lock re-entered by holder");
                Retrieval::success(slot.snapshot())
            }
            Some(holder) => {
                debug!(book_id = id, player, holder = %holder, "lock held by another player");
                Retrieval::locked()
            }
        }
    }

    /// The compare-and-set writes the stored book itself, so the copy handed
    /// back is taken under the same guard. Nothing is written after the guard
    /// drops: a later write could clobber a commit made in between.
    fn lock_unlocked(&self, slot: &Arc<Slot>, player: &str) -> Retrieval {
        let mut book = slot.book.lock();

        if !book.lock(player) {
            warn!(book_id = slot.id, player, "lost race for lock");
            return Retrieval::locked();
        }

        // A concurrent `clear` may have dropped the slot from the shelf.
        if !self.is_shelved(slot) {
            book.unlock();
            debug!(book_id = slot.id, player, "book removed while locking");
            return Retrieval::not_found();
        }

        debug!(book_id = slot.id, player, "lock acquired");
        Retrieval::success(book.clone())
    }

    /// Lock order is slot mutex, then shelf read lock. Nothing takes them the
    /// other way round.
    #[inline]
    fn is_shelved(&self, slot: &Arc<Slot>) -> bool {
        let shelf = self.shelf.read();
        shelf
            .index
            .get(&slot.id)
            .is_some_and(|&pos| Arc::ptr_eq(&shelf.order[pos], slot))
    }

    /// Validate and replace a stored book.
    ///
    /// # Algorithm
    /// 1. No book: `NullBookSupplied`.
    /// 2. Submitted book not locked by `player`: `RequestingPlayerDoesNotHaveLock`.
    ///    This is the only check that keeps non-holders from committing.
    /// 3. No stored book at `id`, or the submitted book has a different
    ///    identity: `NotFound`.
    /// 4. If `release_lock`, clear the holder on the submitted book.
    /// 5. Replace the stored book in place: `Success`.
    pub fn update(
        &self,
        id: BookId,
        book: Option<Book>,
        player: &str,
        release_lock: bool,
    ) -> UpdateOutcome {
        let Some(mut book) = book else {
            warn!(book_id = id, player, "update without a book");
            return UpdateOutcome::NullBookSupplied;
        };

        if !book.is_locked_by(player) {
            warn!(
                book_id = id,
                player,
                holder = book.locked_by().unwrap_or("<none>"),
                "update rejected: player does not hold the lock"
            );
            return UpdateOutcome::RequestingPlayerDoesNotHaveLock;
        }

        let slot = match self.slot(id) {
            Some(slot) if slot.id == book.id() => slot,
            _ => {
                debug!(book_id = id, submitted_id = book.id(), player, "update target missing");
                return UpdateOutcome::NotFound;
            }
        };

        if release_lock {
            book.unlock();
        }

        let completed = book.is_complete();
        {
            let mut stored = slot.book.lock();
            if completed && !stored.is_complete() {
                info!(book_id = id, name = book.name(), "book completed");
            }
            *stored = book;
        }

        debug!(book_id = id, player, release_lock, "book updated");
        UpdateOutcome::Success
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Hash of the visible state of every book, in insertion order.
    ///
    /// Two stores that went through the same sequence of operations produce
    /// the same hash. Line timestamps are excluded.
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        for book in self.find_all() {
            book.id().hash(&mut hasher);
            book.name().hash(&mut hasher);
            book.is_complete().hash(&mut hasher);
            book.locked_by().hash(&mut hasher);
            for (number, line) in book.lines() {
                number.hash(&mut hasher);
                line.text.hash(&mut hasher);
                line.player.hash(&mut hasher);
            }
        }

        hasher.finish()
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BookStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookStore")
            .field("count", &self.count())
            .finish()
    }
}
