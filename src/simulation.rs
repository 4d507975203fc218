//! Synthetic players for the binaries and stress tests.
//!
//! Each player repeatedly picks a random book and tries to write a line in
//! it. Conflicts are counted, not retried.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::game::{BookGame, GameError};
use crate::id::BookId;

const NAMES: [&str; 8] = [
    "Nigel", "Marie", "Jeremy", "Chloe", "Steph", "Nick", "Amaury", "Aubry",
];

/// Name of the `index`-th simulated player.
pub fn player_name(index: usize) -> String {
    match NAMES.get(index) {
        Some(name) => (*name).to_owned(),
        None => format!("Player{}", index + 1),
    }
}

/// Counters shared by all simulated players.
#[derive(Debug, Default)]
pub struct SimStats {
    pub lines_written: AtomicU64,
    pub conflicts: AtomicU64,
    pub rejected_complete: AtomicU64,
    pub other_errors: AtomicU64,
}

impl SimStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, result: &Result<(), GameError>) {
        let counter = match result {
            Ok(()) => &self.lines_written,
            Err(GameError::LockedByAnotherPlayer(_)) => &self.conflicts,
            Err(GameError::BookComplete(_)) => &self.rejected_complete,
            Err(_) => &self.other_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines_written: self.lines_written.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            rejected_complete: self.rejected_complete.load(Ordering::Relaxed),
            other_errors: self.other_errors.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub lines_written: u64,
    pub conflicts: u64,
    pub rejected_complete: u64,
    pub other_errors: u64,
}

/// One attempt by `player` to write a line into a random book from `ids`.
///
/// Returns `None` if `ids` is empty.
pub fn play_turn(
    game: &BookGame,
    ids: &[BookId],
    player: &str,
    turn: u64,
    rng: &mut ChaCha8Rng,
    stats: &SimStats,
) -> Option<Result<(), GameError>> {
    if ids.is_empty() {
        return None;
    }

    let id = ids[rng.gen_range(0..ids.len())];
    let text = format!("{} writes line {}.", player, turn);
    let result = game.add_line(id, player, &text).map(|_| ());
    stats.record(&result);
    Some(result)
}

/// True once every book in the game is complete
pub fn all_complete(game: &BookGame) -> bool {
    game.list_books().iter().all(|b| b.is_complete())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_player_names() {
        assert_eq!(player_name(0), "Nigel");
        assert_eq!(player_name(7), "Aubry");
        assert_eq!(player_name(8), "Player9");
    }

    #[test]
    fn test_play_turn_records() {
        let game = BookGame::default();
        let book = game.create_book("Sim");
        let stats = SimStats::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for turn in 0..7 {
            play_turn(&game, &[book.id()], "Nigel", turn, &mut rng, &stats);
        }

        let snap = stats.snapshot();
        assert_eq!(snap.lines_written, 5);
        assert_eq!(snap.rejected_complete, 2);
        assert!(all_complete(&game));
    }

    #[test]
    fn test_play_turn_without_books() {
        let game = BookGame::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(play_turn(&game, &[], "Nigel", 0, &mut rng, &SimStats::new()).is_none());
    }
}
