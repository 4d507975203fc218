//! Leaderboard - Ranking derived from the completed books.
//!
//! Nothing is stored between queries: every call scores the books it is
//! given from scratch.
//!
//! # Scoring
//!
//! 1. Only complete books count.
//! 2. Each distinct contributor to a complete book earns `points_per_book`
//!    once for that book, however many lines they wrote in it.
//! 3. Players are ordered by score descending, then by name ascending.
//! 4. The first `size` positions are kept, plus anyone tied with the score
//!    at the last kept position.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::book::Book;

/// Default number of leaderboard positions before tie extension.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

/// Default points awarded per complete book contributed to.
pub const DEFAULT_POINTS_PER_BOOK: u32 = 10;

/// One player's position on the leaderboard.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Standing {
    pub player: String,
    pub score: u32,
}

/// Parameters of the ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankingRules {
    /// Positions kept before extending for a tie at the boundary
    pub size: usize,
    /// Points per complete book a player contributed to
    pub points_per_book: u32,
}

impl Default for RankingRules {
    fn default() -> Self {
        Self {
            size: DEFAULT_LEADERBOARD_SIZE,
            points_per_book: DEFAULT_POINTS_PER_BOOK,
        }
    }
}

/// Rank `books` with the default rules.
pub fn rank(books: &[Book]) -> Vec<Standing> {
    rank_with(books, RankingRules::default())
}

/// Rank `books` with explicit rules.
pub fn rank_with(books: &[Book], rules: RankingRules) -> Vec<Standing> {
    let mut scores: FxHashMap<&str, u32> = FxHashMap::default();

    for book in books.iter().filter(|b| b.is_complete()) {
        for player in book.contributors() {
            *scores.entry(player).or_insert(0) += rules.points_per_book;
        }
    }

    let mut standings: Vec<Standing> = scores
        .into_iter()
        .filter(|&(_, score)| score > 0)
        .map(|(player, score)| Standing {
            player: player.to_owned(),
            score,
        })
        .collect();

    standings.sort_unstable_by(|a, b| b.score.cmp(&a.score).then_with(|| a.player.cmp(&b.player)));

    let keep = cutoff(&standings, rules.size);
    standings.truncate(keep);
    standings
}

/// Number of sorted standings to keep: `size`, extended over any entries
/// sharing the score at position `size`.
fn cutoff(sorted: &[Standing], size: usize) -> usize {
    if size == 0 || sorted.len() <= size {
        return sorted.len().min(size);
    }

    let boundary = sorted[size - 1].score;
    let ties = sorted[size..]
        .iter()
        .take_while(|s| s.score == boundary)
        .count();

    size + ties
}
