//! Fuzz Test - Compares the leaderboard against a reference implementation.
//!
//! Uses a naive but obviously correct ranking to verify the real one
//! produces identical results on random libraries.

use bookgame::{rank_with, Book, RankingRules, Standing};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};

/// Simple reference ranking
fn reference_rank(books: &[Book], size: usize, points: u32) -> Vec<(String, u32)> {
    let mut scores: BTreeMap<String, u32> = BTreeMap::new();

    for book in books {
        if !book.is_complete() {
            continue;
        }
        let contributors: BTreeSet<String> =
            book.lines().values().map(|l| l.player.clone()).collect();
        for player in contributors {
            *scores.entry(player).or_default() += points;
        }
    }

    let mut ordered: Vec<(String, u32)> = scores.into_iter().collect();
    // Stable sort on score keeps the BTreeMap's alphabetical order for ties
    ordered.sort_by(|a, b| b.1.cmp(&a.1));

    let mut kept = Vec::new();
    for (position, entry) in ordered.into_iter().enumerate() {
        if position < size {
            kept.push(entry);
        } else if kept.last().map(|last: &(String, u32)| last.1) == Some(entry.1) {
            kept.push(entry);
        } else {
            break;
        }
    }
    kept
}

fn random_library(rng: &mut ChaCha8Rng) -> Vec<Book> {
    let players: Vec<String> = (0..rng.gen_range(1..15)).map(|i| format!("p{:02}", i)).collect();
    let capacity = rng.gen_range(1..7);

    (0..rng.gen_range(0..40))
        .map(|i| {
            let mut book = Book::with_capacity(format!("b{}", i), capacity);
            for _ in 0..rng.gen_range(0..=capacity) {
                let player = &players[rng.gen_range(0..players.len())];
                book.add_line("x", player.as_str());
            }
            book
        })
        .collect()
}

#[test]
fn test_fuzz_against_reference() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);

    for iteration in 0..2_000 {
        let books = random_library(&mut rng);
        let rules = RankingRules {
            size: rng.gen_range(1..8),
            points_per_book: rng.gen_range(1..20),
        };

        let actual: Vec<(String, u32)> = rank_with(&books, rules)
            .into_iter()
            .map(|Standing { player, score }| (player, score))
            .collect();
        let expected = reference_rank(&books, rules.size, rules.points_per_book);

        assert_eq!(actual, expected, "Mismatch at iteration {} with {:?}", iteration, rules);
    }
}

#[test]
fn test_scores_are_multiples_of_points() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..200 {
        let books = random_library(&mut rng);
        let complete = books.iter().filter(|b| b.is_complete()).count() as u32;
        let rules = RankingRules::default();

        for standing in rank_with(&books, rules) {
            assert_eq!(standing.score % rules.points_per_book, 0);
            assert!(standing.score <= complete * rules.points_per_book);
        }
    }
}
