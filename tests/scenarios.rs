//! End-to-end scenarios through the public API.

use bookgame::{
    rank, Book, BookGame, BookStore, GameError, RetrievalOutcome, Standing, UpdateOutcome,
};

fn standing(player: &str, score: u32) -> Standing {
    Standing {
        player: player.to_string(),
        score,
    }
}

/// Build a book through the store's lock-and-update protocol.
fn written_book(store: &BookStore, name: &str, players: &[&str]) -> Book {
    let book = store.create(Book::new(name));
    for (i, player) in players.iter().enumerate() {
        let mut locked = store
            .find_by_id_and_lock(book.id(), player)
            .into_book()
            .expect("book is free between turns");
        assert!(locked.add_line(format!("Line {}.", i + 1), *player));
        assert_eq!(
            store.update(book.id(), Some(locked), player, true),
            UpdateOutcome::Success
        );
    }
    store.find_all().into_iter().find(|b| b.id() == book.id()).unwrap()
}

#[test]
fn test_capacity_reached_after_fifth_line() {
    let game = BookGame::default();
    let book = game.create_book("Five lines");

    let players = ["Nigel", "Marie", "Jeremy", "Chloe", "Steph"];
    for (i, player) in players.iter().enumerate() {
        let updated = game.add_line(book.id(), player, &format!("Line {}.", i + 1)).unwrap();
        assert_eq!(updated.is_complete(), i == players.len() - 1);
    }

    let err = game.add_line(book.id(), "Nick", "Line 6.").unwrap_err();
    assert_eq!(err, GameError::BookComplete(book.id()));

    let stored = &game.list_books()[0];
    assert_eq!(stored.line_count(), 5);
    assert!(stored.is_complete());
    assert!(!stored.is_locked());
}

#[test]
fn test_lock_handover() {
    let store = BookStore::new();
    let book = store.create(Book::new("Contested"));

    // A acquires
    let a = store.find_by_id_and_lock(book.id(), "A");
    assert_eq!(a.outcome, RetrievalOutcome::Success);
    let mut a_book = a.into_book().unwrap();

    // B is refused while A holds it
    let b = store.find_by_id_and_lock(book.id(), "B");
    assert_eq!(b.outcome, RetrievalOutcome::LockedByAnotherPlayer);
    assert!(b.book.is_none());

    // A commits and releases
    a_book.add_line("A was here.", "A");
    assert_eq!(
        store.update(book.id(), Some(a_book), "A", true),
        UpdateOutcome::Success
    );

    // B now gets it, with A's line
    let b = store.find_by_id_and_lock(book.id(), "B");
    assert_eq!(b.outcome, RetrievalOutcome::Success);
    let b_book = b.into_book().unwrap();
    assert_eq!(b_book.locked_by(), Some("B"));
    assert_eq!(b_book.line_count(), 1);
}

#[test]
fn test_leaderboard_with_boundary_tie() {
    let store = BookStore::new();
    written_book(&store, "Book 1", &["Nigel", "Marie", "Jeremy", "Chloe", "Steph"]);
    written_book(&store, "Book 2", &["Nick", "Nigel", "Jeremy", "Chloe", "Jeremy"]);
    written_book(&store, "Book 3", &["Marie", "Steph", "Chloe", "Nick", "Amaury"]);
    written_book(&store, "Book 4", &["Aubry", "Jeremy", "Marie", "Nick", "Amaury"]);
    let unfinished = written_book(&store, "Book 5", &["Chloe", "Amaury", "Aubry", "Nigel"]);
    assert!(!unfinished.is_complete());

    let board = rank(&store.find_all());

    assert_eq!(
        board,
        vec![
            standing("Chloe", 30),
            standing("Jeremy", 30),
            standing("Marie", 30),
            standing("Nick", 30),
            standing("Amaury", 20),
            standing("Nigel", 20),
            standing("Steph", 20),
        ]
    );
    assert!(board.iter().all(|s| s.player != "Aubry"));
}

#[test]
fn test_commit_contract_violations() {
    let store = BookStore::new();
    let book = store.create(Book::new("Target"));

    assert_eq!(
        store.update(book.id(), None, "Nigel", true),
        UpdateOutcome::NullBookSupplied
    );

    let mut stray = Book::new("Stray");
    stray.lock("Nigel");
    assert_eq!(
        store.update(12345, Some(stray), "Nigel", true),
        UpdateOutcome::NotFound
    );
}

#[test]
fn test_ownership_gate_regardless_of_content() {
    let game = BookGame::default();
    let book = game.create_book("Guarded");
    let mut locked = game.acquire(book.id(), "Nigel").unwrap();
    locked.add_line("Perfectly valid line.", "Marie");

    let err = game.commit(book.id(), Some(locked), "Marie", true).unwrap_err();
    assert_eq!(err.status_code(), 423);
    assert_eq!(game.list_books()[0].line_count(), 0);
}

#[test]
fn test_idempotent_reacquire_keeps_holder() {
    let store = BookStore::new();
    let book = store.create(Book::new("Mine"));

    store.find_by_id_and_lock(book.id(), "Nigel");
    let before = store.state_hash();

    let again = store.find_by_id_and_lock(book.id(), "Nigel");
    assert_eq!(again.outcome, RetrievalOutcome::Success);
    assert_eq!(store.state_hash(), before);
    assert_eq!(store.find_all()[0].locked_by(), Some("Nigel"));
}
