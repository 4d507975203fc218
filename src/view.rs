//! What a book looks like to the outside world.
//!
//! While a book is being written only its last line is visible, so each
//! player continues from one line of context. Once complete, the whole text
//! is revealed.

use serde::Serialize;

use crate::book::Book;
use crate::id::BookId;

/// Serializable projection of a book.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookView {
    pub id: BookId,
    pub name: String,
    pub lines: Vec<String>,
    pub complete: bool,
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        let lines = if book.is_complete() {
            book.lines().into_values().map(|l| l.text).collect()
        } else {
            book.last_line().map(|l| l.text.clone()).into_iter().collect()
        };

        Self {
            id: book.id(),
            name: book.name().to_owned(),
            lines,
            complete: book.is_complete(),
        }
    }
}

impl BookView {
    /// Project a slice of books, preserving order
    pub fn collect(books: &[Book]) -> Vec<BookView> {
        books.iter().map(BookView::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_book_shows_nothing() {
        let view = BookView::from(&Book::new("Empty"));
        assert!(view.lines.is_empty());
        assert!(!view.complete);
    }

    #[test]
    fn test_incomplete_book_shows_last_line_only() {
        let mut book = Book::new("Draft");
        book.add_line("Line 1.", "Nigel");
        book.add_line("Line 2.", "Marie");

        let view = BookView::from(&book);
        assert_eq!(view.lines, vec!["Line 2.".to_string()]);
        assert_eq!(view.name, "Draft");
    }

    #[test]
    fn test_complete_book_shows_all_lines() {
        let mut book = Book::with_capacity("Done", 3);
        book.add_line("Line 1.", "Nigel");
        book.add_line("Line 2.", "Marie");
        book.add_line("Line 3.", "Jeremy");

        let view = BookView::from(&book);
        assert!(view.complete);
        assert_eq!(view.lines, vec!["Line 1.", "Line 2.", "Line 3."]);
    }

    #[test]
    fn test_serializes_to_json() {
        let mut book = Book::new("Draft");
        book.add_line("Hello.", "Nigel");

        let json = serde_json::to_value(BookView::from(&book)).unwrap();
        assert_eq!(json["name"], "Draft");
        assert_eq!(json["lines"][0], "Hello.");
        assert_eq!(json["complete"], false);
    }
}
