use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::{io, time::Duration};
use bookgame::simulation::{self, SimStats};
use bookgame::{BookGame, BookId, BookView, GameConfig, Standing};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const PLAYERS: usize = 8;
const BOOKS_PER_ROUND: usize = 4;
const MAX_BOOKS: usize = 40;

fn render_books(books: &[BookView]) -> String {
    let mut out = String::new();
    // Newest first
    for book in books.iter().rev().take(12) {
        let marker = if book.complete { "✔" } else { "✎" };
        out.push_str(&format!("{} #{:<3} {}\n", marker, book.id, book.name));
        if let Some(last) = book.lines.last() {
            out.push_str(&format!("      {}\n", last));
        }
    }
    out
}

fn render_leaderboard(standings: &[Standing]) -> String {
    let mut out = String::new();
    let max_score = standings.iter().map(|s| s.score).max().unwrap_or(1) as f32;

    for (position, standing) in standings.iter().enumerate() {
        let bar_len = ((standing.score as f32 / max_score) * 20.0) as usize;
        let bar = "█".repeat(bar_len);
        out.push_str(&format!(
            "{:>2}. {:<10} {} {}\n",
            position + 1,
            standing.player,
            bar,
            standing.score
        ));
    }
    out
}

/// Ids of books still accepting lines
fn open_books(game: &BookGame) -> Vec<BookId> {
    game.list_books()
        .iter()
        .filter(|b| !b.is_complete())
        .map(|b| b.id())
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Shared state
    let game = Arc::new(BookGame::new(GameConfig::default()));
    let stats = Arc::new(SimStats::new());
    let running = Arc::new(AtomicBool::new(true));

    for i in 0..BOOKS_PER_ROUND {
        game.create_book(&format!("Book {}", i + 1));
    }

    // Spawn player threads
    for index in 0..PLAYERS {
        let game = Arc::clone(&game);
        let stats = Arc::clone(&stats);
        let running = Arc::clone(&running);
        let player = simulation::player_name(index);
        let mut rng = ChaCha8Rng::seed_from_u64(index as u64);

        thread::spawn(move || {
            let mut turn = 0u64;
            while running.load(Ordering::Relaxed) {
                // New rounds are started by the render loop
                let ids = open_books(&game);
                if ids.is_empty() {
                    thread::sleep(Duration::from_millis(40));
                    continue;
                }

                simulation::play_turn(&game, &ids, &player, turn, &mut rng, &stats);
                turn += 1;
                thread::sleep(Duration::from_millis(40));
            }
        });
    }

    // Run TUI Loop
    loop {
        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    break;
                }
            }
        }

        let mut books = BookView::collect(&game.list_books());

        // Start a new round once everything is written
        if books.iter().all(|b| b.complete) && books.len() < MAX_BOOKS {
            let start = books.len();
            let end = (start + BOOKS_PER_ROUND).min(MAX_BOOKS);
            for number in start + 1..=end {
                let book = game.create_book(&format!("Book {}", number));
                books.push(BookView::from(&book));
            }
        }

        let leaderboard = game.leaderboard();
        let snap = stats.snapshot();

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints(
                    [
                        Constraint::Length(3),  // Header
                        Constraint::Min(10),    // Books + leaderboard
                        Constraint::Length(6),  // Stats
                    ]
                    .as_ref(),
                )
                .split(f.size());

            // 1. Header
            let header = Block::default().borders(Borders::ALL).title("BOOKGAME Live");
            let title = Paragraph::new(format!("{} players | Press 'q' to quit", PLAYERS))
                .block(header)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(title, chunks[0]);

            // 2. Books and leaderboard
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(chunks[1]);

            let books_widget = Paragraph::new(render_books(&books)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("BOOKS")
                    .style(Style::default().fg(Color::Green)),
            );
            let board_widget = Paragraph::new(render_leaderboard(&leaderboard)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("LEADERBOARD")
                    .style(Style::default().fg(Color::Magenta)),
            );
            f.render_widget(books_widget, body[0]);
            f.render_widget(board_widget, body[1]);

            // 3. Stats
            let complete = books.iter().filter(|b| b.complete).count();
            let stats_text = format!(
                "Books: {} ({} complete)\nLines written: {}\nLock conflicts: {}\nRejected (complete): {}",
                books.len(),
                complete,
                snap.lines_written,
                snap.conflicts,
                snap.rejected_complete
            );
            let stats_block = Paragraph::new(stats_text)
                .block(Block::default().borders(Borders::ALL).title("Telemetry"))
                .style(Style::default().fg(Color::Yellow));
            f.render_widget(stats_block, chunks[2]);
        })?;
    }

    running.store(false, Ordering::Relaxed);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}
