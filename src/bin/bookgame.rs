//! Multi-threaded book game simulation.
//!
//! Spawns one thread per player, lets them race for the books, then prints
//! the books and the leaderboard.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use bookgame::simulation::{self, SimStats, StatsSnapshot};
use bookgame::{BookGame, BookView, GameConfig, Standing};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bookgame", about = "Simulate players writing books concurrently")]
struct Args {
    /// Number of concurrent players
    #[arg(short, long, default_value_t = 8)]
    players: usize,

    /// Number of books to create
    #[arg(short, long, default_value_t = 6)]
    books: usize,

    /// Attempts per player
    #[arg(short, long, default_value_t = 200)]
    turns: u64,

    /// Seed for the per-player random generators
    #[arg(long, default_value_t = 0xB00C)]
    seed: u64,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured book capacity
    #[arg(long)]
    book_capacity: Option<usize>,

    /// Override the configured leaderboard size
    #[arg(long)]
    leaderboard_size: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report {
    stats: StatsSnapshot,
    books: Vec<BookView>,
    leaderboard: Vec<Standing>,
}

fn load_config(args: &Args) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(capacity) = args.book_capacity {
        config.book_capacity = capacity;
    }
    if let Some(size) = args.leaderboard_size {
        config.leaderboard_size = size;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    bookgame::telemetry::init(args.verbose).map_err(|e| e.to_string())?;

    let config = load_config(&args)?;
    info!(?config, players = args.players, books = args.books, "starting simulation");

    let game = Arc::new(BookGame::new(config));
    let ids: Arc<Vec<_>> = Arc::new(
        (0..args.books)
            .map(|i| game.create_book(&format!("Book {}", i + 1)).id())
            .collect(),
    );
    let stats = Arc::new(SimStats::new());

    let handles: Vec<_> = (0..args.players)
        .map(|index| {
            let game = Arc::clone(&game);
            let ids = Arc::clone(&ids);
            let stats = Arc::clone(&stats);
            let player = simulation::player_name(index);
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed.wrapping_add(index as u64));
            let turns = args.turns;

            thread::Builder::new()
                .name(player.clone())
                .spawn(move || {
                    for turn in 0..turns {
                        if simulation::all_complete(&game) {
                            break;
                        }
                        simulation::play_turn(&game, &ids, &player, turn, &mut rng, &stats);
                        thread::yield_now();
                    }
                })
        })
        .collect::<std::io::Result<Vec<_>>>()?;

    for handle in handles {
        handle.join().map_err(|_| "player thread panicked")?;
    }

    let books = game.list_books();
    let report = Report {
        stats: stats.snapshot(),
        books: BookView::collect(&books),
        leaderboard: game.leaderboard(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!("=== Simulation ===");
    println!("Lines written:     {}", report.stats.lines_written);
    println!("Lock conflicts:    {}", report.stats.conflicts);
    println!("Rejected (full):   {}", report.stats.rejected_complete);
    println!("Other errors:      {}", report.stats.other_errors);

    println!("\n=== Books ===");
    for book in &report.books {
        let state = if book.complete { "complete" } else { "in progress" };
        println!("#{} {} ({})", book.id, book.name, state);
        for line in &book.lines {
            println!("    {}", line);
        }
    }

    println!("\n=== Leaderboard ===");
    for (position, standing) in report.leaderboard.iter().enumerate() {
        println!("{:>2}. {:<12} {:>4}", position + 1, standing.player, standing.score);
    }
}
