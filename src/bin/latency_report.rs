use bookgame::{BookGame, GameConfig};
use hdrhistogram::Histogram;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Preparing Latency Benchmark...");

    // Large books so the run never hits the completion rejection path
    let config = GameConfig {
        book_capacity: usize::MAX,
        ..GameConfig::default()
    };
    let game = BookGame::new(config);
    let ids: Vec<_> = (0..1024).map(|i| game.create_book(&format!("Book {}", i)).id()).collect();

    let mut acquire_hist = Histogram::<u64>::new_with_bounds(1, 1_000_000, 3)?;
    let mut cycle_hist = Histogram::<u64>::new_with_bounds(1, 1_000_000, 3)?;

    const ITERATIONS: u64 = 100_000;

    println!("Running {} acquire/append/commit cycles...", ITERATIONS);

    let mut total_duration = std::time::Duration::new(0, 0);

    for i in 0..ITERATIONS {
        let id = ids[(i % ids.len() as u64) as usize];

        // Critical measurement section
        let start = Instant::now();
        let mut book = std::hint::black_box(game.acquire(id, "bench")?);
        let acquired = start.elapsed();

        book.add_line("x", "bench");
        game.commit(id, Some(book), "bench", true)?;
        let elapsed = start.elapsed();

        // Outliers beyond the histogram bounds are dropped
        acquire_hist.record(acquired.as_nanos() as u64).unwrap_or(());
        cycle_hist.record(elapsed.as_nanos() as u64).unwrap_or(());
        total_duration += elapsed;
    }

    println!("\n=== Latency Report (ns) ===");
    println!("Total Cycles: {}", ITERATIONS);
    println!("Throughput:   {:.2} cycles/sec", ITERATIONS as f64 / total_duration.as_secs_f64());
    for (label, histogram) in [("acquire", &acquire_hist), ("full cycle", &cycle_hist)] {
        println!("--- {} ---", label);
        println!("Min:    {:8} ns", histogram.min());
        println!("P50:    {:8} ns", histogram.value_at_quantile(0.50));
        println!("P90:    {:8} ns", histogram.value_at_quantile(0.90));
        println!("P99:    {:8} ns", histogram.value_at_quantile(0.99));
        println!("P99.9:  {:8} ns", histogram.value_at_quantile(0.999));
        println!("Max:    {:8} ns", histogram.max());
    }

    Ok(())
}
