//! grand-prix — three races through one uncontrolled intersection.
//!
//! 1. A single car, which can never crash.
//! 2. Twenty cars that ignore the stop sign: perpendicular traffic collides.
//! 3. Twenty cars that honor it: every car finishes.
//!
//! Set `RUST_LOG=race_track=debug` (or `trace`) to watch individual
//! crossings; the default filter only shows collisions.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use parking_lot::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use race_core::{CarId, RaceConfig};
use race_fleet::create_fleet;
use race_sim::{ExecutionModel, RaceBuilder, RaceObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:  u64   = 42;
const FIELD: usize = 20;

/// Per-mile delay in ms.  One tenth of the default so a full run takes
/// seconds rather than minutes.
const MILE_DELAY_MS: RangeInclusive<u64> = 5..=10;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Keeps the crash sets so the results table can name them.
#[derive(Default)]
struct CrashReport {
    sets: Mutex<Vec<Vec<CarId>>>,
}

impl RaceObserver for CrashReport {
    fn on_crash(&self, crash_set: &[CarId]) {
        self.sets.lock().push(crash_set.to_vec());
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

fn run_scenario(title: &str, cars: usize, honor_stop_sign: bool, model: ExecutionModel) -> Result<()> {
    let config = RaceConfig { seed: SEED, mile_delay_ms: MILE_DELAY_MS, ..RaceConfig::default() };
    let fleet = create_fleet(cars, honor_stop_sign, &config)?;
    let crashes = Arc::new(CrashReport::default());
    let mut race = RaceBuilder::new(fleet, config).observer(crashes.clone()).build()?;

    println!("=== {title} ===");
    println!("Cars: {cars}  |  Stop sign: {}  |  Model: {model}", if honor_stop_sign { "honored" } else { "ignored" });

    let t0 = Instant::now();
    let summary = race.run(model)?;
    let elapsed = t0.elapsed();
    info!(title, elapsed_ms = elapsed.as_millis() as u64, "scenario done");

    println!(
        "Finished in {:.2} s: {} completed, {} crashed, {} intersection crossings, pit peak {}/{}",
        elapsed.as_secs_f64(),
        summary.completed,
        summary.crashed,
        summary.crossings,
        race.circuit().pit.peak_in_use(),
        race.circuit().pit.capacity(),
    );
    println!();

    println!("{:<6} {:<8} {:<12} {:<7} {:<6}", "Pos", "Car", "Direction", "Miles", "Pits");
    println!("{}", "-".repeat(42));
    for standing in race.results() {
        let Some(car) = race.fleet().get(standing.car) else { continue };
        println!(
            "{:<6} {:<8} {:<12} {:<7} {:<6}",
            standing.position,
            standing.car.0,
            car.direction().as_str(),
            car.miles(),
            standing.pit_stops,
        );
    }

    let sets = crashes.sets.lock();
    if !sets.is_empty() {
        println!();
        println!("Collisions:");
        for set in sets.iter() {
            let ids: Vec<String> = set.iter().map(|c| c.0.to_string()).collect();
            println!("  cars {}", ids.join(", "));
        }
    }
    println!();
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_thread_names(true))
        .init();

    run_scenario("Time trial", 1, false, ExecutionModel::Threads)?;
    run_scenario("Free-for-all", FIELD, false, ExecutionModel::Threads)?;
    run_scenario("Stop sign", FIELD, true, ExecutionModel::Pool)?;
    Ok(())
}
