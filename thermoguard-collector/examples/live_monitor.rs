//! ThermoGuard Live Monitor Example
//!
//! Runs the full collection loop against the mock sensor:
//! - Backfills a day of history so the forest path is active from the start
//! - Polls the wall clock and prints one line per cycle
//! - Stops after a fixed number of cycles
//!
//! ```text
//! RUST_LOG=debug cargo run -p thermoguard-collector --example live_monitor [config.json]
//! ```

use thermoguard_collector::{
    GeneratorConfig, MemoryStore, MockGenerator, Monitor, MonitorConfig, MonitorSnapshot,
    ReadingStore,
};
use thermoguard_core::{Signal, SystemTime, TimeSource};

const CYCLES: usize = 20;

fn print_snapshot(cycle: usize, snapshot: &MonitorSnapshot) {
    let Some(reading) = snapshot.current else {
        println!("[{:>2}] no reading", cycle);
        return;
    };

    println!(
        "[{:>2}] {:>5.1} °C {:>5.1} %  | {:?} | temp {} / humid {} anomalies | {}, {}",
        cycle,
        reading.temperature,
        reading.humidity,
        snapshot.anomalies.method,
        snapshot.anomalies.temperature.len(),
        snapshot.anomalies.humidity.len(),
        snapshot.patterns.trend(Signal::Temperature),
        snapshot.patterns.stability(Signal::Temperature),
    );

    for alert in &snapshot.alerts {
        println!("     ALERT {}", alert);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => MonitorConfig::from_json_file(path)?,
        None => MonitorConfig::default(),
    };
    // Keep the demo short
    config.poll_interval_ms = config.poll_interval_ms.min(500);

    println!("=== ThermoGuard Live Monitor ===\n");
    println!("{}\n", config.to_json_string()?);

    let mut generator = MockGenerator::new(GeneratorConfig {
        spike_probability: 0.05,
        ..GeneratorConfig::default()
    })?;

    let clock = SystemTime;
    let history = generator.historical(24, 5, clock.now());

    let mut monitor = Monitor::new(generator, MemoryStore::new(), clock, config)?;
    let backfilled = monitor.store_mut().extend(history)?;
    println!("Backfilled {} readings\n", backfilled);

    let mut cycle = 0;
    monitor.run(|snapshot| {
        cycle += 1;
        print_snapshot(cycle, snapshot);
        cycle < CYCLES
    })?;

    let stats = monitor.stats();
    println!(
        "\n{} cycles, {} stored, {} absent, {} alerts, {} readings kept",
        stats.ticks,
        stats.stored,
        stats.absent,
        stats.alerts,
        monitor.store().len()
    );

    Ok(())
}
