//! ThermoGuard Anomaly Detection Example
//!
//! Shows how the detector switches method with series size:
//! - A short burst of readings is checked with z-scores
//! - A day of readings is checked with per-signal isolation forests
//!
//! ## Scenario: Server Room
//!
//! Readings every 5 minutes. A cooling failure briefly pushes the temperature
//! up, and a humidifier fault causes one humidity spike later in the day.

use thermoguard_core::{time::MS_PER_MINUTE, PatternAnalyzer, Reading, ReadingSeries, Signal};
use thermoguard_ml::{contamination_for, AnomalyDetector, AnomalyResult};

/// Deterministic room simulation
fn simulate(count: usize) -> Vec<Reading> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            let mut temp = 21.5 + (t / 40.0).sin() * 0.8 + ((i * 7) % 5) as f64 * 0.05;
            let mut humid = 48.0 + (t / 55.0).cos() * 2.0 + ((i * 3) % 4) as f64 * 0.1;

            // Cooling failure
            if (100..103).contains(&i) {
                temp += 6.0;
            }
            // Humidifier fault
            if i == 210 {
                humid += 18.0;
            }

            Reading::new(i as u64 * 5 * MS_PER_MINUTE, temp, humid)
        })
        .collect()
}

fn report(label: &str, result: &AnomalyResult) {
    println!("{} -> method {:?}", label, result.method);
    for signal in Signal::ALL {
        let flagged = result.signal(signal);
        println!("  {}: {} anomalies", signal, flagged.len());
        for record in flagged {
            println!(
                "    #{:<4} {:>6.2} {}  (score {:.3})",
                record.index,
                record.reading.value(signal),
                signal.unit(),
                record.score.value()
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ThermoGuard Anomaly Detection Example ===\n");

    let detector = AnomalyDetector::new();
    let readings = simulate(288);

    // Last 40 readings only: z-score path
    let recent = ReadingSeries::new(readings[90..130].to_vec())?;
    report("Recent 40 readings", &detector.detect(&recent, 2.5)?);

    // Whole day: forest path
    let day = ReadingSeries::new(readings)?;
    for sensitivity in [1.0, 3.0, 50.0] {
        println!(
            "\nsensitivity {:.1} (contamination {:.2})",
            sensitivity,
            contamination_for(sensitivity)
        );
        report("Full day", &detector.detect(&day, sensitivity)?);
    }

    let patterns = PatternAnalyzer::default().analyze(&day)?;
    println!("\n{}", patterns);

    Ok(())
}
