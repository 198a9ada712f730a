//! Example: Per-strike exposure histogram from snapshot files
//!
//! Run with: cargo run --example strike_histogram -- <spot> <snapshot.json>...

use std::env;
use std::path::PathBuf;

use chrono::Utc;
use dealer_exposure::prelude::*;

fn main() -> ExposureResult<()> {
    let mut args = env::args().skip(1);
    let spot: f64 = args
        .next()
        .ok_or_else(|| ExposureError::invalid_input("usage: strike_histogram <spot> <snapshot.json>..."))?
        .parse()
        .map_err(|e| ExposureError::invalid_input(format!("bad spot: {}", e)))?;
    let paths: Vec<PathBuf> = args.map(PathBuf::from).collect();

    let today = Utc::now().date_naive();
    let mut snapshots = load_snapshots(&paths);
    for snapshot in &mut snapshots {
        snapshot.fill_time_till_exp(today);
    }
    let ticker = snapshots
        .first()
        .map(|s| s.ticker.clone())
        .ok_or_else(|| ExposureError::data("no readable snapshots"))?;

    let table = combine_snapshots(&snapshots);
    let first_expiry = table
        .first_expiry()
        .ok_or_else(|| ExposureError::data("empty chain"))?;
    let monthly_opex =
        next_monthly_opex(today).ok_or_else(|| ExposureError::data("no monthly opex"))?;

    let inputs = ExposureInputs {
        ticker,
        scope: ExpiryScope::All,
        first_expiry,
        monthly_opex,
        spot_price: spot,
        evaluated: EvaluationTime::now(),
        rates: MarketScalars::default(),
    };
    let report = calc_exposures(table, &inputs)?;
    let histogram = report.strike_histogram();

    println!("=== {} per-strike exposure (bn) ===\n", report.ticker);
    println!("{:>10} {:>12} {:>12} {:>12} {:>12}", "strike", "DEX", "GEX", "VEX", "CEX");
    for i in 0..histogram.len() {
        println!(
            "{:>10.2} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            histogram.strikes[i], histogram.delta[i], histogram.gamma[i], histogram.vanna[i], histogram.charm[i],
        );
    }

    let min_run = ExposureConfig::default().min_run_length;
    println!("\n--- Histogram Flips (min run {}) ---\n", min_run);
    for kind in GreekKind::ALL {
        let flip = report.histogram_flip(kind, min_run);
        println!(
            "  {}: {}",
            kind.exposure_label(),
            flip.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "none".to_string())
        );
    }

    Ok(())
}
