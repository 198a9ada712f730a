//! Dealer exposure CLI
//!
//! Loads one or more per-DTE chain snapshots, concatenates them and prints
//! net exposure, flip levels and per-strike flips.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dealer_exposure::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "gex", about = "Dealer delta/gamma/vanna/charm exposure from chain snapshots")]
struct Args {
    /// Chain snapshot files (JSON), one per DTE bucket
    #[arg(required = true)]
    snapshots: Vec<PathBuf>,

    /// Underlying spot price (defaults to the first snapshot's spot)
    #[arg(long)]
    spot: Option<f64>,

    /// Expiry scope: 0dte, <n>dte or all
    #[arg(long, default_value = "all")]
    scope: String,

    /// Risk-free yield (decimal)
    #[arg(long, default_value_t = 0.0)]
    rate: f64,

    /// Dividend yield (decimal); 0 when unknown
    #[arg(long)]
    dividend: Option<f64>,

    /// Evaluation date for rows without time_till_exp (defaults to today)
    #[arg(long)]
    eval_date: Option<NaiveDate>,

    /// Exposure config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> ExposureResult<()> {
    let config = match &args.config {
        Some(path) => ExposureConfig::from_json_file(path)?,
        None => ExposureConfig::default(),
    };
    let scope: ExpiryScope = args.scope.parse()?;

    let evaluated = EvaluationTime::now();
    let eval_date = args.eval_date.unwrap_or_else(|| Utc::now().date_naive());

    let mut snapshots = load_snapshots(&args.snapshots);
    if snapshots.is_empty() {
        return Err(ExposureError::data("no readable snapshots"));
    }
    for snapshot in &mut snapshots {
        snapshot.fill_time_till_exp(eval_date);
    }

    let ticker = snapshots[0].ticker.clone();
    let spot = args
        .spot
        .or(snapshots[0].spot_price)
        .ok_or_else(|| ExposureError::invalid_input("spot price not given and not in snapshot"))?;

    let table = combine_snapshots(&snapshots);
    let first_expiry = table
        .first_expiry()
        .ok_or_else(|| ExposureError::data("snapshots contain no contracts"))?;
    let monthly_opex = next_monthly_opex(eval_date)
        .ok_or_else(|| ExposureError::data("could not determine monthly opex"))?;

    let inputs = ExposureInputs {
        ticker,
        scope,
        first_expiry,
        monthly_opex,
        spot_price: spot,
        evaluated,
        rates: MarketScalars::with_optional_dividend(args.rate, args.dividend),
    };

    let min_run = config.min_run_length;
    let report = ExposureAggregator::with_config(config).compute(table, &inputs)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{}", json);
        return Ok(());
    }

    print_summary(&report, min_run);
    Ok(())
}

fn print_summary(report: &ExposureReport, min_run: usize) {
    println!("=== {} ({}) @ {} ===\n", report.ticker, report.scope, report.evaluated_at_string);
    println!("Spot: {:.2}", report.spot_price);
    println!("Window: {:.2} - {:.2}", report.from_strike, report.to_strike);
    let [next_expiry, monthly_opex] = report.monthly_options_dates;
    println!(
        "Next expiry: {}{} | Monthly opex: {}",
        next_expiry,
        if is_monthly(next_expiry) { " (monthly)" } else { "" },
        monthly_opex
    );
    println!("Contracts: {}\n", report.exposures.len());

    let net = report.exposures.net_totals();
    println!("--- Net Exposure (bn) ---\n");
    for kind in GreekKind::ALL {
        println!("  {}: {:+.4}", kind.exposure_label(), net.get(kind));
    }

    println!("\n--- Flip Points ---\n");
    let fmt = |v: Option<f64>| v.map(|x| format!("{:.2}", x)).unwrap_or_else(|| "not found".into());
    println!("  Delta flip: {}", fmt(report.delta_flip()));
    println!("  Gamma flip: {}", fmt(report.gamma_flip()));

    let histogram = report.strike_histogram();
    println!("\n--- Per-Strike Flips ({} strikes) ---\n", histogram.len());
    for kind in GreekKind::ALL {
        println!(
            "  {}: {}",
            kind.exposure_label(),
            fmt(histogram.flip(kind, report.spot_price, min_run))
        );
    }
}
