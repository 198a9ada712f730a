//! Example: Exposure profiles and flip points for a synthetic chain
//!
//! Run with: cargo run --example exposure_profile

use chrono::{NaiveDate, TimeZone, Utc};
use dealer_exposure::prelude::*;

fn main() -> ExposureResult<()> {
    let spot = 500.0;
    let today = NaiveDate::from_ymd_opt(2025, 3, 12).ok_or_else(|| ExposureError::data("bad date"))?;
    let expirations = [
        NaiveDate::from_ymd_opt(2025, 3, 14),
        NaiveDate::from_ymd_opt(2025, 3, 21),
        NaiveDate::from_ymd_opt(2025, 4, 17),
    ];

    // Calls heavier above spot, puts heavier below, mild skew
    let mut records = Vec::new();
    for exp in expirations.into_iter().flatten() {
        for i in 0..41 {
            let strike = 450.0 + 2.5 * i as f64;
            let moneyness = (strike - spot) / spot;
            let call_oi = if strike >= spot { 4_000 } else { 1_000 };
            let put_oi = if strike <= spot { 6_000 } else { 800 };
            records.push(
                ContractRecord::new(strike, exp)
                    .with_side(OptionSide::Call, 0.16 - 0.2 * moneyness.min(0.0), call_oi)
                    .with_side(OptionSide::Put, 0.18 - 0.3 * moneyness.min(0.0), put_oi)
                    .with_time_till_exp(time_till_exp(today, exp)),
            );
        }
    }
    let table = ContractTable::from_records(&records);

    let first_expiry = table
        .first_expiry()
        .ok_or_else(|| ExposureError::data("empty chain"))?;
    let monthly_opex =
        next_monthly_opex(today).ok_or_else(|| ExposureError::data("no monthly opex"))?;

    let inputs = ExposureInputs {
        ticker: "SPX".to_string(),
        scope: ExpiryScope::All,
        first_expiry,
        monthly_opex,
        spot_price: spot,
        evaluated: EvaluationTime::new(Utc.with_ymd_and_hms(2025, 3, 12, 15, 30, 0).unwrap()),
        rates: MarketScalars::new(0.043, 0.013),
    };

    let report = calc_exposures(table, &inputs)?;

    println!("=== Exposure Profiles ===\n");
    println!("Spot: {:.2}  ({})", report.spot_price, report.evaluated_at_string);
    println!("Next expiry: {}  Monthly opex: {}", first_expiry, monthly_opex);
    println!("Grid: {} levels over {:.1} - {:.1}\n", report.levels.len(), report.from_strike, report.to_strike);

    for kind in GreekKind::ALL {
        let curves = report.curves(kind);
        let label = kind.exposure_label();
        println!("{:>10} {:>12} {:>12} {:>12}", "level", format!("{} all", label), "next", "opex");
        for i in (0..report.levels.len()).step_by(25) {
            println!(
                "{:>10.2} {:>12.4} {:>12.4} {:>12.4}",
                report.levels[i], curves.all[i], curves.ex_next[i], curves.ex_fri[i],
            );
        }
        println!();
    }

    println!("\n--- Flips ---\n");
    match report.delta_flip() {
        Some(level) => println!("  Delta flip: {:.2}", level),
        None => println!("  Delta flip: not found"),
    }
    match report.gamma_flip() {
        Some(level) => println!("  Gamma flip: {:.2}", level),
        None => println!("  Gamma flip: not found"),
    }

    Ok(())
}
