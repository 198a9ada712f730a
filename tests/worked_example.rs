//! End-to-end checks on a two-contract chain: a 95 put and a 105 call,
//! spot 100, 20% vol, 30 trading days, 100 open interest each.

use approx::assert_relative_eq;
use chrono::{NaiveDate, TimeZone, Utc};
use dealer_exposure::models::black_scholes::exposure;
use dealer_exposure::prelude::*;

const SPOT: f64 = 100.0;
const VOL: f64 = 0.2;
const TIME: f64 = 30.0 / 252.0;
const OI: u64 = 100;
const RATE: f64 = 0.01;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn inputs(scope: ExpiryScope) -> ExposureInputs {
    ExposureInputs {
        ticker: "TEST".to_string(),
        scope,
        first_expiry: date(2025, 4, 17),
        monthly_opex: date(2025, 4, 17),
        spot_price: SPOT,
        evaluated: EvaluationTime::new(Utc.with_ymd_and_hms(2025, 3, 4, 14, 30, 0).unwrap()),
        rates: MarketScalars::new(RATE, 0.0),
    }
}

fn two_contracts() -> Vec<ContractRecord> {
    let exp = date(2025, 4, 17);
    vec![
        ContractRecord::new(95.0, exp)
            .with_side(OptionSide::Put, VOL, OI)
            .with_time_till_exp(TIME),
        ContractRecord::new(105.0, exp)
            .with_side(OptionSide::Call, VOL, OI)
            .with_time_till_exp(TIME),
    ]
}

fn scalar(spot: f64, strike: f64, side: OptionSide) -> Greeks {
    exposure(spot, strike, RATE, 0.0, VOL, TIME, OI as f64, side)
}

#[test]
fn point_in_time_matches_scalar_model() {
    let report = calc_exposures(ContractTable::from_records(&two_contracts()), &inputs(ExpiryScope::All)).unwrap();
    let ex = &report.exposures;

    let put = scalar(SPOT, 95.0, OptionSide::Put);
    let call = scalar(SPOT, 105.0, OptionSide::Call);

    assert_relative_eq!(ex.put_dex[0], put.delta * SPOT, max_relative = 1e-6);
    assert_relative_eq!(ex.put_gex[0], -put.gamma, max_relative = 1e-6);
    assert_relative_eq!(ex.put_vex[0], put.vanna, max_relative = 1e-6);
    assert_relative_eq!(ex.put_cex[0], put.charm, max_relative = 1e-6);

    assert_relative_eq!(ex.call_dex[1], call.delta * SPOT, max_relative = 1e-6);
    assert_relative_eq!(ex.call_gex[1], call.gamma, max_relative = 1e-6);
    assert_relative_eq!(ex.call_vex[1], call.vanna, max_relative = 1e-6);
    assert_relative_eq!(ex.call_cex[1], call.charm, max_relative = 1e-6);

    // Absent sides carry nothing
    assert_eq!(ex.call_dex[0], 0.0);
    assert_eq!(ex.put_gex[1], 0.0);

    // Totals in billions
    assert_relative_eq!(ex.total_gamma[0], -put.gamma / 1e9, max_relative = 1e-6);
    assert_relative_eq!(ex.total_vanna[1], call.vanna / 1e9, max_relative = 1e-6);
    assert_relative_eq!(ex.total_charm[0], -put.charm / 1e9, max_relative = 1e-6);
}

#[test]
fn point_in_time_matches_hand_computed_values() {
    let report = calc_exposures(ContractTable::from_records(&two_contracts()), &inputs(ExpiryScope::All)).unwrap();
    let ex = &report.exposures;

    // d1 = (ln(S/K) + (r + σ²/2)T) / (σ√T): 0.795065 for the put, -0.655282 for the call.
    // dex = Δ·OI·S, gex = Γ·OI·S² (put stored negated), vex = -n(d1)·d2/σ·OI,
    // cex = -n(d1)(2rT - d2σ√T)/(2Tσ√T)·OI with q = 0.
    assert_relative_eq!(ex.put_dex[0], -2132.877386, max_relative = 1e-8);
    assert_relative_eq!(ex.put_gex[0], -42145.834481, max_relative = 1e-8);
    assert_relative_eq!(ex.put_vex[0], -105.581254, max_relative = 1e-8);
    assert_relative_eq!(ex.put_cex[0], 84.473670, max_relative = 1e-7);

    assert_relative_eq!(ex.call_dex[1], 2561.431896, max_relative = 1e-8);
    assert_relative_eq!(ex.call_gex[1], 46642.085226, max_relative = 1e-8);
    assert_relative_eq!(ex.call_vex[1], 116.560064, max_relative = 1e-8);
    assert_relative_eq!(ex.call_cex[1], -102.574663, max_relative = 1e-7);

    let net = ex.net_totals();
    assert_relative_eq!(net.delta, (2561.431896 - 2132.877386) / 1e9, max_relative = 1e-7);
    assert_relative_eq!(net.gamma, (46642.085226 - 42145.834481) / 1e9, max_relative = 1e-7);
    assert_relative_eq!(net.vanna, (116.560064 + 105.581254) / 1e9, max_relative = 1e-7);
    assert_relative_eq!(net.charm, (-102.574663 - 84.473670) / 1e9, max_relative = 1e-7);
}

#[test]
fn profiles_match_scalar_model_on_grid() {
    let report = calc_exposures(ContractTable::from_records(&two_contracts()), &inputs(ExpiryScope::All)).unwrap();

    assert_eq!(report.levels.len(), 300);
    assert_relative_eq!(report.levels[0], 50.0, max_relative = 1e-12);
    assert_relative_eq!(report.levels[299], 150.0, max_relative = 1e-12);

    for (i, &level) in report.levels.iter().enumerate().step_by(13) {
        let put = scalar(level, 95.0, OptionSide::Put);
        let call = scalar(level, 105.0, OptionSide::Call);

        // Absolute tolerance scales with gross exposure where the sides cancel
        let check = |got: f64, c: f64, p: f64, net: f64| {
            let gross = (c.abs() + p.abs()) / 1e9;
            assert_relative_eq!(got, net / 1e9, epsilon = 1e-9 * gross, max_relative = 1e-6);
        };
        check(report.total_delta.all[i], call.delta, put.delta, call.delta + put.delta);
        check(report.total_gamma.all[i], call.gamma, put.gamma, call.gamma - put.gamma);
        check(report.total_vanna.all[i], call.vanna, put.vanna, call.vanna - put.vanna);
    }
}

#[test]
fn flips_are_interpolated_near_spot() {
    let report = calc_exposures(ContractTable::from_records(&two_contracts()), &inputs(ExpiryScope::All)).unwrap();
    let levels = report.levels.to_vec();

    for (flip, curve) in [
        (report.gamma_flip(), report.total_gamma.all.to_vec()),
        (report.delta_flip(), report.total_delta.all.to_vec()),
    ] {
        let flip = flip.expect("two-sided chain has a flip");
        assert!((flip - SPOT).abs() < 5.0, "flip {} too far from spot", flip);

        let i = levels.windows(2).position(|w| w[0] <= flip && flip <= w[1]).unwrap();
        assert!(curve[i].signum() != curve[i + 1].signum());

        let expected = levels[i + 1] - (levels[i + 1] - levels[i]) * curve[i + 1] / (curve[i + 1] - curve[i]);
        assert_relative_eq!(flip, expected, max_relative = 1e-12);
    }
}

#[test]
fn opex_scope_drops_later_expirations() {
    let mut records = two_contracts();
    records.push(
        ContractRecord::new(100.0, date(2025, 6, 20))
            .with_side(OptionSide::Call, 0.25, 5_000)
            .with_side(OptionSide::Put, 0.3, 5_000)
            .with_time_till_exp(75.0 / 252.0),
    );

    let full = calc_exposures(ContractTable::from_records(&records), &inputs("all".parse().unwrap())).unwrap();
    let near = calc_exposures(ContractTable::from_records(&two_contracts()), &inputs(ExpiryScope::All)).unwrap();

    for i in 0..full.levels.len() {
        assert_relative_eq!(
            full.total_gamma.ex_fri[i],
            near.total_gamma.all[i],
            epsilon = 1e-18,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            full.total_delta.ex_next[i],
            near.total_delta.all[i],
            epsilon = 1e-18,
            max_relative = 1e-9
        );
    }
    assert!(full
        .total_gamma
        .all
        .iter()
        .zip(full.total_gamma.ex_fri.iter())
        .any(|(a, b)| (a - b).abs() > 1e-12));
}

#[test]
fn histogram_flip_ignores_single_strike_outliers() {
    let strikes: Vec<f64> = (90..98).map(f64::from).collect();
    let values = [-3.0, -2.0, 1.0, -1.0, -2.0, 2.0, 3.0, 4.0];

    // The lone positive at 92 is noise; the persistent flip is between 94 and 95
    let flip = find_histogram_flip(&strikes, &values, 92.0, 2).unwrap();
    assert_relative_eq!(flip, 94.5, max_relative = 1e-12);

    // Without run filtering the outlier's crossing is nearest
    let raw = find_histogram_flip(&strikes, &values, 92.0, 1).unwrap();
    assert_relative_eq!(raw, 92.0 - 1.0 / 3.0, max_relative = 1e-12);
}
