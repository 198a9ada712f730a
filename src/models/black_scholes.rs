//! Black-Scholes Model
//!
//! Scalar Black-Scholes-Merton Greeks for a single (spot, contract) pair:
//! delta, gamma, vanna and charm with a continuous dividend yield.
//!
//! This is the reference the vectorized exposure model is checked against,
//! and the fallback for chain rows that arrive without exchange Greeks.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erfc;

use crate::core::{Greeks, OptionSide};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Whether a side can carry exposure at all
pub fn is_priced(strike: f64, vol: f64, time: f64) -> bool {
    strike > 0.0 && vol > 0.0 && time > 0.0
}

/// Black-Scholes d1 parameter, 0 for unpriceable inputs
pub fn d1(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    if !is_priced(strike, vol, time) {
        return 0.0;
    }
    ((spot / strike).ln() + (rate - div + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    if !is_priced(strike, vol, time) {
        return 0.0;
    }
    d1(spot, strike, rate, div, vol, time) - vol * time.sqrt()
}

/// Charm for one side given the shared d1 terms.
///
/// Sign convention: call `q·e^{-qT}·N(d1) − e^{-qT}·n(d1)·(2(r−q)T − d2·σ√T)/(2T·σ√T)`,
/// put `−q·e^{-qT}·N(−d1) − ...` with the same second term. Callers mask
/// non-positive strikes; `d1` must be finite.
pub fn charm_from_d1(
    d1: f64,
    cdf_d1: f64,
    pdf_d1: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    side: OptionSide,
) -> f64 {
    if !(vol > 0.0 && time > 0.0 && d1.is_finite()) {
        return 0.0;
    }

    let div_factor = (-div * time).exp();
    let vol_sqrt_t = vol * time.sqrt();
    let d2 = d1 - vol_sqrt_t;
    let decay = div_factor * pdf_d1 * (2.0 * (rate - div) * time - d2 * vol_sqrt_t)
        / (2.0 * time * vol_sqrt_t);

    match side {
        OptionSide::Call => div * div_factor * cdf_d1 - decay,
        OptionSide::Put => -div * div_factor * (1.0 - cdf_d1) - decay,
    }
}

/// Black-Scholes exposure Greeks (per unit, unweighted).
///
/// All zero when `strike`, `vol` or `time` is non-positive.
pub fn greeks(
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    side: OptionSide,
) -> Greeks {
    if !is_priced(strike, vol, time) {
        return Greeks::default();
    }

    let d1 = d1(spot, strike, rate, div, vol, time);
    let sqrt_t = time.sqrt();
    let cdf_d1 = norm_cdf(d1);
    let pdf_d1 = norm_pdf(d1);
    let div_factor = (-div * time).exp();

    let delta = match side {
        OptionSide::Call => div_factor * cdf_d1,
        OptionSide::Put => div_factor * (cdf_d1 - 1.0),
    };

    // Gamma and vanna are the same for call and put
    let gamma = div_factor * pdf_d1 / (spot * vol * sqrt_t);
    let vanna = -div_factor * pdf_d1 * (d1 - vol * sqrt_t) / vol;

    let charm = charm_from_d1(d1, cdf_d1, pdf_d1, rate, div, vol, time, side);

    Greeks::new(delta, gamma, vanna, charm)
}

/// Open-interest weighted exposure for one side at one spot.
///
/// Gamma is expressed in notional terms (scaled by spot²). No sign is
/// applied for puts beyond the one carried by delta and charm themselves.
pub fn exposure(
    spot: f64,
    strike: f64,
    rate: f64,
    div: f64,
    vol: f64,
    time: f64,
    open_interest: f64,
    side: OptionSide,
) -> Greeks {
    let g = greeks(spot, strike, rate, div, vol, time, side);
    Greeks::new(
        g.delta * open_interest,
        g.gamma * open_interest * spot * spot,
        g.vanna * open_interest,
        g.charm * open_interest,
    )
}
