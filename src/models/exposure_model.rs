//! Vectorized Greek exposure model
//!
//! Evaluates Black-Scholes partial derivatives for every (spot level, contract)
//! pair at once. Spot levels form a column (L), contract inputs form rows (N),
//! and every output is an L×N array.
//!
//! Every output is masked to exactly 0 where the contract's strike, implied
//! vol or time to expiry is non-positive, so no NaN/Inf reaches a sum.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::black_scholes::{charm_from_d1, is_priced, norm_cdf, norm_pdf};
use crate::core::{ContractTable, MarketScalars, OptionSide};

/// Shared d1 basis: `(d1, N(d1), n(d1))`, each L×N, plus the per-contract
/// validity row every exposure is masked by
#[derive(Debug, Clone)]
pub struct PricingBasis {
    pub d1: Array2<f64>,
    pub cdf: Array2<f64>,
    pub pdf: Array2<f64>,
    pub valid: Vec<bool>,
}

/// Validity row: true where a contract side can carry exposure
pub fn priced_mask(strikes: &Array1<f64>, vols: &Array1<f64>, times: &Array1<f64>) -> Vec<bool> {
    strikes
        .iter()
        .zip(vols.iter())
        .zip(times.iter())
        .map(|((&k, &v), &t)| is_priced(k, v, t))
        .collect()
}

/// Compute `d1` and its normal CDF/PDF over the spot × contract grid
pub fn calc_basis(
    levels: &Array1<f64>,
    strikes: &Array1<f64>,
    vols: &Array1<f64>,
    times: &Array1<f64>,
    rate: f64,
    div: f64,
) -> PricingBasis {
    let shape = (levels.len(), strikes.len());
    let valid = priced_mask(strikes, vols, times);
    let d1 = Array2::from_shape_fn(shape, |(i, j)| {
        if !valid[j] {
            return 0.0;
        }
        let (k, v, t) = (strikes[j], vols[j], times[j]);
        ((levels[i] / k).ln() + (rate - div + 0.5 * v * v) * t) / (v * t.sqrt())
    });
    let cdf = d1.mapv(norm_cdf);
    let pdf = d1.mapv(norm_pdf);

    PricingBasis { d1, cdf, pdf, valid }
}

/// Delta exposure: `φ·e^{-qT}·N(φ·d1)·OI`
pub fn delta_ex(
    times: &Array1<f64>,
    div: f64,
    side: OptionSide,
    open_interest: &Array1<f64>,
    basis: &PricingBasis,
) -> Array2<f64> {
    let valid = &basis.valid;
    Array2::from_shape_fn(basis.cdf.dim(), |(i, j)| {
        if !valid[j] {
            return 0.0;
        }
        let div_factor = (-div * times[j]).exp();
        let cdf = basis.cdf[[i, j]];
        let delta = match side {
            OptionSide::Call => div_factor * cdf,
            OptionSide::Put => div_factor * (cdf - 1.0),
        };
        delta * open_interest[j]
    })
}

/// Gamma exposure in notional terms: `e^{-qT}·n(d1)/(S·σ·√T)·OI·S²`
pub fn gamma_ex(
    levels: &Array1<f64>,
    vols: &Array1<f64>,
    times: &Array1<f64>,
    div: f64,
    open_interest: &Array1<f64>,
    basis: &PricingBasis,
) -> Array2<f64> {
    let valid = &basis.valid;
    Array2::from_shape_fn(basis.pdf.dim(), |(i, j)| {
        if !valid[j] {
            return 0.0;
        }
        let (s, v, t) = (levels[i], vols[j], times[j]);
        let gamma = (-div * t).exp() * basis.pdf[[i, j]] / (s * v * t.sqrt());
        gamma * open_interest[j] * s * s
    })
}

/// Vanna exposure: `−e^{-qT}·n(d1)·(d1 − σ√T)/σ·OI`
pub fn vanna_ex(
    vols: &Array1<f64>,
    times: &Array1<f64>,
    div: f64,
    open_interest: &Array1<f64>,
    basis: &PricingBasis,
) -> Array2<f64> {
    let valid = &basis.valid;
    Array2::from_shape_fn(basis.d1.dim(), |(i, j)| {
        if !valid[j] {
            return 0.0;
        }
        let (v, t) = (vols[j], times[j]);
        let d2 = basis.d1[[i, j]] - v * t.sqrt();
        -(-div * t).exp() * basis.pdf[[i, j]] * d2 / v * open_interest[j]
    })
}

/// Charm exposure: per-side charm times open interest
pub fn charm_ex(
    vols: &Array1<f64>,
    times: &Array1<f64>,
    rate: f64,
    div: f64,
    side: OptionSide,
    open_interest: &Array1<f64>,
    basis: &PricingBasis,
) -> Array2<f64> {
    Array2::from_shape_fn(basis.d1.dim(), |(i, j)| {
        if !basis.valid[j] {
            return 0.0;
        }
        let charm = charm_from_d1(
            basis.d1[[i, j]],
            basis.cdf[[i, j]],
            basis.pdf[[i, j]],
            rate,
            div,
            vols[j],
            times[j],
            side,
        );
        charm * open_interest[j]
    })
}

/// All four exposures for one side, each L×N
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideExposure {
    pub delta: Array2<f64>,
    pub gamma: Array2<f64>,
    pub vanna: Array2<f64>,
    pub charm: Array2<f64>,
}

/// Greeks pricing model bound to a set of market scalars
#[derive(Debug, Clone, Copy)]
pub struct ExposureModel {
    rates: MarketScalars,
}

impl ExposureModel {
    pub fn new(rates: MarketScalars) -> Self {
        Self { rates }
    }

    /// Evaluate one side of every contract at every spot level
    pub fn evaluate(
        &self,
        levels: &Array1<f64>,
        table: &ContractTable,
        side: OptionSide,
    ) -> SideExposure {
        let r = self.rates.risk_free_yield;
        let q = self.rates.dividend_yield;

        let cols = table.side(side);
        let vols = cols.iv_row();
        let oi = cols.open_interest_row();
        let times = &table.time_till_exp;

        let basis = calc_basis(levels, &table.strike_price, &vols, times, r, q);

        SideExposure {
            delta: delta_ex(times, q, side, &oi, &basis),
            gamma: gamma_ex(levels, &vols, times, q, &oi, &basis),
            vanna: vanna_ex(&vols, times, q, &oi, &basis),
            charm: charm_ex(&vols, times, r, q, side, &oi, &basis),
        }
    }
}
