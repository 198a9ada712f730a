//! ExposureAggregator - main facade for the exposure pipeline
//!
//! Drives the exposure model at the real spot and across the synthetic spot
//! grid, sums the results per scope and locates the delta and gamma flips.

use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use tracing::{debug, warn};

use super::flip::find_flip;
use super::{ExposureConfig, ExposureReport, ExposureTable, IvProfile, ScopedCurves};
use crate::core::{
    ContractTable, EvaluationTime, ExpiryScope, ExposureError, ExposureResult, GreekKind,
    MarketScalars, OptionSide, SideColumns,
};
use crate::models::{priced_mask, ExposureModel, SideExposure};

/// Scalar inputs for one invocation
#[derive(Debug, Clone)]
pub struct ExposureInputs {
    pub ticker: String,
    pub scope: ExpiryScope,
    /// Nearest expiration in the chain
    pub first_expiry: NaiveDate,
    /// Next monthly options expiration
    pub monthly_opex: NaiveDate,
    pub spot_price: f64,
    pub evaluated: EvaluationTime,
    pub rates: MarketScalars,
}

/// Net profile of each Greek for one scope
struct ScopeSums {
    delta: Array1<f64>,
    gamma: Array1<f64>,
    vanna: Array1<f64>,
    charm: Array1<f64>,
}

impl ScopeSums {
    fn get(&self, kind: GreekKind) -> &Array1<f64> {
        match kind {
            GreekKind::Delta => &self.delta,
            GreekKind::Gamma => &self.gamma,
            GreekKind::Vanna => &self.vanna,
            GreekKind::Charm => &self.charm,
        }
    }
}

/// Profile of a computed scope, or the empty placeholder
fn scope_or_empty(sums: Option<&ScopeSums>, kind: GreekKind) -> Array1<f64> {
    sums.map(|s| s.get(kind).clone())
        .unwrap_or_else(|| Array1::zeros(0))
}

/// Main exposure aggregator
pub struct ExposureAggregator {
    config: ExposureConfig,
}

impl ExposureAggregator {
    /// Create with default configuration
    pub fn new() -> Self {
        Self {
            config: ExposureConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: ExposureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExposureConfig {
        &self.config
    }

    /// Synthetic spot grid spanning the configured window around spot
    pub fn spot_grid(&self, spot: f64) -> Array1<f64> {
        let (from, to) = self.config.window(spot);
        Array1::linspace(from, to, self.config.grid_points)
    }

    /// Run the full pipeline on a chain snapshot
    pub fn compute(
        &self,
        table: ContractTable,
        inputs: &ExposureInputs,
    ) -> ExposureResult<ExposureReport> {
        self.config.validate()?;
        let spot = inputs.spot_price;
        if !(spot.is_finite() && spot > 0.0) {
            return Err(ExposureError::invalid_input(format!(
                "spot price must be positive, got {}",
                spot
            )));
        }

        let model = ExposureModel::new(inputs.rates);
        let (from_strike, to_strike) = self.config.window(spot);

        debug!(
            ticker = %inputs.ticker,
            scope = %inputs.scope,
            contracts = table.len(),
            spot,
            "computing exposures"
        );

        // Point-in-time exposures at the real spot
        let exposures = self.point_in_time(&model, table, spot);

        // Mean IVs (display only)
        let contracts = &exposures.contracts;
        let call_ivs = mean_ivs(contracts, &contracts.call, from_strike, to_strike);
        let put_ivs = mean_ivs(contracts, &contracts.put, from_strike, to_strike);

        // Profiles over the spot grid
        let levels = self.spot_grid(spot);
        let calls = model.evaluate(&levels, contracts, OptionSide::Call);
        let puts = model.evaluate(&levels, contracts, OptionSide::Put);

        let everything = vec![true; contracts.len()];
        let all = self.scope_sums(&calls, &puts, &everything);

        let ex_next = if inputs.scope.has_next_expiry() {
            let mask = contracts.expiry_mask(|d| d == inputs.first_expiry);
            Some(self.scope_sums(&calls, &puts, &mask))
        } else {
            None
        };

        let ex_fri = if inputs.scope.has_monthly() {
            let mask = contracts.expiry_mask(|d| d <= inputs.monthly_opex);
            Some(self.scope_sums(&calls, &puts, &mask))
        } else {
            None
        };

        let grid = levels.to_vec();
        let zero_delta = self.flip_or_zero(&grid, &all.delta, spot, "delta", inputs);
        let zero_gamma = self.flip_or_zero(&grid, &all.gamma, spot, "gamma", inputs);

        let pick = |kind: GreekKind| ScopedCurves {
            all: all.get(kind).clone(),
            ex_next: scope_or_empty(ex_next.as_ref(), kind),
            ex_fri: scope_or_empty(ex_fri.as_ref(), kind),
        };
        let total_delta = pick(GreekKind::Delta);
        let total_gamma = pick(GreekKind::Gamma);
        let total_vanna = pick(GreekKind::Vanna);
        let total_charm = pick(GreekKind::Charm);

        Ok(ExposureReport {
            exposures,
            evaluated_at: inputs.evaluated.timestamp,
            evaluated_at_string: inputs.evaluated.formatted.clone(),
            monthly_options_dates: [inputs.first_expiry, inputs.monthly_opex],
            spot_price: spot,
            from_strike,
            to_strike,
            levels,
            total_delta,
            total_gamma,
            total_vanna,
            total_charm,
            zero_delta,
            zero_gamma,
            call_ivs,
            put_ivs,
            ticker: inputs.ticker.clone(),
            scope: inputs.scope,
        })
    }

    /// Per-contract exposures at spot.
    ///
    /// Delta and gamma prefer the chain-supplied Greeks and fall back to the
    /// model; vanna and charm always come from the model. Unpriced sides
    /// (strike, iv or T non-positive) are zero.
    fn point_in_time(&self, model: &ExposureModel, table: ContractTable, spot: f64) -> ExposureTable {
        let at_spot = Array1::from_elem(1, spot);
        let calls = model.evaluate(&at_spot, &table, OptionSide::Call);
        let puts = model.evaluate(&at_spot, &table, OptionSide::Put);

        let (call_dex, call_gex) = spot_delta_gamma(&table, OptionSide::Call, &calls, spot);
        let (put_dex, put_gex) = spot_delta_gamma(&table, OptionSide::Put, &puts, spot);
        let put_gex = -put_gex;

        let call_vex = calls.vanna.row(0).to_owned();
        let put_vex = puts.vanna.row(0).to_owned();
        let call_cex = calls.charm.row(0).to_owned();
        let put_cex = puts.charm.row(0).to_owned();

        let scale = self.config.scale;
        let total_delta = (&call_dex + &put_dex) / scale;
        let total_gamma = (&call_gex + &put_gex) / scale;
        let total_vanna = (&call_vex - &put_vex) / scale;
        let total_charm = (&call_cex - &put_cex) / scale;

        ExposureTable {
            contracts: table,
            call_dex,
            put_dex,
            call_gex,
            put_gex,
            call_vex,
            put_vex,
            call_cex,
            put_cex,
            total_delta,
            total_gamma,
            total_vanna,
            total_charm,
        }
    }

    /// Net profiles over the grid for the contracts selected by `mask`
    fn scope_sums(&self, calls: &SideExposure, puts: &SideExposure, mask: &[bool]) -> ScopeSums {
        let scale = self.config.scale;
        ScopeSums {
            delta: (masked_row_sums(&calls.delta, mask) + masked_row_sums(&puts.delta, mask)) / scale,
            gamma: (masked_row_sums(&calls.gamma, mask) - masked_row_sums(&puts.gamma, mask)) / scale,
            vanna: (masked_row_sums(&calls.vanna, mask) - masked_row_sums(&puts.vanna, mask)) / scale,
            charm: (masked_row_sums(&calls.charm, mask) - masked_row_sums(&puts.charm, mask)) / scale,
        }
    }

    fn flip_or_zero(
        &self,
        levels: &[f64],
        curve: &Array1<f64>,
        spot: f64,
        greek: &str,
        inputs: &ExposureInputs,
    ) -> f64 {
        match find_flip(levels, &curve.to_vec(), spot) {
            Some(level) => level,
            None => {
                warn!(
                    ticker = %inputs.ticker,
                    scope = %inputs.scope,
                    "{} flip not found, probably incomplete chain data",
                    greek
                );
                0.0
            }
        }
    }
}

impl Default for ExposureAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function with the default configuration
pub fn calc_exposures(table: ContractTable, inputs: &ExposureInputs) -> ExposureResult<ExposureReport> {
    ExposureAggregator::new().compute(table, inputs)
}

/// Dollar delta and notional gamma at spot for one side (gamma unsigned)
fn spot_delta_gamma(
    table: &ContractTable,
    side: OptionSide,
    model: &SideExposure,
    spot: f64,
) -> (Array1<f64>, Array1<f64>) {
    let cols = table.side(side);
    let oi = cols.open_interest_row();
    let valid = priced_mask(&table.strike_price, &cols.iv_row(), &table.time_till_exp);

    let mut dex = Array1::zeros(table.len());
    let mut gex = Array1::zeros(table.len());
    for j in 0..table.len() {
        if !valid[j] {
            continue;
        }
        dex[j] = match cols.delta[j] {
            Some(delta) => delta * oi[j] * spot,
            None => model.delta[[0, j]] * spot,
        };
        gex[j] = match cols.gamma[j] {
            Some(gamma) => gamma * oi[j] * spot * spot,
            None => model.gamma[[0, j]],
        };
    }
    (dex, gex)
}

/// Sum each row of an L×N array over the columns where `mask` is set
fn masked_row_sums(values: &Array2<f64>, mask: &[bool]) -> Array1<f64> {
    values
        .outer_iter()
        .map(|row| {
            row.iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(v, _)| *v)
                .sum::<f64>()
        })
        .collect()
}

fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Mean iv per strike (inside the window) and per expiration for one side
fn mean_ivs(table: &ContractTable, side: &SideColumns, from_strike: f64, to_strike: f64) -> IvProfile {
    let by_strike = table
        .unique_strikes()
        .into_iter()
        .filter(|&k| k >= from_strike && k <= to_strike)
        .map(|k| {
            let ivs = (0..table.len())
                .filter(|&i| table.strike_price[i] == k)
                .map(|i| side.iv[i]);
            (k, mean(ivs))
        })
        .collect();

    let by_expiry = table
        .expirations()
        .into_iter()
        .map(|exp| {
            let ivs = (0..table.len())
                .filter(|&i| table.expiration_date[i] == exp)
                .map(|i| side.iv[i]);
            (exp, mean(ivs))
        })
        .collect();

    IvProfile {
        by_strike,
        by_expiry,
    }
}
