//! # Dealer Exposure - Options Chain Positioning Engine
//!
//! Computes dealer delta, gamma, vanna and charm exposure (DEX/GEX/VEX/CEX)
//! from an options chain snapshot and locates the spot levels where net
//! exposure flips sign.
//!
//! ## Overview
//!
//! Dealers hedge the options they are short. Summing each contract's Greeks,
//! weighted by open interest, estimates the hedge flow a move in spot would
//! trigger. Re-evaluating that sum over a grid of hypothetical spots gives an
//! exposure profile; its zero crossing is the "flip".
//!
//! ## Key Components
//!
//! - **Exposure model**: vectorized Black-Scholes Greeks over spot × contract
//! - **Aggregator**: point-in-time and profile exposures under three scopes
//!   (all expirations, next expiration, up to the monthly opex)
//! - **Flip locators**: profile zero crossings nearest spot, and run-filtered
//!   crossings on per-strike histograms
//! - **Snapshots**: per-DTE chain files concatenated into one table
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dealer_exposure::prelude::*;
//! use std::path::PathBuf;
//!
//! let paths = vec![PathBuf::from("spy_0dte.json"), PathBuf::from("spy_all.json")];
//! let snapshots = load_snapshots(&paths);
//! let table = combine_snapshots(&snapshots);
//!
//! let first_expiry = table.first_expiry().unwrap();
//! let inputs = ExposureInputs {
//!     ticker: "SPY".into(),
//!     scope: ExpiryScope::All,
//!     first_expiry,
//!     monthly_opex: next_monthly_opex(first_expiry).unwrap(),
//!     spot_price: 560.0,
//!     evaluated: EvaluationTime::now(),
//!     rates: MarketScalars::new(0.043, 0.012),
//! };
//!
//! let report = calc_exposures(table, &inputs).unwrap();
//! println!("gamma flip: {:?}", report.gamma_flip());
//! ```
//!
//! ## What This Engine Does NOT Do
//!
//! - Fetch chains, quotes or rates
//! - Persist state between invocations
//! - Decide trades

pub mod core;
pub mod data;
pub mod exposure;
pub mod models;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::calendar::{is_monthly, next_monthly_opex, third_friday, time_till_exp};
    pub use crate::core::{
        ContractRecord, ContractTable, EvaluationTime, ExpiryScope, ExposureError,
        ExposureResult, GreekKind, Greeks, MarketScalars, OptionSide,
    };

    // Snapshots
    pub use crate::data::{combine_snapshots, load_snapshot, load_snapshots, ChainSnapshot};

    // Models
    pub use crate::models::{greeks as bs_greeks, norm_cdf, norm_pdf, ExposureModel};

    // Exposure
    pub use crate::exposure::{
        calc_exposures, find_flip, find_histogram_flip, ExposureAggregator, ExposureConfig,
        ExposureInputs, ExposureReport, ExposureTable, IvProfile, ScopedCurves, StrikeHistogram,
    };
}

// Re-export main types at crate root
pub use crate::core::{ExposureError, ExposureResult};
pub use crate::exposure::{ExposureAggregator, ExposureReport};
