//! Dealer Exposure from an Option Chain Snapshot
//!
//! Turns a chain snapshot into dealer delta/gamma/vanna/charm exposure and
//! the spot levels where net exposure flips sign.
//!
//! Pipeline:
//! 1. **Point-in-time**: per-contract exposures at the real spot
//! 2. **Profiles**: exposures re-evaluated over a synthetic spot grid and
//!    summed per scope (all expirations, next expiration, up to monthly opex)
//! 3. **Flips**: zero crossings of the `all` delta and gamma profiles nearest
//!    spot, plus run-filtered flips on per-strike histograms

mod aggregator;
mod config;
pub mod flip;
pub mod histogram;
mod table;

pub use aggregator::*;
pub use config::*;
pub use flip::{find_flip, locate_flip, FlipCandidate};
pub use histogram::{find_histogram_flip, StrikeHistogram};
pub use table::*;

use chrono::{DateTime, NaiveDate, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::core::{ExpiryScope, GreekKind};

/// One Greek's profile under the three scopes.
///
/// A scope that was not computed holds an empty array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopedCurves {
    /// Every expiration
    pub all: Array1<f64>,
    /// Nearest expiration only
    pub ex_next: Array1<f64>,
    /// Expirations up to and including the monthly opex
    pub ex_fri: Array1<f64>,
}

/// Mean implied vol per strike and per expiration for one side.
///
/// A key whose values are all absent has no mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IvProfile {
    #[serde(rename = "strike")]
    pub by_strike: Vec<(f64, Option<f64>)>,
    #[serde(rename = "exp")]
    pub by_expiry: Vec<(NaiveDate, Option<f64>)>,
}

/// Result of one exposure computation.
///
/// Field order is part of the output contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureReport {
    /// Contract table with point-in-time exposure columns
    pub exposures: ExposureTable,
    pub evaluated_at: DateTime<Utc>,
    pub evaluated_at_string: String,
    /// `[first_expiry, monthly_opex]`
    pub monthly_options_dates: [NaiveDate; 2],
    pub spot_price: f64,
    pub from_strike: f64,
    pub to_strike: f64,
    /// Synthetic spot grid the profiles are aligned to
    pub levels: Array1<f64>,
    pub total_delta: ScopedCurves,
    pub total_gamma: ScopedCurves,
    pub total_vanna: ScopedCurves,
    pub total_charm: ScopedCurves,
    /// Delta flip level, 0 when none was found
    pub zero_delta: f64,
    /// Gamma flip level, 0 when none was found
    pub zero_gamma: f64,
    pub call_ivs: IvProfile,
    pub put_ivs: IvProfile,
    pub ticker: String,
    pub scope: ExpiryScope,
}

impl ExposureReport {
    pub fn curves(&self, kind: GreekKind) -> &ScopedCurves {
        match kind {
            GreekKind::Delta => &self.total_delta,
            GreekKind::Gamma => &self.total_gamma,
            GreekKind::Vanna => &self.total_vanna,
            GreekKind::Charm => &self.total_charm,
        }
    }

    pub fn delta_flip(&self) -> Option<f64> {
        Some(self.zero_delta).filter(|v| *v != 0.0)
    }

    pub fn gamma_flip(&self) -> Option<f64> {
        Some(self.zero_gamma).filter(|v| *v != 0.0)
    }

    /// Point-in-time exposure per strike inside the report window
    pub fn strike_histogram(&self) -> StrikeHistogram {
        StrikeHistogram::from_exposures(&self.exposures, self.from_strike, self.to_strike)
    }

    /// Run-filtered per-strike flip for one Greek
    pub fn histogram_flip(&self, kind: GreekKind, min_run: usize) -> Option<f64> {
        self.strike_histogram().flip(kind, self.spot_price, min_run)
    }
}
