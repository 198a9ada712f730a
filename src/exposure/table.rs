//! Contract table with point-in-time exposure columns appended

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::core::{ContractTable, Greeks};

/// Per-contract exposures at the real spot.
///
/// `put_gex` is stored already negated. The `total_*` columns are the net
/// per-contract figures divided by the display scale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExposureTable {
    pub contracts: ContractTable,
    pub call_dex: Array1<f64>,
    pub put_dex: Array1<f64>,
    pub call_gex: Array1<f64>,
    pub put_gex: Array1<f64>,
    pub call_vex: Array1<f64>,
    pub put_vex: Array1<f64>,
    pub call_cex: Array1<f64>,
    pub put_cex: Array1<f64>,
    pub total_delta: Array1<f64>,
    pub total_gamma: Array1<f64>,
    pub total_vanna: Array1<f64>,
    pub total_charm: Array1<f64>,
}

impl ExposureTable {
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Chain-wide net exposure (already scaled)
    pub fn net_totals(&self) -> Greeks {
        Greeks::new(
            self.total_delta.sum(),
            self.total_gamma.sum(),
            self.total_vanna.sum(),
            self.total_charm.sum(),
        )
    }
}
