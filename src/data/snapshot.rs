//! Chain snapshot files
//!
//! A snapshot is the chain for one DTE bucket as JSON. Several snapshots are
//! loaded and concatenated into one table before exposure is computed. A
//! snapshot that cannot be read is skipped so the remaining DTEs still run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{ContractRecord, ContractTable, ExposureResult};

/// One per-DTE chain snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Underlying symbol
    pub ticker: String,
    /// DTE bucket this snapshot was fetched for
    #[serde(default)]
    pub dte: Option<u32>,
    /// Underlying price when the snapshot was taken
    #[serde(default)]
    pub spot_price: Option<f64>,
    pub rows: Vec<ContractRecord>,
}

impl ChainSnapshot {
    pub fn new(ticker: impl Into<String>, rows: Vec<ContractRecord>) -> Self {
        Self {
            ticker: ticker.into(),
            dte: None,
            spot_price: None,
            rows,
        }
    }

    pub fn to_table(&self) -> ContractTable {
        ContractTable::from_records(&self.rows)
    }

    /// Fill `time_till_exp` on rows that arrived without it
    pub fn fill_time_till_exp(&mut self, eval_date: NaiveDate) {
        for row in self.rows.iter_mut().filter(|r| r.time_till_exp.is_none()) {
            row.time_till_exp = Some(crate::core::calendar::time_till_exp(
                eval_date,
                row.expiration_date,
            ));
        }
    }
}

/// Load one snapshot file
pub fn load_snapshot(path: impl AsRef<Path>) -> ExposureResult<ChainSnapshot> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let snapshot: ChainSnapshot = serde_json::from_str(&json)?;

    tracing::info!(
        "Loaded {} rows for {} from {:?}",
        snapshot.rows.len(),
        snapshot.ticker,
        path
    );
    Ok(snapshot)
}

/// Save a snapshot as pretty JSON
pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &ChainSnapshot) -> ExposureResult<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

/// Load every readable snapshot, skipping (and logging) the rest
pub fn load_snapshots(paths: &[PathBuf]) -> Vec<ChainSnapshot> {
    paths
        .iter()
        .filter_map(|path| match load_snapshot(path) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Skipping snapshot {:?}: {}", path, e);
                None
            }
        })
        .collect()
}

/// Concatenate snapshots into a single table, in load order
pub fn combine_snapshots(snapshots: &[ChainSnapshot]) -> ContractTable {
    let tables: Vec<ContractTable> = snapshots.iter().map(|s| s.to_table()).collect();
    ContractTable::concat(&tables)
}
