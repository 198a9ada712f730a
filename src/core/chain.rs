//! Option chain snapshot data
//!
//! A snapshot arrives as rows (one per strike/expiration pair, carrying both
//! the call and the put side) and is held as a struct-of-arrays table so the
//! pricing model can work column-wise.

use chrono::NaiveDate;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::option::OptionSide;

/// One strike/expiration row of a chain snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub strike_price: f64,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub call_iv: Option<f64>,
    #[serde(default)]
    pub put_iv: Option<f64>,
    #[serde(default)]
    pub call_open_int: Option<u64>,
    #[serde(default)]
    pub put_open_int: Option<u64>,
    #[serde(default)]
    pub call_delta: Option<f64>,
    #[serde(default)]
    pub put_delta: Option<f64>,
    #[serde(default)]
    pub call_gamma: Option<f64>,
    #[serde(default)]
    pub put_gamma: Option<f64>,
    /// Year fraction until expiration (floored at 1/252 on expiration day)
    #[serde(default)]
    pub time_till_exp: Option<f64>,
}

impl ContractRecord {
    /// Row with no quotes on either side
    pub fn new(strike_price: f64, expiration_date: NaiveDate) -> Self {
        Self {
            strike_price,
            expiration_date,
            call_iv: None,
            put_iv: None,
            call_open_int: None,
            put_open_int: None,
            call_delta: None,
            put_delta: None,
            call_gamma: None,
            put_gamma: None,
            time_till_exp: None,
        }
    }

    /// Set implied vol and open interest for one side
    pub fn with_side(mut self, side: OptionSide, iv: f64, open_interest: u64) -> Self {
        match side {
            OptionSide::Call => {
                self.call_iv = Some(iv);
                self.call_open_int = Some(open_interest);
            }
            OptionSide::Put => {
                self.put_iv = Some(iv);
                self.put_open_int = Some(open_interest);
            }
        }
        self
    }

    /// Set chain-supplied delta and gamma for one side
    pub fn with_greeks(mut self, side: OptionSide, delta: f64, gamma: f64) -> Self {
        match side {
            OptionSide::Call => {
                self.call_delta = Some(delta);
                self.call_gamma = Some(gamma);
            }
            OptionSide::Put => {
                self.put_delta = Some(delta);
                self.put_gamma = Some(gamma);
            }
        }
        self
    }

    pub fn with_time_till_exp(mut self, time: f64) -> Self {
        self.time_till_exp = Some(time);
        self
    }
}

/// Per-side columns of a contract table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SideColumns {
    pub iv: Vec<Option<f64>>,
    pub open_interest: Vec<Option<u64>>,
    pub delta: Vec<Option<f64>>,
    pub gamma: Vec<Option<f64>>,
}

impl SideColumns {
    /// Implied vols as a dense row, absent values as 0 (masked downstream)
    pub fn iv_row(&self) -> Array1<f64> {
        self.iv.iter().map(|v| v.unwrap_or(0.0)).collect()
    }

    /// Open interest as a dense row, absent values as 0
    pub fn open_interest_row(&self) -> Array1<f64> {
        self.open_interest
            .iter()
            .map(|oi| oi.map(|v| v as f64).unwrap_or(0.0))
            .collect()
    }

    fn push(&mut self, iv: Option<f64>, oi: Option<u64>, delta: Option<f64>, gamma: Option<f64>) {
        self.iv.push(iv);
        self.open_interest.push(oi);
        self.delta.push(delta);
        self.gamma.push(gamma);
    }

    fn select(&self, idx: &[usize]) -> Self {
        Self {
            iv: idx.iter().map(|&i| self.iv[i]).collect(),
            open_interest: idx.iter().map(|&i| self.open_interest[i]).collect(),
            delta: idx.iter().map(|&i| self.delta[i]).collect(),
            gamma: idx.iter().map(|&i| self.gamma[i]).collect(),
        }
    }
}

/// Struct-of-arrays option chain table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractTable {
    pub strike_price: Array1<f64>,
    pub expiration_date: Vec<NaiveDate>,
    pub time_till_exp: Array1<f64>,
    pub call: SideColumns,
    pub put: SideColumns,
}

impl ContractTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from snapshot rows. A missing `time_till_exp` becomes 0, which
    /// masks the row out of every exposure.
    pub fn from_records(records: &[ContractRecord]) -> Self {
        let mut strikes = Vec::with_capacity(records.len());
        let mut expirations = Vec::with_capacity(records.len());
        let mut times = Vec::with_capacity(records.len());
        let mut call = SideColumns::default();
        let mut put = SideColumns::default();

        for r in records {
            strikes.push(r.strike_price);
            expirations.push(r.expiration_date);
            times.push(r.time_till_exp.unwrap_or(0.0));
            call.push(r.call_iv, r.call_open_int, r.call_delta, r.call_gamma);
            put.push(r.put_iv, r.put_open_int, r.put_delta, r.put_gamma);
        }

        Self {
            strike_price: Array1::from(strikes),
            expiration_date: expirations,
            time_till_exp: Array1::from(times),
            call,
            put,
        }
    }

    /// Convert back to rows
    pub fn to_records(&self) -> Vec<ContractRecord> {
        (0..self.len())
            .map(|i| ContractRecord {
                strike_price: self.strike_price[i],
                expiration_date: self.expiration_date[i],
                call_iv: self.call.iv[i],
                put_iv: self.put.iv[i],
                call_open_int: self.call.open_interest[i],
                put_open_int: self.put.open_interest[i],
                call_delta: self.call.delta[i],
                put_delta: self.put.delta[i],
                call_gamma: self.call.gamma[i],
                put_gamma: self.put.gamma[i],
                time_till_exp: Some(self.time_till_exp[i]),
            })
            .collect()
    }

    /// Concatenate several tables (e.g. one per DTE snapshot), preserving order
    pub fn concat<'a>(tables: impl IntoIterator<Item = &'a ContractTable>) -> Self {
        let records: Vec<ContractRecord> =
            tables.into_iter().flat_map(|t| t.to_records()).collect();
        Self::from_records(&records)
    }

    pub fn len(&self) -> usize {
        self.expiration_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiration_date.is_empty()
    }

    pub fn side(&self, side: OptionSide) -> &SideColumns {
        match side {
            OptionSide::Call => &self.call,
            OptionSide::Put => &self.put,
        }
    }

    /// Nearest expiration present
    pub fn first_expiry(&self) -> Option<NaiveDate> {
        self.expiration_date.iter().min().copied()
    }

    /// All expirations, ascending and deduplicated
    pub fn expirations(&self) -> Vec<NaiveDate> {
        let mut exps = self.expiration_date.clone();
        exps.sort();
        exps.dedup();
        exps
    }

    /// Unique strikes, ascending
    pub fn unique_strikes(&self) -> Vec<f64> {
        let mut strikes = self.strike_price.to_vec();
        strikes.sort_by(|a, b| a.total_cmp(b));
        strikes.dedup();
        strikes
    }

    /// Boolean mask over rows selected by an expiration predicate
    pub fn expiry_mask(&self, pred: impl Fn(NaiveDate) -> bool) -> Vec<bool> {
        self.expiration_date.iter().map(|&d| pred(d)).collect()
    }

    /// Rows whose expiration satisfies the predicate
    pub fn filter_expiry(&self, pred: impl Fn(NaiveDate) -> bool) -> Self {
        let idx: Vec<usize> = (0..self.len())
            .filter(|&i| pred(self.expiration_date[i]))
            .collect();

        Self {
            strike_price: idx.iter().map(|&i| self.strike_price[i]).collect(),
            expiration_date: idx.iter().map(|&i| self.expiration_date[i]).collect(),
            time_till_exp: idx.iter().map(|&i| self.time_till_exp[i]).collect(),
            call: self.call.select(&idx),
            put: self.put.select(&idx),
        }
    }
}

impl From<Vec<ContractRecord>> for ContractTable {
    fn from(records: Vec<ContractRecord>) -> Self {
        Self::from_records(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> ContractTable {
        ContractTable::from_records(&[
            ContractRecord::new(105.0, date(2025, 3, 21))
                .with_side(OptionSide::Call, 0.2, 100)
                .with_time_till_exp(0.1),
            ContractRecord::new(95.0, date(2025, 3, 14))
                .with_side(OptionSide::Put, 0.25, 50)
                .with_time_till_exp(0.05),
            ContractRecord::new(100.0, date(2025, 4, 17)),
        ])
    }

    #[test]
    fn test_from_records() {
        let table = sample();
        assert_eq!(table.len(), 3);
        assert_eq!(table.first_expiry(), Some(date(2025, 3, 14)));
        assert_eq!(table.call.iv_row().to_vec(), vec![0.2, 0.0, 0.0]);
        assert_eq!(table.put.open_interest_row().to_vec(), vec![0.0, 50.0, 0.0]);
        // Missing time masks the row
        assert_eq!(table.time_till_exp[2], 0.0);
    }

    #[test]
    fn test_filter_and_concat() {
        let table = sample();
        let near = table.filter_expiry(|d| d <= date(2025, 3, 21));
        assert_eq!(near.len(), 2);
        assert_eq!(near.unique_strikes(), vec![95.0, 105.0]);

        let both = ContractTable::concat([&near, &table]);
        assert_eq!(both.len(), 5);
        assert_eq!(both.expirations().len(), 3);
        assert_eq!(both.strike_price[2], 105.0);
    }

    #[test]
    fn test_empty_table() {
        let table = ContractTable::new();
        assert!(table.is_empty());
        assert_eq!(table.first_expiry(), None);
        assert!(table.unique_strikes().is_empty());
    }
}
