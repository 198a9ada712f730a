//! Per-strike exposure histograms and run-filtered flip location
//!
//! Per-strike aggregates are sparse and noisy: a single contract with large
//! open interest can flip the sign of one bar. A transition only counts as a
//! flip when both sides hold their sign for at least `min_run` consecutive
//! strikes, and a zero bar never takes part in a flip.

use serde::{Deserialize, Serialize};

use super::flip::{closest_to_spot, interpolate_zero, sign, FlipCandidate};
use super::table::ExposureTable;
use crate::core::GreekKind;

/// Maximal run of same-sign values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRun {
    /// -1, 0 or +1
    pub sign: i8,
    pub start: usize,
    pub len: usize,
}

impl SignRun {
    pub fn end(&self) -> usize {
        self.start + self.len - 1
    }
}

/// Partition a series into maximal constant-sign runs
pub fn sign_runs(values: &[f64]) -> Vec<SignRun> {
    let mut runs: Vec<SignRun> = Vec::new();

    for (i, &v) in values.iter().enumerate() {
        let s = sign(v);
        match runs.last_mut() {
            Some(run) if run.sign == s => run.len += 1,
            _ => runs.push(SignRun {
                sign: s,
                start: i,
                len: 1,
            }),
        }
    }

    runs
}

/// Sign changes between adjacent runs that both persist for `min_run` strikes
pub fn histogram_flip_candidates(
    strikes: &[f64],
    values: &[f64],
    min_run: usize,
) -> Vec<FlipCandidate> {
    let n = strikes.len().min(values.len());
    let runs = sign_runs(&values[..n]);

    runs.windows(2)
        .filter(|pair| {
            let (left, right) = (pair[0], pair[1]);
            left.sign != 0 && right.sign != 0 && left.len >= min_run && right.len >= min_run
        })
        .map(|pair| {
            let i = pair[0].end();
            FlipCandidate {
                index: i,
                value: interpolate_zero(strikes[i], strikes[i + 1], values[i], values[i + 1]),
            }
        })
        .collect()
}

/// Run-filtered flip of a strike series nearest to spot
pub fn find_histogram_flip(
    strikes: &[f64],
    values: &[f64],
    spot: f64,
    min_run: usize,
) -> Option<f64> {
    closest_to_spot(&histogram_flip_candidates(strikes, values, min_run), spot).map(|c| c.value)
}

/// Point-in-time exposure summed per unique strike (ascending)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrikeHistogram {
    pub strikes: Vec<f64>,
    pub delta: Vec<f64>,
    pub gamma: Vec<f64>,
    pub vanna: Vec<f64>,
    pub charm: Vec<f64>,
}

impl StrikeHistogram {
    /// Sum per-contract totals by strike, keeping strikes in `[from, to]`
    pub fn from_exposures(exposures: &ExposureTable, from_strike: f64, to_strike: f64) -> Self {
        let strikes = &exposures.contracts.strike_price;
        let mut order: Vec<usize> = (0..strikes.len())
            .filter(|&i| strikes[i] >= from_strike && strikes[i] <= to_strike)
            .collect();
        order.sort_by(|&a, &b| strikes[a].total_cmp(&strikes[b]));

        let mut hist = StrikeHistogram::default();
        for i in order {
            let k = strikes[i];
            if hist.strikes.last() != Some(&k) {
                hist.strikes.push(k);
                hist.delta.push(0.0);
                hist.gamma.push(0.0);
                hist.vanna.push(0.0);
                hist.charm.push(0.0);
            }
            let last = hist.strikes.len() - 1;
            hist.delta[last] += exposures.total_delta[i];
            hist.gamma[last] += exposures.total_gamma[i];
            hist.vanna[last] += exposures.total_vanna[i];
            hist.charm[last] += exposures.total_charm[i];
        }

        hist
    }

    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    pub fn series(&self, kind: GreekKind) -> &[f64] {
        match kind {
            GreekKind::Delta => &self.delta,
            GreekKind::Gamma => &self.gamma,
            GreekKind::Vanna => &self.vanna,
            GreekKind::Charm => &self.charm,
        }
    }

    /// Run-filtered flip for one Greek
    pub fn flip(&self, kind: GreekKind, spot: f64, min_run: usize) -> Option<f64> {
        find_histogram_flip(&self.strikes, self.series(kind), spot, min_run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strikes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 90.0 + i as f64).collect()
    }

    #[test]
    fn test_sign_runs() {
        let runs = sign_runs(&[1.0, 2.0, -1.0, 0.0, 0.0, 3.0]);
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0], SignRun { sign: 1, start: 0, len: 2 });
        assert_eq!(runs[1], SignRun { sign: -1, start: 2, len: 1 });
        assert_eq!(runs[2], SignRun { sign: 0, start: 3, len: 2 });
        assert_eq!(runs[3].end(), 5);
        assert!(sign_runs(&[]).is_empty());
    }

    #[test]
    fn test_single_strike_outlier_rejected() {
        // One noisy negative bar inside a positive region
        let values = [-3.0, -2.0, -1.0, 4.0, 5.0, -9.0, 6.0, 7.0];
        let k = strikes(values.len());

        let candidates = histogram_flip_candidates(&k, &values, 2);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].index, 2);

        // Naive adjacent scan would have found the outlier near strike 95
        let flip = find_histogram_flip(&k, &values, 95.0, 2).unwrap();
        assert!((flip - (93.0 - 1.0 * 4.0 / 5.0)).abs() < 1e-12);
    }

    #[test]
    fn test_persistent_flip_reported() {
        let values = [5.0, 4.0, -2.0, -3.0];
        let k = strikes(values.len());
        let flip = find_histogram_flip(&k, &values, 91.0, 2).unwrap();
        assert!(k[1] <= flip && flip <= k[2]);
        assert!((flip - (92.0 - (-2.0) / (-2.0 - 4.0))).abs() < 1e-12);
    }

    #[test]
    fn test_zero_runs_block_flips() {
        let values = [1.0, 1.0, 0.0, 0.0, -1.0, -1.0];
        assert_eq!(find_histogram_flip(&strikes(6), &values, 92.0, 2), None);
    }

    #[test]
    fn test_short_edge_runs_rejected() {
        let values = [-1.0, 2.0, 3.0, 4.0, -5.0];
        assert_eq!(find_histogram_flip(&strikes(5), &values, 92.0, 2), None);
        // With a looser filter both edges count
        assert_eq!(histogram_flip_candidates(&strikes(5), &values, 1).len(), 2);
    }

    #[test]
    fn test_nan_spot_has_no_flip() {
        let values = [5.0, 4.0, -2.0, -3.0];
        assert_eq!(find_histogram_flip(&strikes(4), &values, f64::NAN, 2), None);
    }

    #[test]
    fn test_closest_candidate_wins() {
        let values = [1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0];
        let k = strikes(values.len());
        let near_low = find_histogram_flip(&k, &values, 90.0, 2).unwrap();
        let near_high = find_histogram_flip(&k, &values, 97.0, 2).unwrap();
        assert!((near_low - 91.5).abs() < 1e-12);
        assert!((near_high - 95.5).abs() < 1e-12);
    }
}
