//! Flip point location on spot-grid exposure profiles
//!
//! A flip is a zero crossing of a net exposure curve. Every sign change
//! between consecutive grid points is a candidate; the zero is linearly
//! interpolated inside its bracket and the candidate nearest the real spot
//! wins.

use serde::{Deserialize, Serialize};

/// A sign change between `x[index]` and `x[index + 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipCandidate {
    /// Left index of the bracketing pair
    pub index: usize,
    /// Interpolated zero crossing
    pub value: f64,
}

/// Sign as -1, 0 or +1. NaN counts as 0.
pub fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Zero of the line through `(x0, y0)` and `(x1, y1)`
///
/// `x1 − (x1 − x0)·y1/(y1 − y0)`. Callers only pass pairs with differing
/// signs, so `y1 != y0`.
pub fn interpolate_zero(x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    x1 - (x1 - x0) * y1 / (y1 - y0)
}

/// Every sign-change pair of `curve` along `levels`, left to right
pub fn flip_candidates(levels: &[f64], curve: &[f64]) -> Vec<FlipCandidate> {
    let n = levels.len().min(curve.len());
    if n < 2 {
        return Vec::new();
    }

    (0..n - 1)
        .filter(|&i| sign(curve[i]) != sign(curve[i + 1]))
        .map(|i| FlipCandidate {
            index: i,
            value: interpolate_zero(levels[i], levels[i + 1], curve[i], curve[i + 1]),
        })
        .collect()
}

/// Candidate closest to spot; the earliest wins an exact tie. `None` for a
/// non-finite spot.
pub fn closest_to_spot(candidates: &[FlipCandidate], spot: f64) -> Option<FlipCandidate> {
    if !spot.is_finite() {
        return None;
    }
    let mut best: Option<FlipCandidate> = None;
    for &c in candidates {
        match best {
            Some(b) if (c.value - spot).abs() >= (b.value - spot).abs() => {}
            _ => best = Some(c),
        }
    }
    best
}

/// Flip candidate of a profile curve nearest to spot
pub fn locate_flip(levels: &[f64], curve: &[f64], spot: f64) -> Option<FlipCandidate> {
    closest_to_spot(&flip_candidates(levels, curve), spot)
}

/// Interpolated flip level of a profile curve, `None` if single-signed
pub fn find_flip(levels: &[f64], curve: &[f64], spot: f64) -> Option<f64> {
    locate_flip(levels, curve, spot).map(|c| c.value)
}
