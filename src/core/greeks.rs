//! Option Greeks
//!
//! The sensitivities that feed dealer exposure: delta and gamma (spot),
//! vanna (spot/vol cross) and charm (delta decay).

use serde::{Deserialize, Serialize};

/// Option Greeks used for exposure
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS
    pub delta: f64,
    /// Gamma: d²V/dS²
    pub gamma: f64,
    /// Vanna: d²V/dSdσ
    pub vanna: f64,
    /// Charm: d²V/dSdt (per year)
    pub charm: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, vanna: f64, charm: f64) -> Self {
        Self {
            delta,
            gamma,
            vanna,
            charm,
        }
    }

    pub fn get(&self, kind: GreekKind) -> f64 {
        match kind {
            GreekKind::Delta => self.delta,
            GreekKind::Gamma => self.gamma,
            GreekKind::Vanna => self.vanna,
            GreekKind::Charm => self.charm,
        }
    }
}

/// Which exposure a curve or series carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GreekKind {
    Delta,
    Gamma,
    Vanna,
    Charm,
}

impl GreekKind {
    pub const ALL: [GreekKind; 4] = [
        GreekKind::Delta,
        GreekKind::Gamma,
        GreekKind::Vanna,
        GreekKind::Charm,
    ];

    /// Short exposure label ("DEX", "GEX", ...)
    pub fn exposure_label(&self) -> &'static str {
        match self {
            GreekKind::Delta => "DEX",
            GreekKind::Gamma => "GEX",
            GreekKind::Vanna => "VEX",
            GreekKind::Charm => "CEX",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_kind() {
        let g = Greeks::new(0.5, 0.02, -0.1, 0.3);
        let values: Vec<f64> = GreekKind::ALL.iter().map(|&k| g.get(k)).collect();
        assert_eq!(values, vec![0.5, 0.02, -0.1, 0.3]);
        assert_eq!(GreekKind::Vanna.exposure_label(), "VEX");
    }
}
