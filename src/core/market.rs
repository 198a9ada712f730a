//! Market scalars supplied alongside a chain snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rates the engine takes as given
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketScalars {
    /// Risk-free yield (e.g. SOFR), annualized decimal
    pub risk_free_yield: f64,
    /// Dividend yield, annualized decimal. Defaults to 0 when unavailable.
    pub dividend_yield: f64,
}

impl MarketScalars {
    pub fn new(risk_free_yield: f64, dividend_yield: f64) -> Self {
        Self {
            risk_free_yield,
            dividend_yield,
        }
    }

    /// Fall back to a zero dividend yield when the lookup came back empty
    pub fn with_optional_dividend(risk_free_yield: f64, dividend_yield: Option<f64>) -> Self {
        Self::new(risk_free_yield, dividend_yield.unwrap_or(0.0))
    }
}

/// Evaluation timestamp, raw and display-formatted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTime {
    pub timestamp: DateTime<Utc>,
    pub formatted: String,
}

impl EvaluationTime {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            formatted: timestamp.format("%Y %b %d, %I:%M %p UTC").to_string(),
        }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }
}
