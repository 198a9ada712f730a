//! Option side and expiry-scope definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ExposureError;

/// Option side (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    Call,
    Put,
}

/// Which slice of the chain an invocation was asked to cover.
///
/// Parsed from the tags `"0dte"`, `"<n>dte"` and `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpiryScope {
    /// Same-day expirations only
    ZeroDte,
    /// Expirations up to `n` days out
    Dte(u32),
    /// Every expiration in the chain
    All,
}

impl ExpiryScope {
    /// Whether the next-expiry curve is populated
    pub fn has_next_expiry(&self) -> bool {
        !matches!(self, ExpiryScope::ZeroDte)
    }

    /// Whether the up-to-monthly-opex curve is populated
    pub fn has_monthly(&self) -> bool {
        matches!(self, ExpiryScope::All)
    }
}

impl fmt::Display for ExpiryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryScope::ZeroDte => write!(f, "0dte"),
            ExpiryScope::Dte(n) => write!(f, "{}dte", n),
            ExpiryScope::All => write!(f, "all"),
        }
    }
}

impl FromStr for ExpiryScope {
    type Err = ExposureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        if tag == "all" {
            return Ok(ExpiryScope::All);
        }

        let days = tag
            .strip_suffix("dte")
            .and_then(|n| n.parse::<u32>().ok())
            .ok_or_else(|| ExposureError::invalid_input(format!("Unknown expiry scope: {}", s)))?;

        Ok(if days == 0 {
            ExpiryScope::ZeroDte
        } else {
            ExpiryScope::Dte(days)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parsing() {
        assert_eq!("0dte".parse::<ExpiryScope>().unwrap(), ExpiryScope::ZeroDte);
        assert_eq!("7dte".parse::<ExpiryScope>().unwrap(), ExpiryScope::Dte(7));
        assert_eq!("ALL".parse::<ExpiryScope>().unwrap(), ExpiryScope::All);
        assert!("weekly".parse::<ExpiryScope>().is_err());
        assert!("dte".parse::<ExpiryScope>().is_err());
    }

    #[test]
    fn test_scope_round_trip_display() {
        for tag in ["0dte", "3dte", "all"] {
            let scope: ExpiryScope = tag.parse().unwrap();
            assert_eq!(scope.to_string(), tag);
        }
    }

    #[test]
    fn test_scope_curves() {
        assert!(!ExpiryScope::ZeroDte.has_next_expiry());
        assert!(ExpiryScope::Dte(5).has_next_expiry());
        assert!(!ExpiryScope::Dte(5).has_monthly());
        assert!(ExpiryScope::All.has_monthly());
    }
}
