//! Core data types for the exposure engine
//!
//! Defines fundamental types:
//! - ContractRecord / ContractTable: chain snapshot rows and columns
//! - OptionSide / ExpiryScope
//! - Greeks, MarketScalars, EvaluationTime
//! - Expiration calendar helpers

pub mod calendar;
pub mod chain;
pub mod error;
pub mod greeks;
pub mod market;
pub mod option;

pub use chain::*;
pub use error::*;
pub use greeks::*;
pub use market::*;
pub use option::*;
