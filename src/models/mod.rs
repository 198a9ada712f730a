//! Pricing Models
//!
//! Implements:
//! - Black-Scholes scalar Greeks (reference and chain fallback)
//! - Vectorized exposure model over a spot × contract grid

pub mod black_scholes;
pub mod exposure_model;

pub use black_scholes::{greeks, norm_cdf, norm_pdf};
pub use exposure_model::*;
