//! Flux to magnitude conversion.
//!
//! - [`magnitude`]: zeropoint-calibrated magnitudes and their asymmetric errors

pub mod magnitude;

pub use magnitude::{flux_to_mag, flux_to_mag_single, magnitude_errors, BAD_ZEROPOINT_SENTINEL};
