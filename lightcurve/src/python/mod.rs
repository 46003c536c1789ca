//! Python bindings for the light-curve pipeline.
//!
//! Built with the `python` feature. The functions are available in the
//! `ozdes_lightcurve` Python module after installation.
//!
//! # Modules
//!
//! - [`photometry`]: Flux to magnitude conversion
//! - [`pipeline`]: Whole-file light-curve processing

pub mod photometry;
pub mod pipeline;

pub use photometry::*;
pub use pipeline::*;
