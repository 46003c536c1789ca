//! Light-curve algorithms.
//!
//! # Components
//!
//! - [`coadd`]: Night-level inverse-variance coaddition with calibration floors
//! - [`analysis`]: Per-band summary statistics of a finished light curve
//!
//! # Example
//!
//! ```no_run
//! use ozdes_lightcurve::algorithms::{CalibrationCorrection, NightCoadder};
//! use polars::prelude::*;
//!
//! # fn example(sorted: &DataFrame) -> ozdes_lightcurve::error::PipelineResult<()> {
//! let coadder = NightCoadder::new(CalibrationCorrection::des());
//! let light_curve = coadder.coadd_frame(sorted, "2925344776")?;
//! println!("{} nights", light_curve.height());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod coadd;

pub use analysis::{summarize_bands, BandSummary};
pub use coadd::{CalibrationCorrection, NightCoadder, DES_CALIBRATION_FLOORS};
