//! OzDES photometric light-curve pipeline.
//!
//! Turns raw DES single-epoch detections of a reverberation-mapping source
//! into a cleaned, night-coadded light curve: magnitude conversion, quality
//! cuts, season classification, outlier rejection, sorting, an optional merge
//! with an earlier light curve, and inverse-variance coaddition per night.

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod algorithms;
pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod photometry;
pub mod preprocessing;
#[cfg(feature = "python")]
pub mod python;
pub mod time;
pub mod transformations;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use preprocessing::{LightCurvePipeline, PipelineOutput, PipelineReport};

/// OzDES light curves - photometry pipeline for reverberation mapping
#[cfg(feature = "python")]
#[pymodule]
fn ozdes_lightcurve(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Photometry
    m.add_function(wrap_pyfunction!(python::py_flux_to_mag, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_magnitude_errors, m)?)?;

    // Pipeline
    m.add_function(wrap_pyfunction!(python::py_process_catalog, m)?)?;

    Ok(())
}
