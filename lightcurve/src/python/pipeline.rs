use pyo3::prelude::*;
use std::path::Path;

use crate::core::frame::frame_to_points;
use crate::preprocessing::pipeline::process_catalog;

/// Process one raw catalog file with a TOML configuration.
///
/// Returns the light curve as `(mjd, mag, mag_err, band)` tuples and the run
/// report as a JSON string.
#[pyfunction]
pub fn py_process_catalog(
    catalog_path: String,
    config_path: String,
) -> PyResult<(Vec<(f64, f64, f64, String)>, String)> {
    let output = process_catalog(Path::new(&catalog_path), Path::new(&config_path))
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(format!("{:#}", e)))?;

    let points = frame_to_points(&output.light_curve, &output.report.source_id)
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))?;
    let rows = points
        .into_iter()
        .map(|p| (p.mjd, p.mag, p.mag_err, p.band))
        .collect();

    let report = serde_json::to_string(&output.report).map_err(|e| {
        pyo3::exceptions::PyRuntimeError::new_err(format!("Failed to serialize report: {}", e))
    })?;
    Ok((rows, report))
}
