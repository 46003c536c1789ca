use pyo3::prelude::*;

use crate::photometry::magnitude;

/// Magnitudes of parallel flux and zeropoint lists
#[pyfunction]
pub fn py_flux_to_mag(flux: Vec<f64>, zeropoint: Vec<f64>) -> PyResult<Vec<f64>> {
    magnitude::flux_to_mag(&flux, &zeropoint)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Magnitude errors `mag(flux) - mag(flux + flux_err)`
#[pyfunction]
pub fn py_magnitude_errors(
    flux: Vec<f64>,
    flux_err: Vec<f64>,
    zeropoint: Vec<f64>,
) -> PyResult<Vec<f64>> {
    magnitude::magnitude_errors(&flux, &flux_err, &zeropoint)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}
