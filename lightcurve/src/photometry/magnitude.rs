//! Magnitude conversion for zeropoint-calibrated fluxes.
//!
//! `mag = zp - 2.5 log10(flux)`. Nothing here guards against non-positive
//! flux: the quality filter removes those rows before conversion, and a
//! non-positive flux yields `NaN` or `inf` exactly as `log10` does.

use crate::error::{PipelineError, PipelineResult};

/// Magnitude value the catalog reports for exposures with a known
/// bad-zeropoint artifact. Rows converting to exactly this value are dropped.
pub const BAD_ZEROPOINT_SENTINEL: f64 = 99.0;

/// Magnitude of a single flux measurement.
///
/// # Example
/// ```
/// use ozdes_lightcurve::photometry::flux_to_mag_single;
/// let mag = flux_to_mag_single(100.0, 30.0);
/// assert!((mag - 25.0).abs() < 1e-12);
/// ```
#[inline]
pub fn flux_to_mag_single(flux: f64, zeropoint: f64) -> f64 {
    zeropoint - 2.5 * flux.log10()
}

/// Element-wise magnitudes of parallel flux and zeropoint sequences.
///
/// # Errors
/// `MalformedInput` when the sequences differ in length.
pub fn flux_to_mag(flux: &[f64], zeropoint: &[f64]) -> PipelineResult<Vec<f64>> {
    ensure_same_len("flux", flux.len(), "zeropoint", zeropoint.len())?;
    Ok(flux
        .iter()
        .zip(zeropoint)
        .map(|(&f, &zp)| flux_to_mag_single(f, zp))
        .collect())
}

/// Magnitude errors approximated as `mag(flux) - mag(flux + flux_err)`.
///
/// This is not a symmetric Gaussian propagation. A negative `flux_err` yields
/// a negative error, and it is kept that way.
pub fn magnitude_errors(
    flux: &[f64],
    flux_err: &[f64],
    zeropoint: &[f64],
) -> PipelineResult<Vec<f64>> {
    ensure_same_len("flux", flux.len(), "flux error", flux_err.len())?;
    ensure_same_len("flux", flux.len(), "zeropoint", zeropoint.len())?;
    Ok(flux
        .iter()
        .zip(flux_err)
        .zip(zeropoint)
        .map(|((&f, &df), &zp)| flux_to_mag_single(f, zp) - flux_to_mag_single(f + df, zp))
        .collect())
}

fn ensure_same_len(left: &str, left_len: usize, right: &str, right_len: usize) -> PipelineResult<()> {
    if left_len != right_len {
        return Err(PipelineError::malformed(
            "magnitude conversion",
            format!("{left} has {left_len} values but {right} has {right_len}"),
        ));
    }
    Ok(())
}
