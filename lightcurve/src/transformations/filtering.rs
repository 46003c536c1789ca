//! Row-level quality filtering of raw catalog detections.

use log::{debug, info};
use polars::prelude::*;

use crate::core::columns::{
    f64_values, str_values, BAND, FLAGS, FLUXERR_AUTO, FLUX_AUTO, LIGHT_CURVE_COLUMNS, MAG,
    MAG_ERR, MAG_ZERO, MJD_OBS,
};
use crate::error::PipelineResult;
use crate::photometry::{flux_to_mag_single, BAD_ZEROPOINT_SENTINEL};

/// Zeropoints at or below this value mark a failed calibration
pub const MIN_ZEROPOINT: f64 = -1000.0;

/// Detections flagged at or above this value are rejected. Flags 1-3 are
/// kept: dropping them leaves very sparse light curves and the data is fine.
pub const MAX_QUALITY_FLAG: f64 = 4.0;

/// Returns `true` if a raw detection passes every quality cut.
///
/// A missing value in any of the inspected columns fails the cut.
pub fn passes_quality_cuts(
    mjd: Option<f64>,
    zeropoint: Option<f64>,
    flux: Option<f64>,
    flags: Option<f64>,
) -> bool {
    match (mjd, zeropoint, flux, flags) {
        (Some(mjd), Some(zp), Some(flux), Some(flags)) => {
            mjd > 0.0 && zp > MIN_ZEROPOINT && flux > 0.0 && flags < MAX_QUALITY_FLAG
        }
        _ => false,
    }
}

/// Restrict a raw catalog table to accepted bands and rows passing the
/// quality cuts. The column layout is unchanged.
pub fn apply_quality_cuts(df: &DataFrame, bands: &[String]) -> PipelineResult<DataFrame> {
    let band = str_values(df, BAND)?;
    let mjd = f64_values(df, MJD_OBS)?;
    let zeropoint = f64_values(df, MAG_ZERO)?;
    let flux = f64_values(df, FLUX_AUTO)?;
    let flags = f64_values(df, FLAGS)?;

    let keep: Vec<bool> = (0..df.height())
        .map(|i| {
            let accepted_band = band[i]
                .as_deref()
                .map(|b| bands.iter().any(|accepted| accepted == b))
                .unwrap_or(false);
            accepted_band && passes_quality_cuts(mjd[i], zeropoint[i], flux[i], flags[i])
        })
        .collect();

    let mask = BooleanChunked::from_slice("quality".into(), &keep);
    let filtered = df.filter(&mask)?;
    debug!(
        "Quality cuts kept {} of {} detections",
        filtered.height(),
        df.height()
    );
    Ok(filtered)
}

/// Filter a raw catalog table and convert it to calibrated magnitudes.
///
/// Applies [`apply_quality_cuts`], computes `MAG` and `MAG_ERR`, then drops
/// rows whose magnitude equals the bad-zeropoint sentinel (99). Returns the
/// light-curve columns `MJD_OBS`, `MAG`, `MAG_ERR`, `BAND`.
pub fn quality_filter(df: &DataFrame, bands: &[String]) -> PipelineResult<DataFrame> {
    let mut cut = apply_quality_cuts(df, bands)?;

    let flux = f64_values(&cut, FLUX_AUTO)?;
    let flux_err = f64_values(&cut, FLUXERR_AUTO)?;
    let zeropoint = f64_values(&cut, MAG_ZERO)?;

    let (mags, mag_errs): (Vec<f64>, Vec<f64>) = flux
        .iter()
        .zip(&flux_err)
        .zip(&zeropoint)
        .map(|((flux, flux_err), zp)| {
            let flux = flux.unwrap_or(f64::NAN);
            let zp = zp.unwrap_or(f64::NAN);
            let mag = flux_to_mag_single(flux, zp);
            let mag_err = mag - flux_to_mag_single(flux + flux_err.unwrap_or(f64::NAN), zp);
            (mag, mag_err)
        })
        .unzip();

    let not_sentinel: Vec<bool> = mags.iter().map(|&m| m != BAD_ZEROPOINT_SENTINEL).collect();

    let mjd: Vec<Option<f64>> = f64_values(&cut, MJD_OBS)?;
    let band: Vec<Option<String>> = str_values(&cut, BAND)?;
    cut.with_column(Column::new(MJD_OBS.into(), mjd))?;
    cut.with_column(Column::new(BAND.into(), band))?;
    cut.with_column(Column::new(MAG.into(), mags))?;
    cut.with_column(Column::new(MAG_ERR.into(), mag_errs))?;

    let mask = BooleanChunked::from_slice("sentinel".into(), &not_sentinel);
    let cleaned = cut.filter(&mask)?.select(LIGHT_CURVE_COLUMNS)?;

    info!(
        "Quality filter: {} raw detections -> {} calibrated points",
        df.height(),
        cleaned.height()
    );
    Ok(cleaned)
}
