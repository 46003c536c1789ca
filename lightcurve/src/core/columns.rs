//! Column names of the catalog and light-curve tables, and typed access to them.

use polars::prelude::*;

/// Observation date (MJD)
pub const MJD_OBS: &str = "MJD_OBS";
/// Passband label
pub const BAND: &str = "BAND";
/// Instrumental flux
pub const FLUX_AUTO: &str = "FLUX_AUTO";
/// Instrumental flux uncertainty
pub const FLUXERR_AUTO: &str = "FLUXERR_AUTO";
/// Photometric zeropoint
pub const MAG_ZERO: &str = "MAG_ZERO";
/// Source extractor quality flags
pub const FLAGS: &str = "FLAGS";

/// Calibrated magnitude
pub const MAG: &str = "MAG";
/// Magnitude uncertainty
pub const MAG_ERR: &str = "MAG_ERR";
/// Observing season label
pub const SEASON: &str = "SEASON";

/// Columns every raw catalog table must provide.
pub const RAW_COLUMNS: [&str; 6] = [MJD_OBS, BAND, FLUX_AUTO, FLUXERR_AUTO, MAG_ZERO, FLAGS];

/// Numeric columns of the raw catalog table.
pub const RAW_NUMERIC_COLUMNS: [&str; 5] = [MJD_OBS, FLUX_AUTO, FLUXERR_AUTO, MAG_ZERO, FLAGS];

/// Columns of a light curve, both as produced by the pipeline and as read from
/// a historical light-curve file.
pub const LIGHT_CURVE_COLUMNS: [&str; 4] = [MJD_OBS, MAG, MAG_ERR, BAND];

/// Values of a column as `f64`, casting integer or string columns.
///
/// Values that cannot be cast come back as `None`.
pub fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

/// Values of a column as owned strings.
pub fn str_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_owned))
        .collect())
}

/// Returns `true` if the frame has a column with this name
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}
