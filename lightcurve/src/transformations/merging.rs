//! Merge rows of a previously produced light curve into the current one.

use log::info;
use polars::prelude::*;

use super::seasons::SeasonTable;
use super::sorting::sort_by_band_and_date;
use crate::core::columns::{
    f64_values, has_column, str_values, BAND, MAG, MAG_ERR, MJD_OBS, SEASON,
};
use crate::error::{PipelineError, PipelineResult};

/// Result of a historical merge
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub frame: DataFrame,
    /// Historical rows pulled into the light curve
    pub merged_rows: usize,
}

/// Union the current light curve with the historical rows that fall inside
/// the `missing_seasons`, then re-sort by band and date.
///
/// Historical rows outside the missing seasons are never pulled in, so data
/// already present in the current table is not counted twice. Rows in a band
/// not listed in `bands` are skipped as well. When the
/// current table carries a `SEASON` column, merged rows are labelled with the
/// missing season they fall in.
///
/// # Errors
/// `Configuration` if a missing season is not in `table`. A historical table
/// without the light-curve columns fails with a table error; the loaders
/// check the layout before it gets here.
pub fn merge_historical(
    current: &DataFrame,
    historical: &DataFrame,
    missing_seasons: &[String],
    table: &SeasonTable,
    bands: &[String],
) -> PipelineResult<MergeOutcome> {
    let missing = missing_seasons
        .iter()
        .map(|label| {
            table.get(label).ok_or_else(|| {
                PipelineError::Configuration(format!("missing season '{label}' is not defined"))
            })
        })
        .collect::<PipelineResult<Vec<_>>>()?;

    let hist_mjd = f64_values(historical, MJD_OBS)?;
    let hist_mag = f64_values(historical, MAG)?;
    let hist_err = f64_values(historical, MAG_ERR)?;
    let hist_band = str_values(historical, BAND)?;

    let mut mjd = f64_values(current, MJD_OBS)?;
    let mut mag = f64_values(current, MAG)?;
    let mut mag_err = f64_values(current, MAG_ERR)?;
    let mut band = str_values(current, BAND)?;
    let mut season = if has_column(current, SEASON) {
        Some(str_values(current, SEASON)?)
    } else {
        None
    };

    let mut merged_rows = 0usize;
    for row in 0..historical.height() {
        let Some(date) = hist_mjd[row] else { continue };
        let Some(matched) = missing.iter().find(|s| s.contains_mjd(date)) else {
            continue;
        };
        let Some(row_band) = hist_band[row].as_deref() else { continue };
        if !bands.iter().any(|b| b.as_str() == row_band) {
            continue;
        }
        mjd.push(Some(date));
        mag.push(hist_mag[row]);
        mag_err.push(hist_err[row]);
        band.push(hist_band[row].clone());
        if let Some(season) = season.as_mut() {
            season.push(Some(matched.label.clone()));
        }
        merged_rows += 1;
    }

    let mut columns = vec![
        Column::new(MJD_OBS.into(), mjd),
        Column::new(MAG.into(), mag),
        Column::new(MAG_ERR.into(), mag_err),
        Column::new(BAND.into(), band),
    ];
    if let Some(season) = season {
        columns.push(Column::new(SEASON.into(), season));
    }
    let combined = DataFrame::new(columns)?;
    let frame = sort_by_band_and_date(&combined, bands)?;

    let ranges: Vec<String> = missing.iter().map(|s| s.to_string()).collect();
    info!(
        "Historical merge: {} row(s) from season(s) {}",
        merged_rows,
        ranges.join(", ")
    );
    Ok(MergeOutcome { frame, merged_rows })
}
