use polars::prelude::*;

use crate::core::columns::{f64_values, str_values, BAND, MJD_OBS};
use crate::error::PipelineResult;

/// Row order grouping rows by band (in `bands` order) and by ascending date
/// within each band. Ties keep their original order. Rows whose band is not
/// listed are left out.
pub fn band_date_order(df: &DataFrame, bands: &[String]) -> PipelineResult<Vec<IdxSize>> {
    let band = str_values(df, BAND)?;
    let mjd = f64_values(df, MJD_OBS)?;

    let mut order = Vec::with_capacity(df.height());
    for wanted in bands {
        let mut rows: Vec<usize> = band
            .iter()
            .enumerate()
            .filter(|(_, b)| b.as_deref() == Some(wanted.as_str()))
            .map(|(row, _)| row)
            .collect();
        rows.sort_by(|&a, &b| {
            let (a, b) = (mjd[a].unwrap_or(f64::NAN), mjd[b].unwrap_or(f64::NAN));
            a.total_cmp(&b)
        });
        order.extend(rows.into_iter().map(|row| row as IdxSize));
    }
    Ok(order)
}

/// Sort a table by band (in the given order), then by date within each band.
///
/// The sort is stable, so sorting an already sorted table is a no-op.
pub fn sort_by_band_and_date(df: &DataFrame, bands: &[String]) -> PipelineResult<DataFrame> {
    let order = band_date_order(df, bands)?;
    let idx = IdxCa::from_vec("order".into(), order);
    Ok(df.take(&idx)?)
}
