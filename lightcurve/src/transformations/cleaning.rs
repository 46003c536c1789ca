use log::{debug, info};
use polars::prelude::*;
use std::collections::HashMap;

use crate::core::columns::{f64_values, str_values, BAND, MAG, SEASON};
use crate::error::{PipelineError, PipelineResult};

/// Remove outliers per (season, band) group.
///
/// For every listed season and band with at least one member, the arithmetic
/// mean magnitude of the group is computed and rows deviating from it by
/// `threshold` magnitudes or more are dropped. Rows whose season or band is
/// not listed pass through unfiltered, as do groups with no finite
/// magnitude. Inside a group with a mean, a `NaN` magnitude is dropped.
pub fn reject_outliers(
    df: &DataFrame,
    seasons: &[String],
    bands: &[String],
    threshold: f64,
) -> PipelineResult<DataFrame> {
    if !(threshold > 0.0) {
        return Err(PipelineError::Configuration(format!(
            "outlier threshold must be positive, got {threshold}"
        )));
    }

    let season = str_values(df, SEASON)?;
    let band = str_values(df, BAND)?;
    let mag = f64_values(df, MAG)?;

    let groups: Vec<Option<(&str, &str)>> = season
        .iter()
        .zip(&band)
        .map(|(season, band)| {
            let (season, band) = (season.as_deref()?, band.as_deref()?);
            let listed = seasons.iter().any(|s| s == season) && bands.iter().any(|b| b == band);
            listed.then_some((season, band))
        })
        .collect();

    // (sum, count) of finite magnitudes per group
    let mut totals: HashMap<(&str, &str), (f64, usize)> = HashMap::new();
    for (group, m) in groups.iter().zip(&mag) {
        if let (Some(group), Some(m)) = (*group, *m) {
            if !m.is_nan() {
                let entry = totals.entry(group).or_insert((0.0, 0));
                entry.0 += m;
                entry.1 += 1;
            }
        }
    }
    let means: HashMap<(&str, &str), f64> = totals
        .into_iter()
        .map(|(group, (sum, count))| (group, sum / count as f64))
        .collect();
    for ((season, band), mean) in &means {
        debug!("Season {} band {}: mean magnitude {:.4}", season, band, mean);
    }

    let keep: Vec<bool> = groups
        .iter()
        .zip(&mag)
        .map(|(group, m)| {
            let score = match group.and_then(|g| means.get(&g)) {
                Some(mean) => (m.unwrap_or(f64::NAN) - mean).abs(),
                None => 0.0,
            };
            score < threshold
        })
        .collect();

    let mask = BooleanChunked::from_slice("inlier".into(), &keep);
    let filtered = df.filter(&mask)?;
    info!(
        "Outlier rejection (threshold {} mag): dropped {} of {} rows",
        threshold,
        df.height() - filtered.height(),
        df.height()
    );
    Ok(filtered)
}
