use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::columns::{f64_values, str_values, BAND, MAG, MAG_ERR, MJD_OBS};
use crate::error::PipelineResult;

/// Summary statistics of one band of a light curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSummary {
    pub band: String,
    pub points: usize,
    pub first_mjd: f64,
    pub last_mjd: f64,
    pub mean_mag: f64,
    pub std_mag: f64,
    pub median_mag_err: f64,
}

/// Compute per-band statistics of a light curve
///
/// # Arguments
/// * `df` - Light curve with `MJD_OBS`, `MAG`, `MAG_ERR`, `BAND`
/// * `bands` - Bands to report, in output order
///
/// # Returns
/// One summary per band that has at least one point
pub fn summarize_bands(df: &DataFrame, bands: &[String]) -> PipelineResult<Vec<BandSummary>> {
    let band = str_values(df, BAND)?;
    let mjd = f64_values(df, MJD_OBS)?;
    let mag = f64_values(df, MAG)?;
    let mag_err = f64_values(df, MAG_ERR)?;

    let mut summaries = Vec::new();
    for wanted in bands {
        let rows: Vec<usize> = (0..df.height())
            .filter(|&i| band[i].as_deref() == Some(wanted.as_str()))
            .collect();
        if rows.is_empty() {
            continue;
        }

        let dates: Vec<f64> = rows.iter().filter_map(|&i| mjd[i]).collect();
        let mags: Vec<f64> = rows.iter().filter_map(|&i| mag[i]).collect();
        let mut errs: Vec<f64> = rows.iter().filter_map(|&i| mag_err[i]).collect();

        let n = mags.len() as f64;
        let mean_mag = mags.iter().sum::<f64>() / n;
        let std_mag = (mags.iter().map(|m| (m - mean_mag).powi(2)).sum::<f64>() / n).sqrt();

        summaries.push(BandSummary {
            band: wanted.clone(),
            points: rows.len(),
            first_mjd: dates.iter().cloned().fold(f64::INFINITY, f64::min),
            last_mjd: dates.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            mean_mag,
            std_mag,
            median_mag_err: median(&mut errs),
        });
    }
    Ok(summaries)
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_bands() {
        let df = df!(
            MJD_OBS => [100.2, 105.3, 110.1, 100.4],
            MAG => [20.0, 21.0, 22.0, 18.0],
            MAG_ERR => [0.1, 0.3, 0.2, 0.05],
            BAND => ["g", "g", "g", "r"]
        )
        .unwrap();

        let bands = vec!["g".to_string(), "r".to_string(), "i".to_string()];
        let summaries = summarize_bands(&df, &bands).unwrap();
        assert_eq!(summaries.len(), 2);

        let g = &summaries[0];
        assert_eq!(g.band, "g");
        assert_eq!(g.points, 3);
        assert_eq!(g.first_mjd, 100.2);
        assert_eq!(g.last_mjd, 110.1);
        assert!((g.mean_mag - 21.0).abs() < 1e-12);
        assert!((g.std_mag - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((g.median_mag_err - 0.2).abs() < 1e-12);

        assert_eq!(summaries[1].band, "r");
        assert_eq!(summaries[1].points, 1);
    }
}
