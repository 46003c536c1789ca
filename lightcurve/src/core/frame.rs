//! Conversions between light-curve DataFrames and typed rows.

use polars::prelude::*;

use super::columns::{f64_values, str_values, BAND, MAG, MAG_ERR, MJD_OBS};
use super::domain::{CoaddedPoint, PhotometryPoint};
use crate::error::{PipelineError, PipelineResult};

/// Convert a light-curve DataFrame (`MJD_OBS`, `MAG`, `MAG_ERR`, `BAND`) into
/// typed points, preserving row order.
///
/// # Errors
/// `MalformedInput` naming `source_id` if a column is missing or a row has a
/// null value.
pub fn frame_to_points(df: &DataFrame, source_id: &str) -> PipelineResult<Vec<PhotometryPoint>> {
    let mjd = f64_values(df, MJD_OBS)?;
    let mag = f64_values(df, MAG)?;
    let mag_err = f64_values(df, MAG_ERR)?;
    let band = str_values(df, BAND)?;

    mjd.into_iter()
        .zip(mag)
        .zip(mag_err)
        .zip(band)
        .enumerate()
        .map(|(row, (((mjd, mag), mag_err), band))| match (mjd, mag, mag_err, band) {
            (Some(mjd), Some(mag), Some(mag_err), Some(band)) => {
                Ok(PhotometryPoint::new(mjd, mag, mag_err, band))
            }
            _ => Err(PipelineError::malformed(
                source_id,
                format!("row {row} has a missing value"),
            )),
        })
        .collect()
}

/// Convert coadded points into the output light-curve DataFrame.
pub fn coadded_to_frame(points: &[CoaddedPoint]) -> PipelineResult<DataFrame> {
    let df = DataFrame::new(vec![
        Column::new(MJD_OBS.into(), points.iter().map(|p| p.mjd).collect::<Vec<_>>()),
        Column::new(MAG.into(), points.iter().map(|p| p.mag).collect::<Vec<_>>()),
        Column::new(MAG_ERR.into(), points.iter().map(|p| p.mag_err).collect::<Vec<_>>()),
        Column::new(
            BAND.into(),
            points.iter().map(|p| p.band.as_str()).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_points_preserves_order() {
        let df = df!(
            MJD_OBS => [100.1, 99.5],
            MAG => [20.0, 19.0],
            MAG_ERR => [0.1, 0.2],
            BAND => ["g", "r"]
        )
        .unwrap();
        let points = frame_to_points(&df, "2925344776").unwrap();
        assert_eq!(
            points,
            vec![
                PhotometryPoint::new(100.1, 20.0, 0.1, "g"),
                PhotometryPoint::new(99.5, 19.0, 0.2, "r"),
            ]
        );
    }

    #[test]
    fn test_coadded_to_frame_layout() {
        let df = coadded_to_frame(&[CoaddedPoint {
            mjd: 100.5,
            mag: 20.0,
            mag_err: 0.05,
            band: "g".to_string(),
            n_obs: 2,
        }])
        .unwrap();
        assert_eq!(df.height(), 1);
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec![MJD_OBS, MAG, MAG_ERR, BAND]);
    }

    #[test]
    fn test_null_value_is_malformed() {
        let df = df!(
            MJD_OBS => [Some(100.1), None],
            MAG => [20.0, 19.0],
            MAG_ERR => [0.1, 0.1],
            BAND => ["g", "g"]
        )
        .unwrap();
        match frame_to_points(&df, "2925344776").unwrap_err() {
            PipelineError::MalformedInput { source_id, reason } => {
                assert_eq!(source_id, "2925344776");
                assert!(reason.contains("row 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
