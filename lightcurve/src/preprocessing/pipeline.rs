use anyhow::{Context, Result};
use log::{info, warn};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::algorithms::analysis::{summarize_bands, BandSummary};
use crate::algorithms::coadd::NightCoadder;
use crate::config::PipelineConfig;
use crate::core::frame::coadded_to_frame;
use crate::error::{PipelineError, PipelineResult};
use crate::io::loaders::{CatalogLoader, HistoricalLoader};
use crate::preprocessing::validator::{CatalogValidator, ValidationResult};
use crate::transformations::{
    classify_seasons, merge_historical, quality_filter, reject_outliers, sort_by_band_and_date,
    SeasonTable,
};

/// Row counts and statistics of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub source_id: String,
    pub validation: ValidationResult,
    /// Rows in the raw catalog table
    pub raw_rows: usize,
    /// Rows surviving the quality filter
    pub filtered_rows: usize,
    /// Rows matching no season (dropped, bucketed, or rejected per policy)
    pub unclassified_rows: usize,
    /// Rows removed by the outlier rejector
    pub outlier_rows: usize,
    /// Rows taken from the historical light curve
    pub merged_rows: usize,
    /// Why the historical merge was skipped, if it was
    pub historical_skipped: Option<String>,
    /// Rows of the final coadded light curve
    pub coadded_rows: usize,
    pub bands: Vec<BandSummary>,
}

impl PipelineReport {
    fn new(source_id: &str, validation: ValidationResult) -> Self {
        Self {
            source_id: source_id.to_string(),
            raw_rows: validation.stats.total_rows,
            validation,
            filtered_rows: 0,
            unclassified_rows: 0,
            outlier_rows: 0,
            merged_rows: 0,
            historical_skipped: None,
            coadded_rows: 0,
            bands: Vec::new(),
        }
    }
}

/// Result of processing one source
#[derive(Debug)]
pub struct PipelineOutput {
    /// Coadded light curve: `MJD_OBS`, `MAG`, `MAG_ERR`, `BAND`
    pub light_curve: DataFrame,
    pub report: PipelineReport,
}

/// Light-curve pipeline for one source at a time.
///
/// Runs validation, quality filter, season classification, outlier
/// rejection, sorting, the optional historical merge and the night coadd.
pub struct LightCurvePipeline {
    config: PipelineConfig,
    seasons: SeasonTable,
    coadder: NightCoadder,
}

impl LightCurvePipeline {
    /// Create a pipeline, validating the configuration.
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        let seasons = config.season_table()?;
        let coadder = NightCoadder::new(config.calibration.correction());
        Ok(Self {
            config,
            seasons,
            coadder,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process a raw catalog table file; the source id is the file stem.
    pub fn process_file(&self, path: &Path) -> Result<PipelineOutput> {
        let loaded = CatalogLoader::load_from_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        self.process_frame(&loaded.source_id, &loaded.dataframe)
            .with_context(|| format!("Failed to process source {}", loaded.source_id))
    }

    /// Process a raw catalog DataFrame
    /// (`MJD_OBS`, `BAND`, `FLUX_AUTO`, `FLUXERR_AUTO`, `MAG_ZERO`, `FLAGS`).
    ///
    /// # Errors
    /// - `MalformedInput` if validation fails
    /// - `UnclassifiableObservation` under the `reject` policy
    /// - `ExternalSourceUnavailable` if the historical light curve cannot be
    ///   read and failures are not tolerated
    pub fn process_frame(&self, source_id: &str, raw: &DataFrame) -> PipelineResult<PipelineOutput> {
        let validation = CatalogValidator::validate_frame(raw);
        if !validation.is_valid {
            return Err(PipelineError::malformed(source_id, validation.errors.join("; ")));
        }
        for warning in &validation.warnings {
            warn!("{}: {}", source_id, warning);
        }
        let mut report = PipelineReport::new(source_id, validation);
        let bands = &self.config.bands;

        let filtered = quality_filter(raw, bands)?;
        report.filtered_rows = filtered.height();

        let assignment = classify_seasons(&filtered, &self.seasons, self.config.unclassified)?;
        report.unclassified_rows = assignment.unclassified_rows;

        let classified = assignment.frame;
        let kept = reject_outliers(
            &classified,
            &self.seasons.labels(),
            bands,
            self.config.outlier_threshold,
        )?;
        report.outlier_rows = classified.height() - kept.height();

        let mut sorted = sort_by_band_and_date(&kept, bands)?;

        if let Some(historical) = &self.config.historical {
            let path = historical.path_for(source_id);
            match HistoricalLoader::load_from_file(&path) {
                Ok(previous) => {
                    let merged = merge_historical(
                        &sorted,
                        &previous,
                        &historical.missing_seasons,
                        &self.seasons,
                        bands,
                    )?;
                    report.merged_rows = merged.merged_rows;
                    sorted = merged.frame;
                }
                Err(e) if historical.tolerate_unavailable => {
                    warn!("{}: skipping historical merge: {}", source_id, e);
                    report.historical_skipped = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        let light_curve = if sorted.height() == 0 {
            warn!("{}: no observations survived, light curve is empty", source_id);
            coadded_to_frame(&[])?
        } else {
            self.coadder.coadd_frame(&sorted, source_id)?
        };
        report.coadded_rows = light_curve.height();
        report.bands = summarize_bands(&light_curve, bands)?;

        info!(
            "{}: {} raw rows -> {} filtered -> {} coadded points",
            source_id, report.raw_rows, report.filtered_rows, report.coadded_rows
        );

        Ok(PipelineOutput {
            light_curve,
            report,
        })
    }
}

/// Convenience function to process one catalog file with a configuration file
pub fn process_catalog(catalog_path: &Path, config_path: &Path) -> Result<PipelineOutput> {
    let config = PipelineConfig::from_file(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let pipeline = LightCurvePipeline::new(config)?;
    pipeline.process_file(catalog_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::columns::{f64_values, str_values};
    use crate::core::domain::Season;
    use crate::transformations::UnclassifiedPolicy;

    fn config() -> PipelineConfig {
        let mut config = PipelineConfig::new(vec![
            Season::new("Y1", 56520, 56710),
            Season::new("Y2", 56870, 57080),
        ]);
        config.calibration.enabled = false;
        config
    }

    fn raw_frame() -> DataFrame {
        df!(
            "MJD_OBS" => &[56530.1, 56530.2, 56531.1, 56530.15, 56540.1, 56600.0, 56800.0, 56900.2, 56900.3, 56901.1],
            "BAND" => &["g", "g", "g", "r", "r", "g", "g", "i", "z", "i"],
            "FLUX_AUTO" => &[1000.0, 1000.0, 1000.0, 10000.0, 10000.0, 100.0, 1000.0, 1000.0, 1000.0, 1000.0],
            "FLUXERR_AUTO" => &[10.0, 10.0, 10.0, 100.0, 100.0, 10.0, 10.0, 10.0, 10.0, 10.0],
            "MAG_ZERO" => &[30.0, 30.0, 30.0, 30.0, 30.0, 30.0, 30.0, 30.0, 30.0, 30.0],
            "FLAGS" => &[0i64, 0, 0, 0, 0, 0, 0, 5, 0, 0]
        )
        .unwrap()
    }

    #[test]
    fn test_process_frame_stage_counts() {
        let pipeline = LightCurvePipeline::new(config()).unwrap();
        let output = pipeline.process_frame("2925344776", &raw_frame()).unwrap();
        let report = &output.report;

        assert_eq!(report.raw_rows, 10);
        assert_eq!(report.filtered_rows, 8);
        assert_eq!(report.unclassified_rows, 1);
        assert_eq!(report.outlier_rows, 1);
        assert_eq!(report.merged_rows, 0);
        assert_eq!(report.coadded_rows, 5);

        let bands = str_values(&output.light_curve, "BAND").unwrap();
        let bands: Vec<&str> = bands.iter().map(|b| b.as_deref().unwrap()).collect();
        assert_eq!(bands, vec!["g", "g", "r", "r", "i"]);

        let mjd = f64_values(&output.light_curve, "MJD_OBS").unwrap();
        assert!((mjd[0].unwrap() - 56530.15).abs() < 1e-6);
        let mag = f64_values(&output.light_curve, "MAG").unwrap();
        assert!((mag[0].unwrap() - 22.5).abs() < 1e-9);
        let err = f64_values(&output.light_curve, "MAG_ERR").unwrap();
        let single = 2.5 * 1.01f64.log10();
        assert!((err[0].unwrap() - single / 2f64.sqrt()).abs() < 1e-9);
        assert!((err[1].unwrap() - single).abs() < 1e-9);
    }

    #[test]
    fn test_band_summaries_follow_band_order() {
        let pipeline = LightCurvePipeline::new(config()).unwrap();
        let output = pipeline.process_frame("2925344776", &raw_frame()).unwrap();
        let names: Vec<&str> = output.report.bands.iter().map(|b| b.band.as_str()).collect();
        assert_eq!(names, vec!["g", "r", "i"]);
        assert_eq!(output.report.bands[0].points, 2);
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let pipeline = LightCurvePipeline::new(config()).unwrap();
        let raw = raw_frame().drop("MAG_ZERO").unwrap();
        let err = pipeline.process_frame("2925344776", &raw).unwrap_err();
        match err {
            PipelineError::MalformedInput { source_id, reason } => {
                assert_eq!(source_id, "2925344776");
                assert!(reason.contains("MAG_ZERO"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reject_policy_fails_on_unclassified_row() {
        let mut config = config();
        config.unclassified = UnclassifiedPolicy::Reject;
        let pipeline = LightCurvePipeline::new(config).unwrap();
        let err = pipeline.process_frame("2925344776", &raw_frame()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::UnclassifiableObservation { date, .. } if date == 56800.0
        ));
    }

    #[test]
    fn test_no_surviving_rows_gives_empty_light_curve() {
        let pipeline = LightCurvePipeline::new(config()).unwrap();
        let only_z: Vec<bool> = (0..10).map(|row| row == 8).collect();
        let raw = raw_frame()
            .filter(&BooleanChunked::from_slice("z".into(), &only_z))
            .unwrap();
        let output = pipeline.process_frame("2925344776", &raw).unwrap();
        assert_eq!(output.light_curve.height(), 0);
        assert_eq!(output.light_curve.width(), 4);
        assert_eq!(output.report.coadded_rows, 0);
        assert!(output.report.bands.is_empty());
    }

    #[test]
    fn test_missing_historical_file() {
        let mut config = config();
        config.historical = Some(crate::config::HistoricalSettings {
            path: "/nonexistent/{source}_lc.txt".to_string(),
            missing_seasons: vec!["Y1".to_string()],
            tolerate_unavailable: false,
        });
        let pipeline = LightCurvePipeline::new(config.clone()).unwrap();
        let err = pipeline.process_frame("2925344776", &raw_frame()).unwrap_err();
        match err {
            PipelineError::ExternalSourceUnavailable { origin, .. } => {
                assert_eq!(origin, "/nonexistent/2925344776_lc.txt");
            }
            other => panic!("unexpected error: {other}"),
        }

        if let Some(historical) = config.historical.as_mut() {
            historical.tolerate_unavailable = true;
        }
        let pipeline = LightCurvePipeline::new(config).unwrap();
        let output = pipeline.process_frame("2925344776", &raw_frame()).unwrap();
        assert!(output.report.historical_skipped.is_some());
        assert_eq!(output.report.coadded_rows, 5);
    }

    #[test]
    fn test_corrupt_historical_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("2925344776_lc.txt"),
            "MJD_OBS MAG MAG_ERR BAND\n56300.10 oops 0.02 g\n",
        )
        .unwrap();

        let mut config = config();
        config.historical = Some(crate::config::HistoricalSettings {
            path: format!("{}/{{source}}_lc.txt", dir.path().display()),
            missing_seasons: vec!["Y1".to_string()],
            tolerate_unavailable: true,
        });
        let pipeline = LightCurvePipeline::new(config).unwrap();
        let output = pipeline.process_frame("2925344776", &raw_frame()).unwrap();
        let skipped = output.report.historical_skipped.unwrap();
        assert!(skipped.contains("column MAG has 1 non-numeric value(s)"));
        assert_eq!(output.report.merged_rows, 0);
        assert_eq!(output.report.coadded_rows, 5);
    }
}
