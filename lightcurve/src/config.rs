//! Pipeline configuration file support.
//!
//! This module reads the light-curve pipeline configuration from TOML files.
//!
//! ```toml
//! bands = ["g", "r", "i"]
//! outlier_threshold = 1.0
//! unclassified = "drop"
//!
//! [[seasons]]
//! label = "Y1"
//! start = 56520
//! end = 56710
//!
//! [calibration]
//! enabled = true
//!
//! [historical]
//! path = "previous/{source}_lc.txt"
//! missing_seasons = ["Y1"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::algorithms::coadd::{CalibrationCorrection, DES_CALIBRATION_FLOORS};
use crate::core::domain::Season;
use crate::error::{PipelineError, PipelineResult};
use crate::transformations::seasons::{SeasonTable, UnclassifiedPolicy};

/// Placeholder replaced by the source id in [`HistoricalSettings::path`]
pub const SOURCE_PLACEHOLDER: &str = "{source}";

/// Light-curve pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Accepted bands, in output order
    #[serde(default = "default_bands")]
    pub bands: Vec<String>,
    /// Observing seasons, in reporting order
    pub seasons: Vec<Season>,
    /// Maximum deviation (mag) from the season/band mean
    #[serde(default = "default_outlier_threshold")]
    pub outlier_threshold: f64,
    #[serde(default)]
    pub unclassified: UnclassifiedPolicy,
    #[serde(default)]
    pub calibration: CalibrationSettings,
    #[serde(default)]
    pub historical: Option<HistoricalSettings>,
}

/// Calibration floor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationSettings {
    #[serde(default = "default_calibration_enabled")]
    pub enabled: bool,
    /// Systematic floor (mag) per band
    #[serde(default = "default_calibration_floors")]
    pub floors: BTreeMap<String, f64>,
}

/// Settings for merging an earlier light curve of the same source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalSettings {
    /// Path of the historical light curve; `{source}` is replaced by the source id
    pub path: String,
    /// Seasons absent from the live catalog and taken from the historical file
    pub missing_seasons: Vec<String>,
    /// Skip the merge with a warning instead of failing when the file is
    /// missing or unreadable
    #[serde(default)]
    pub tolerate_unavailable: bool,
}

fn default_bands() -> Vec<String> {
    vec!["g".to_string(), "r".to_string(), "i".to_string()]
}

fn default_outlier_threshold() -> f64 {
    1.0
}

fn default_calibration_enabled() -> bool {
    true
}

fn default_calibration_floors() -> BTreeMap<String, f64> {
    DES_CALIBRATION_FLOORS
        .iter()
        .map(|(band, floor)| (band.to_string(), *floor))
        .collect()
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            enabled: default_calibration_enabled(),
            floors: default_calibration_floors(),
        }
    }
}

impl CalibrationSettings {
    /// The correction the coadder applies
    pub fn correction(&self) -> CalibrationCorrection {
        if self.enabled {
            CalibrationCorrection::from_floors(self.floors.clone())
        } else {
            CalibrationCorrection::disabled()
        }
    }
}

impl HistoricalSettings {
    /// Historical light-curve path for a source
    pub fn path_for(&self, source_id: &str) -> PathBuf {
        PathBuf::from(self.path.replace(SOURCE_PLACEHOLDER, source_id))
    }
}

impl PipelineConfig {
    /// Configuration with default settings for the given seasons
    pub fn new(seasons: Vec<Season>) -> Self {
        Self {
            bands: default_bands(),
            seasons,
            outlier_threshold: default_outlier_threshold(),
            unclassified: UnclassifiedPolicy::default(),
            calibration: CalibrationSettings::default(),
            historical: None,
        }
    }

    /// Load and validate a configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(PipelineConfig)` if successful
    /// * `Err(PipelineError::Configuration)` if the file cannot be read,
    ///   parsed, or fails validation
    pub fn from_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            PipelineError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a configuration from TOML text.
    ///
    /// Parse errors name the offending key path (e.g. `seasons[2].end`).
    pub fn from_toml_str(content: &str) -> PipelineResult<Self> {
        let deserializer = toml::Deserializer::new(content);
        let config: PipelineConfig =
            serde_path_to_error::deserialize(deserializer).map_err(|e| {
                PipelineError::Configuration(format!(
                    "Failed to parse config at '{}': {}",
                    e.path(),
                    e.inner()
                ))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.bands.is_empty() {
            return Err(PipelineError::Configuration(
                "at least one band must be accepted".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.bands.iter().find(|b| !seen.insert(b.as_str())) {
            return Err(PipelineError::Configuration(format!(
                "band '{dup}' is listed more than once"
            )));
        }

        if !(self.outlier_threshold.is_finite() && self.outlier_threshold > 0.0) {
            return Err(PipelineError::Configuration(format!(
                "outlier_threshold must be a positive number, got {}",
                self.outlier_threshold
            )));
        }

        if let Some((band, floor)) = self
            .calibration
            .floors
            .iter()
            .find(|(_, floor)| !(floor.is_finite() && **floor >= 0.0))
        {
            return Err(PipelineError::Configuration(format!(
                "calibration floor for band '{band}' must be non-negative, got {floor}"
            )));
        }

        let table = self.season_table()?;
        if let Some(historical) = &self.historical {
            if historical.missing_seasons.is_empty() {
                return Err(PipelineError::Configuration(
                    "historical.missing_seasons must name at least one season".to_string(),
                ));
            }
            if let Some(label) = historical
                .missing_seasons
                .iter()
                .find(|label| table.get(label).is_none())
            {
                return Err(PipelineError::Configuration(format!(
                    "missing season '{label}' is not defined in [[seasons]]"
                )));
            }
        }
        Ok(())
    }

    /// Validated season lookup table
    pub fn season_table(&self) -> PipelineResult<SeasonTable> {
        SeasonTable::new(self.seasons.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
bands = ["g", "r"]
outlier_threshold = 0.75
unclassified = "bucket"

[[seasons]]
label = "Y1"
start = 56520
end = 56710

[[seasons]]
label = "Y2"
start = 56870
end = 57080

[calibration]
enabled = false

[historical]
path = "old/{source}_lc.txt"
missing_seasons = ["Y1"]
"#;

    #[test]
    fn test_parse_full_config() {
        let config = PipelineConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.bands, vec!["g".to_string(), "r".to_string()]);
        assert_eq!(config.seasons.len(), 2);
        assert_eq!(config.seasons[1], Season::new("Y2", 56870, 57080));
        assert_eq!(config.outlier_threshold, 0.75);
        assert_eq!(config.unclassified, UnclassifiedPolicy::Bucket);
        assert!(!config.calibration.correction().is_enabled());

        let historical = config.historical.unwrap();
        assert_eq!(
            historical.path_for("2925344776"),
            PathBuf::from("old/2925344776_lc.txt")
        );
        assert!(!historical.tolerate_unavailable);
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_toml_str(
            "[[seasons]]\nlabel = \"Y1\"\nstart = 56520\nend = 56710\n",
        )
        .unwrap();
        assert_eq!(config.bands, default_bands());
        assert_eq!(config.outlier_threshold, 1.0);
        assert_eq!(config.unclassified, UnclassifiedPolicy::Drop);
        let correction = config.calibration.correction();
        assert_eq!(correction.floor("g"), 0.0073);
        assert_eq!(correction.floor("z"), 0.0);
        assert!(config.historical.is_none());
    }

    #[test]
    fn test_parse_error_names_key_path() {
        let err = PipelineConfig::from_toml_str(
            "[[seasons]]\nlabel = \"Y1\"\nstart = 56520\nend = \"late\"\n",
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("seasons"), "{message}");
        assert!(message.contains("end"), "{message}");
    }

    #[test]
    fn test_overlapping_seasons_fail_validation() {
        let toml = "[[seasons]]\nlabel = \"Y1\"\nstart = 100\nend = 200\n\
                    [[seasons]]\nlabel = \"Y2\"\nstart = 150\nend = 300\n";
        assert!(matches!(
            PipelineConfig::from_toml_str(toml),
            Err(PipelineError::Configuration(_))
        ));
    }

    #[test]
    fn test_undefined_missing_season_fails_validation() {
        let mut config = PipelineConfig::new(vec![Season::new("Y1", 100, 200)]);
        config.historical = Some(HistoricalSettings {
            path: "old.txt".to_string(),
            missing_seasons: vec!["Y0".to_string()],
            tolerate_unavailable: false,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_threshold_and_bands() {
        let mut config = PipelineConfig::new(vec![Season::new("Y1", 100, 200)]);
        config.outlier_threshold = -1.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::new(vec![Season::new("Y1", 100, 200)]);
        config.bands = vec!["g".to_string(), "g".to_string()];
        assert!(config.validate().is_err());
    }
}
