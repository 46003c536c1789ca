//! Raw catalog validation with detailed error and warning reporting.
//!
//! Checks that a per-source catalog table has the columns the pipeline reads
//! and that their values parse as numbers, before any stage runs.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::columns::{
    f64_values, str_values, BAND, FLAGS, FLUX_AUTO, MAG_ZERO, MJD_OBS, RAW_COLUMNS,
    RAW_NUMERIC_COLUMNS,
};
use crate::transformations::filtering::passes_quality_cuts;

/// Validation result with categorized issues and statistics.
///
/// Errors make `is_valid` false, warnings are informational.
///
/// # Examples
///
/// ```
/// use ozdes_lightcurve::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_error("Missing required column: FLAGS".to_string());
/// assert!(!result.is_valid);
/// assert_eq!(result.errors.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_rows: usize,
    /// Rows with a null in any column the quality cuts read
    pub rows_with_nulls: usize,
    /// Values present in the file that did not parse as numbers
    pub non_numeric_values: usize,
    /// Complete rows that the quality cuts will remove
    pub failing_quality_cuts: usize,
    pub distinct_bands: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Adds a non-critical warning without invalidating the result.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for raw per-source catalog tables.
///
/// # Examples
///
/// ```no_run
/// use ozdes_lightcurve::preprocessing::validator::CatalogValidator;
/// use polars::prelude::*;
///
/// # fn example(df: &DataFrame) {
/// let result = CatalogValidator::validate_frame(df);
/// if !result.is_valid {
///     for error in &result.errors {
///         eprintln!("Error: {}", error);
///     }
/// }
/// # }
/// ```
pub struct CatalogValidator;

impl CatalogValidator {
    /// Validates a raw catalog DataFrame.
    ///
    /// # Error Conditions
    ///
    /// - Missing required columns
    /// - Numeric columns holding values that do not parse as numbers
    ///
    /// Nulls and rows the quality cuts will remove are only warnings.
    pub fn validate_frame(df: &DataFrame) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.stats.total_rows = df.height();

        for col in RAW_COLUMNS {
            if df.column(col).is_err() {
                result.add_error(format!("Missing required column: {}", col));
            }
        }

        if !result.is_valid {
            return result;
        }

        for col in RAW_NUMERIC_COLUMNS {
            Self::check_numeric(df, col, &mut result);
        }

        if let Ok(bands) = str_values(df, BAND) {
            let mut distinct: Vec<String> = bands.into_iter().flatten().collect();
            distinct.sort();
            distinct.dedup();
            result.stats.distinct_bands = distinct;
        }

        Self::check_rows(df, &mut result);

        if df.height() == 0 {
            result.add_warning("Catalog table has no rows".to_string());
        }

        result
    }

    /// Counts values that were present but became null on the cast to f64.
    fn check_numeric(df: &DataFrame, col: &str, result: &mut ValidationResult) {
        let Ok(column) = df.column(col) else {
            return;
        };
        let before = column.null_count();
        let after = match column.cast(&DataType::Float64) {
            Ok(cast) => cast.null_count(),
            Err(e) => {
                result.add_error(format!("Column {} is not numeric: {}", col, e));
                return;
            }
        };

        let invalid = after.saturating_sub(before);
        if invalid > 0 {
            result.stats.non_numeric_values += invalid;
            result.add_error(format!(
                "Column {} has {} non-numeric value(s)",
                col, invalid
            ));
        }
    }

    fn check_rows(df: &DataFrame, result: &mut ValidationResult) {
        let columns = (
            f64_values(df, MJD_OBS),
            f64_values(df, FLUX_AUTO),
            f64_values(df, MAG_ZERO),
            f64_values(df, FLAGS),
            str_values(df, BAND),
        );
        let (Ok(mjd), Ok(flux), Ok(zp), Ok(flags), Ok(bands)) = columns else {
            return;
        };

        for i in 0..df.height() {
            let complete = mjd[i].is_some()
                && flux[i].is_some()
                && zp[i].is_some()
                && flags[i].is_some()
                && bands[i].is_some();
            if !complete {
                result.stats.rows_with_nulls += 1;
            } else if !passes_quality_cuts(mjd[i], zp[i], flux[i], flags[i]) {
                result.stats.failing_quality_cuts += 1;
            }
        }

        if result.stats.rows_with_nulls > 0 {
            result.add_warning(format!(
                "{} row(s) have missing values and will be removed",
                result.stats.rows_with_nulls
            ));
        }
        if result.stats.failing_quality_cuts > 0 {
            result.add_warning(format!(
                "{} row(s) fail the quality cuts",
                result.stats.failing_quality_cuts
            ));
        }
        let removed = result.stats.rows_with_nulls + result.stats.failing_quality_cuts;
        if removed > 0 && removed == df.height() {
            result.add_warning("No row survives the quality cuts".to_string());
        }
    }
}
