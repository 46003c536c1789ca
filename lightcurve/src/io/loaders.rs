use log::debug;
use polars::prelude::*;
use std::fs;
use std::path::Path;

use crate::core::columns::{has_column, LIGHT_CURVE_COLUMNS, MAG, MAG_ERR, MJD_OBS};
use crate::error::{PipelineError, PipelineResult};
use crate::parsing::table_parser::{read_table_str, TableFormat};

/// Result of loading one source's raw catalog table
#[derive(Debug)]
pub struct CatalogLoadResult {
    pub dataframe: DataFrame,
    /// Source identifier, taken from the file stem
    pub source_id: String,
    pub format: TableFormat,
    pub num_rows: usize,
}

impl CatalogLoadResult {
    pub fn new(dataframe: DataFrame, source_id: String, format: TableFormat) -> Self {
        let num_rows = dataframe.height();
        Self {
            dataframe,
            source_id,
            format,
            num_rows,
        }
    }
}

/// Source identifier of a catalog file: its file stem.
pub fn source_id_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Loader for the per-source catalog tables written by the query step
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a raw catalog table (tab, whitespace or comma separated).
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `MalformedInput` if it cannot be
    /// parsed as a table.
    pub fn load_from_file(path: &Path) -> PipelineResult<CatalogLoadResult> {
        let text = fs::read_to_string(path)?;
        let source_id = source_id_from_path(path);
        let format = TableFormat::detect(path, &text);
        let df = read_table_str(&text, format, true).map_err(|e| {
            PipelineError::malformed(&source_id, format!("failed to parse {}: {}", path.display(), e))
        })?;
        debug!(
            "Loaded {} rows from {} ({:?})",
            df.height(),
            path.display(),
            format
        );
        Ok(CatalogLoadResult::new(df, source_id, format))
    }

    /// Load a raw catalog table from text already in memory.
    pub fn load_from_str(
        text: &str,
        source_id: &str,
        format: TableFormat,
    ) -> PipelineResult<CatalogLoadResult> {
        let df = read_table_str(text, format, true)
            .map_err(|e| PipelineError::malformed(source_id, e.to_string()))?;
        Ok(CatalogLoadResult::new(df, source_id.to_string(), format))
    }
}

/// Loader for light curves produced by an earlier analysis
pub struct HistoricalLoader;

impl HistoricalLoader {
    /// Load a historical light curve (`MJD_OBS MAG MAG_ERR BAND`, whitespace
    /// separated).
    ///
    /// # Errors
    /// `ExternalSourceUnavailable` naming the path if the file is missing,
    /// unreadable or unparsable, lacks one of the light-curve columns, or has
    /// a non-numeric date or magnitude.
    pub fn load_from_file(path: &Path) -> PipelineResult<DataFrame> {
        let origin = path.display().to_string();
        let text = fs::read_to_string(path)
            .map_err(|e| PipelineError::unavailable(&origin, e.to_string()))?;
        let df = read_table_str(&text, TableFormat::detect(path, &text), true)
            .map_err(|e| PipelineError::unavailable(&origin, e.to_string()))?;

        let missing: Vec<&str> = LIGHT_CURVE_COLUMNS
            .iter()
            .copied()
            .filter(|name| !has_column(&df, name))
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::unavailable(
                &origin,
                format!("incompatible column layout, missing {}", missing.join(", ")),
            ));
        }

        for col in [MJD_OBS, MAG, MAG_ERR] {
            let invalid = non_numeric_count(&df, col)
                .map_err(|e| PipelineError::unavailable(&origin, e.to_string()))?;
            if invalid > 0 {
                return Err(PipelineError::unavailable(
                    &origin,
                    format!("column {} has {} non-numeric value(s)", col, invalid),
                ));
            }
        }

        Ok(df.select(LIGHT_CURVE_COLUMNS)?)
    }
}

/// Values that turn null on the cast to f64
fn non_numeric_count(df: &DataFrame, col: &str) -> PolarsResult<usize> {
    let column = df.column(col)?;
    let before = column.null_count();
    let after = column.cast(&DataType::Float64)?.null_count();
    Ok(after.saturating_sub(before))
}
