use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::core::columns::LIGHT_CURVE_COLUMNS;
use crate::error::{PipelineError, PipelineResult};

/// Write a light curve as a space-separated table with a
/// `MJD_OBS MAG MAG_ERR BAND` header, the layout the historical loader reads.
pub fn write_light_curve(df: &DataFrame, path: &Path) -> PipelineResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut output = df.select(LIGHT_CURVE_COLUMNS)?;
    let file = File::create(path)?;
    CsvWriter::new(BufWriter::new(file))
        .include_header(true)
        .with_separator(b' ')
        .finish(&mut output)?;
    Ok(())
}

/// Write any serialisable report as pretty JSON
pub fn write_json_report<T: Serialize>(report: &T, path: &Path) -> PipelineResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), report).map_err(|e| {
        PipelineError::Io(std::io::Error::other(format!(
            "failed to write report {}: {}",
            path.display(),
            e
        )))
    })
}
