use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::parsing::table_parser::{read_table_str, TableFormat};

/// Sky position of one reverberation-mapping source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub id: i64,
    /// Right ascension in degrees
    pub ra: f64,
    /// Declination in degrees
    pub dec: f64,
}

/// Parse an unlabelled `ID RA DEC` location list (whitespace separated).
///
/// # Errors
/// `MalformedInput` naming `origin` if a row has fewer than three columns, a
/// missing or non-numeric value, or coordinates outside the sky.
pub fn parse_locations(text: &str, origin: &str) -> PipelineResult<Vec<SourceLocation>> {
    if text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    }) {
        return Ok(Vec::new());
    }

    let df = read_table_str(text, TableFormat::Whitespace, false)
        .map_err(|e| PipelineError::malformed(origin, e.to_string()))?;
    if df.width() < 3 {
        return Err(PipelineError::malformed(
            origin,
            format!("expected ID RA DEC columns, found {}", df.width()),
        ));
    }

    let columns = df.get_columns();
    let ids = columns[0].cast(&DataType::Int64)?;
    let ras = columns[1].cast(&DataType::Float64)?;
    let decs = columns[2].cast(&DataType::Float64)?;

    ids.i64()?
        .into_iter()
        .zip(ras.f64()?)
        .zip(decs.f64()?)
        .enumerate()
        .map(|(row, ((id, ra), dec))| {
            let (Some(id), Some(ra), Some(dec)) = (id, ra, dec) else {
                return Err(PipelineError::malformed(
                    origin,
                    format!("row {} has a missing or non-numeric value", row + 1),
                ));
            };
            if !(0.0..360.0).contains(&ra) || !(-90.0..=90.0).contains(&dec) {
                return Err(PipelineError::malformed(
                    origin,
                    format!("row {} has coordinates off the sky: RA {ra}, DEC {dec}", row + 1),
                ));
            }
            Ok(SourceLocation { id, ra, dec })
        })
        .collect()
}

/// Read a location list file
pub fn load_locations(path: &Path) -> PipelineResult<Vec<SourceLocation>> {
    let text = fs::read_to_string(path)?;
    parse_locations(&text, &path.display().to_string())
}
