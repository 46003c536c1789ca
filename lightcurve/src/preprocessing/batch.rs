use anyhow::{Context, Result};
use log::{error, info};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::io::loaders::source_id_from_path;
use crate::io::writers::{write_json_report, write_light_curve};
use crate::preprocessing::pipeline::{LightCurvePipeline, PipelineReport};

/// Output path of a source's light curve: `<dir>/<source>_lc.txt`
pub fn light_curve_path(output_dir: &Path, source_id: &str) -> PathBuf {
    output_dir.join(format!("{source_id}_lc.txt"))
}

/// Output path of a source's run report: `<dir>/<source>_report.json`
pub fn report_path(output_dir: &Path, source_id: &str) -> PathBuf {
    output_dir.join(format!("{source_id}_report.json"))
}

/// Outcome of one source in a batch
#[derive(Debug, Clone, Serialize)]
pub struct SourceOutcome {
    pub input: PathBuf,
    pub source_id: String,
    pub output: Option<PathBuf>,
    pub report: Option<PipelineReport>,
    pub error: Option<String>,
}

/// Outcome of a whole batch, in input order
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub sources: Vec<SourceOutcome>,
}

/// Process one catalog file and write its light curve (and report).
fn process_one(
    pipeline: &LightCurvePipeline,
    input: &Path,
    output_dir: &Path,
    write_reports: bool,
) -> Result<(PathBuf, PipelineReport)> {
    let output = pipeline.process_file(input)?;
    let source_id = &output.report.source_id;

    let lc_path = light_curve_path(output_dir, source_id);
    write_light_curve(&output.light_curve, &lc_path)
        .with_context(|| format!("Failed to write {}", lc_path.display()))?;

    if write_reports {
        let path = report_path(output_dir, source_id);
        write_json_report(&output.report, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok((lc_path, output.report))
}

/// Process many sources in parallel, one light curve per source.
///
/// Sources are independent: a failing source is recorded in the summary and
/// does not stop the others.
pub fn process_batch(
    pipeline: &LightCurvePipeline,
    inputs: &[PathBuf],
    output_dir: &Path,
    write_reports: bool,
) -> BatchSummary {
    let sources: Vec<SourceOutcome> = inputs
        .par_iter()
        .map(|input| {
            let source_id = source_id_from_path(input);
            match process_one(pipeline, input, output_dir, write_reports) {
                Ok((output, report)) => SourceOutcome {
                    input: input.clone(),
                    source_id,
                    output: Some(output),
                    report: Some(report),
                    error: None,
                },
                Err(e) => {
                    error!("{}: {:#}", source_id, e);
                    SourceOutcome {
                        input: input.clone(),
                        source_id,
                        output: None,
                        report: None,
                        error: Some(format!("{:#}", e)),
                    }
                }
            }
        })
        .collect();

    let succeeded = sources.iter().filter(|s| s.error.is_none()).count();
    let failed = sources.len() - succeeded;
    info!("Batch finished: {} succeeded, {} failed", succeeded, failed);

    BatchSummary {
        succeeded,
        failed,
        sources,
    }
}
