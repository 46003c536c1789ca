use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use ozdes_lightcurve::catalog::{load_locations, ConeSearch, CONE_HALF_WIDTH_DEG};
use ozdes_lightcurve::io::write_json_report;
use ozdes_lightcurve::preprocessing::process_batch;
use ozdes_lightcurve::{LightCurvePipeline, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "ozdes-lightcurve",
    about = "Builds night-coadded OzDES light curves from DES single-epoch photometry",
    after_help = r#"
Fetch the raw photometry by running the SQL printed by `query` for every
source, then build the light curves:
```
ozdes-lightcurve query --locations RM_Source_Locations.txt > queries.sql
ozdes-lightcurve process --config ozdes.toml --output-dir lc query/
```
Set RUST_LOG=info (or debug) for per-stage logging.
"#
)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// build light curves from raw catalog tables
    Process {
        /// TOML pipeline configuration
        #[arg(short, long)]
        config: PathBuf,
        /// directory receiving `<source>_lc.txt`
        #[arg(short, long, default_value = "lc")]
        output_dir: PathBuf,
        /// also write `<source>_report.json`
        #[arg(long)]
        reports: bool,
        /// write the batch summary as JSON to this file
        #[arg(long)]
        summary: Option<PathBuf>,
        /// override the outlier threshold (mag)
        #[arg(long)]
        threshold: Option<f64>,
        /// disable the calibration floors
        #[arg(long)]
        no_calibration: bool,
        /// catalog tables, or directories of `.tab` files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// print the catalog query of every source in a location list
    Query {
        /// unlabelled `ID RA DEC` file
        #[arg(short, long)]
        locations: PathBuf,
        /// prefix of the result files
        #[arg(short, long, default_value = "query/DESY6_")]
        prefix: String,
        /// data release table prefix
        #[arg(long, default_value = "Y6A1")]
        release: String,
        /// half width of the search box (degrees)
        #[arg(long, default_value_t = CONE_HALF_WIDTH_DEG)]
        half_width: f64,
        /// print the plan as JSON instead of SQL
        #[arg(long)]
        json: bool,
    },
}

/// Expand directories into their `.tab` files, sorted by name.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut tabs: Vec<PathBuf> = fs::read_dir(input)
                .with_context(|| format!("Failed to list {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.extension().is_some_and(|ext| ext == "tab"))
                .collect();
            tabs.sort();
            files.extend(tabs);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn process(
    config: &Path,
    output_dir: &Path,
    reports: bool,
    summary: Option<&Path>,
    threshold: Option<f64>,
    no_calibration: bool,
    inputs: &[PathBuf],
) -> Result<()> {
    let mut config = PipelineConfig::from_file(config)
        .with_context(|| format!("Failed to load config {}", config.display()))?;
    if let Some(threshold) = threshold {
        config.outlier_threshold = threshold;
    }
    if no_calibration {
        config.calibration.enabled = false;
    }
    let pipeline = LightCurvePipeline::new(config)?;

    let files = collect_inputs(inputs)?;
    if files.is_empty() {
        bail!("No catalog tables found");
    }
    info!("Processing {} source(s) into {}", files.len(), output_dir.display());

    let batch = process_batch(&pipeline, &files, output_dir, reports);
    for source in &batch.sources {
        match (&source.output, &source.error) {
            (Some(output), _) => println!("{}\t{}", source.source_id, output.display()),
            (None, Some(error)) => eprintln!("{}\tFAILED: {}", source.source_id, error),
            (None, None) => {}
        }
    }
    if let Some(path) = summary {
        write_json_report(&batch, path)?;
    }
    if batch.failed > 0 {
        bail!("{} of {} source(s) failed", batch.failed, batch.sources.len());
    }
    Ok(())
}

fn query(locations: &Path, search: &ConeSearch, json: bool) -> Result<()> {
    let locations = load_locations(locations)
        .with_context(|| format!("Failed to read locations {}", locations.display()))?;
    let plan = search.plan(&locations);
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        for entry in &plan {
            println!("-- {} -> {}", entry.source_id, entry.output.display());
            println!("{};", entry.sql);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.commands {
        Commands::Process {
            config,
            output_dir,
            reports,
            summary,
            threshold,
            no_calibration,
            inputs,
        } => process(
            &config,
            &output_dir,
            reports,
            summary.as_deref(),
            threshold,
            no_calibration,
            &inputs,
        ),
        Commands::Query {
            locations,
            prefix,
            release,
            half_width,
            json,
        } => {
            let search = ConeSearch {
                release,
                half_width,
                output_prefix: prefix,
            };
            query(&locations, &search, json)
        }
    }
}
