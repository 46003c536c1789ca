//! Table-level cleaning stages of the light-curve pipeline.
//!
//! Each stage takes a Polars DataFrame and returns a new one; ownership moves
//! from stage to stage and nothing is shared.
//!
//! # Modules
//!
//! - [`filtering`]: Quality cuts and magnitude conversion
//! - [`seasons`]: Observing-season lookup and classification
//! - [`cleaning`]: Per (season, band) outlier rejection
//! - [`sorting`]: Stable band-then-date ordering
//! - [`merging`]: Historical light-curve merge for missing seasons
//!
//! # Example
//!
//! ```no_run
//! use ozdes_lightcurve::transformations::{quality_filter, sort_by_band_and_date};
//! use polars::prelude::*;
//!
//! # fn example(raw: DataFrame) -> ozdes_lightcurve::error::PipelineResult<()> {
//! let bands = vec!["g".to_string(), "r".to_string(), "i".to_string()];
//! let cleaned = quality_filter(&raw, &bands)?;
//! let sorted = sort_by_band_and_date(&cleaned, &bands)?;
//! # Ok(())
//! # }
//! ```

pub mod cleaning;
pub mod filtering;
pub mod merging;
pub mod seasons;
pub mod sorting;

pub use cleaning::reject_outliers;
pub use filtering::{apply_quality_cuts, passes_quality_cuts, quality_filter};
pub use merging::{merge_historical, MergeOutcome};
pub use seasons::{
    classify_seasons, SeasonAssignment, SeasonTable, UnclassifiedPolicy, UNCLASSIFIED_SEASON,
};
pub use sorting::{band_date_order, sort_by_band_and_date};
