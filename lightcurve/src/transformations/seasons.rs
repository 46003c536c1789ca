//! Assignment of observations to observing seasons.
//!
//! Seasons are validated to be non-overlapping when the [`SeasonTable`] is
//! built, so every night maps to at most one season and the lookup is a
//! binary search over season start nights.

use log::{debug, info, warn};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::columns::{f64_values, MJD_OBS, SEASON};
use crate::core::domain::Season;
use crate::error::{PipelineError, PipelineResult};
use crate::time::night_of;

/// Season label given to observations outside every configured season when
/// [`UnclassifiedPolicy::Bucket`] is in effect.
pub const UNCLASSIFIED_SEASON: &str = "unclassified";

/// What to do with an observation whose date falls outside every season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnclassifiedPolicy {
    /// Drop the row and log a warning with the number of rows dropped
    #[default]
    Drop,
    /// Keep the row under the [`UNCLASSIFIED_SEASON`] label
    Bucket,
    /// Fail with `UnclassifiableObservation`
    Reject,
}

/// Ordered, non-overlapping set of observing seasons.
#[derive(Debug, Clone)]
pub struct SeasonTable {
    seasons: Vec<Season>,
    /// Indices into `seasons`, ordered by start night
    by_start: Vec<usize>,
}

impl SeasonTable {
    /// Build a season table, keeping the given order for [`labels`](Self::labels).
    ///
    /// # Errors
    /// `Configuration` if the table is empty, a label repeats, a range is
    /// empty, or two ranges overlap.
    pub fn new(seasons: Vec<Season>) -> PipelineResult<Self> {
        if seasons.is_empty() {
            return Err(PipelineError::Configuration(
                "at least one season must be defined".to_string(),
            ));
        }

        let mut labels = HashSet::new();
        for season in &seasons {
            if season.label == UNCLASSIFIED_SEASON {
                return Err(PipelineError::Configuration(format!(
                    "season label '{}' is reserved",
                    UNCLASSIFIED_SEASON
                )));
            }
            if !labels.insert(season.label.as_str()) {
                return Err(PipelineError::Configuration(format!(
                    "season '{}' is defined more than once",
                    season.label
                )));
            }
            if season.start >= season.end {
                return Err(PipelineError::Configuration(format!(
                    "season '{}' has an empty range [{}, {})",
                    season.label, season.start, season.end
                )));
            }
        }

        let mut by_start: Vec<usize> = (0..seasons.len()).collect();
        by_start.sort_by_key(|&i| seasons[i].start);
        for pair in by_start.windows(2) {
            let (a, b) = (&seasons[pair[0]], &seasons[pair[1]]);
            if a.overlaps(b) {
                return Err(PipelineError::Configuration(format!(
                    "seasons '{}' and '{}' overlap",
                    a.label, b.label
                )));
            }
        }

        for &i in &by_start {
            debug!("Season {}", seasons[i]);
        }
        Ok(Self { seasons, by_start })
    }

    /// Season labels in configuration order
    pub fn labels(&self) -> Vec<String> {
        self.seasons.iter().map(|s| s.label.clone()).collect()
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn get(&self, label: &str) -> Option<&Season> {
        self.seasons.iter().find(|s| s.label == label)
    }

    /// Season containing the given integer night, if any.
    pub fn lookup_night(&self, night: i64) -> Option<&Season> {
        let idx = self
            .by_start
            .partition_point(|&i| self.seasons[i].start <= night);
        if idx == 0 {
            return None;
        }
        let season = &self.seasons[self.by_start[idx - 1]];
        season.contains_night(night).then_some(season)
    }

    /// Season containing the given date, if any.
    pub fn lookup(&self, mjd: f64) -> Option<&Season> {
        if !mjd.is_finite() {
            return None;
        }
        self.lookup_night(night_of(mjd))
    }
}

/// Result of season classification
#[derive(Debug, Clone)]
pub struct SeasonAssignment {
    /// Input table with an added `SEASON` column
    pub frame: DataFrame,
    /// Rows whose date matched no season
    pub unclassified_rows: usize,
}

/// Add a `SEASON` column assigning every observation to its season.
///
/// Rows matching no season are handled according to `policy`.
pub fn classify_seasons(
    df: &DataFrame,
    table: &SeasonTable,
    policy: UnclassifiedPolicy,
) -> PipelineResult<SeasonAssignment> {
    let mjd = f64_values(df, MJD_OBS)?;

    let mut labels: Vec<Option<String>> = Vec::with_capacity(mjd.len());
    let mut unclassified_rows = 0usize;
    for (row, date) in mjd.iter().enumerate() {
        let season = date.and_then(|d| table.lookup(d));
        match (season, policy) {
            (Some(season), _) => labels.push(Some(season.label.clone())),
            (None, UnclassifiedPolicy::Reject) => {
                return Err(PipelineError::UnclassifiableObservation {
                    row,
                    date: date.unwrap_or(f64::NAN),
                });
            }
            (None, UnclassifiedPolicy::Bucket) => {
                unclassified_rows += 1;
                labels.push(Some(UNCLASSIFIED_SEASON.to_string()));
            }
            (None, UnclassifiedPolicy::Drop) => {
                unclassified_rows += 1;
                labels.push(None);
            }
        }
    }

    let keep: Vec<bool> = labels.iter().map(Option::is_some).collect();
    let mut frame = df.clone();
    frame.with_column(Column::new(SEASON.into(), labels))?;
    if policy == UnclassifiedPolicy::Drop && unclassified_rows > 0 {
        warn!(
            "Dropped {} observation(s) outside every configured season",
            unclassified_rows
        );
        let mask = BooleanChunked::from_slice("classified".into(), &keep);
        frame = frame.filter(&mask)?;
    }

    info!(
        "Season classification: {} rows classified, {} unclassified",
        mjd.len() - unclassified_rows,
        unclassified_rows
    );

    Ok(SeasonAssignment {
        frame,
        unclassified_rows,
    })
}
