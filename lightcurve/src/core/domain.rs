//! Domain models for calibrated photometry and observing seasons.
//!
//! This module provides the typed rows the night coadder streams over, the
//! coadded points it emits, and the [`Season`] date range used to align
//! observations into observing campaigns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time::{mjd_to_date, night_of};

/// A single calibrated photometric measurement.
///
/// # Examples
///
/// ```
/// use ozdes_lightcurve::core::domain::PhotometryPoint;
///
/// let point = PhotometryPoint::new(56543.71, 20.12, 0.03, "g");
/// assert_eq!(point.night(), 56543);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotometryPoint {
    pub mjd: f64,
    pub mag: f64,
    pub mag_err: f64,
    pub band: String,
}

impl PhotometryPoint {
    pub fn new(mjd: f64, mag: f64, mag_err: f64, band: impl Into<String>) -> Self {
        Self {
            mjd,
            mag,
            mag_err,
            band: band.into(),
        }
    }

    /// Integer night the measurement was taken on.
    pub fn night(&self) -> i64 {
        night_of(self.mjd)
    }

    /// Inverse-variance weight of the measurement.
    pub fn weight(&self) -> f64 {
        1.0 / (self.mag_err * self.mag_err)
    }
}

/// One point of a coadded light curve: every measurement of a band taken
/// during the same night, combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoaddedPoint {
    pub mjd: f64,
    pub mag: f64,
    pub mag_err: f64,
    pub band: String,
    /// Number of raw measurements folded into this point
    pub n_obs: usize,
}

impl CoaddedPoint {
    pub fn night(&self) -> i64 {
        night_of(self.mjd)
    }
}

/// An observing season: a labelled half-open range of integer nights
/// `[start, end)`.
///
/// Membership is decided on the integer-truncated MJD of an observation.
///
/// # Examples
///
/// ```
/// use ozdes_lightcurve::core::domain::Season;
///
/// let y1 = Season::new("Y1", 56520, 56710);
/// assert!(y1.contains_night(56520));
/// assert!(!y1.contains_night(56710));
/// assert!(y1.contains_mjd(56709.9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub label: String,
    pub start: i64,
    pub end: i64,
}

impl Season {
    pub fn new(label: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    pub fn contains_night(&self, night: i64) -> bool {
        night >= self.start && night < self.end
    }

    pub fn contains_mjd(&self, mjd: f64) -> bool {
        self.contains_night(night_of(mjd))
    }

    /// Returns `true` if the two seasons share at least one night.
    pub fn overlaps(&self, other: &Season) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Number of nights covered by the season.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).max(0)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (mjd_to_date(self.start as f64), mjd_to_date(self.end as f64)) {
            (Some(start), Some(end)) => write!(
                f,
                "{} [{}, {}) ({} .. {})",
                self.label, self.start, self.end, start, end
            ),
            _ => write!(f, "{} [{}, {})", self.label, self.start, self.end),
        }
    }
}
