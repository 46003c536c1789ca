//! Core domain models for photometric light curves.
//!
//! This module defines the fundamental data structures used throughout the crate,
//! representing calibrated photometry points, coadded nightly points, observing
//! seasons, and the column names of the tables passed between pipeline stages.

pub mod columns;
pub mod domain;
pub mod frame;

pub use domain::{CoaddedPoint, PhotometryPoint, Season};
pub use frame::{coadded_to_frame, frame_to_points};
