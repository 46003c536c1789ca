//! Reading catalog tables and historical light curves, writing results.
//!
//! # Example
//!
//! ```no_run
//! use ozdes_lightcurve::io::loaders::CatalogLoader;
//! use std::path::Path;
//!
//! let result = CatalogLoader::load_from_file(Path::new("query/DESY6_2925344776.tab"))
//!     .expect("Failed to load");
//! println!("Loaded {} detections of {}", result.num_rows, result.source_id);
//! ```

pub mod loaders;
pub mod writers;

#[cfg(test)]
mod loaders_tests;

pub use loaders::{source_id_from_path, CatalogLoadResult, CatalogLoader, HistoricalLoader};
pub use writers::{write_json_report, write_light_curve};
