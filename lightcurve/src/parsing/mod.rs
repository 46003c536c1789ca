//! Parsers for the text tables the pipeline reads.
//!
//! Catalog query results arrive as tab-separated `.tab` files, earlier light
//! curves as whitespace-aligned text, and some tooling exports CSV. All of
//! them end up as Polars DataFrames.
//!
//! # Parsers
//!
//! - [`table_parser`]: Format detection, whitespace normalisation and CSV reading
//!
//! # Example
//!
//! ```no_run
//! use ozdes_lightcurve::parsing::table_parser::{read_table_str, TableFormat};
//!
//! let text = std::fs::read_to_string("previous/2925344776_lc.txt").unwrap();
//! let df = read_table_str(&text, TableFormat::Whitespace, true).unwrap();
//! ```

pub mod table_parser;


pub use table_parser::{normalize_whitespace, read_delimited_str, read_table_str, TableFormat};
