//! Source location lists and the catalog queries that fetch their raw
//! photometry.

pub mod locations;
pub mod query;

pub use locations::{load_locations, parse_locations, SourceLocation};
pub use query::{ConeSearch, QueryPlan, CONE_HALF_WIDTH_DEG};
