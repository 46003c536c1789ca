pub mod mjd;

pub use mjd::{mjd_to_date, mjd_to_datetime, night_of};
