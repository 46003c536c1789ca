use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// MJD 0 (1858-11-17 00:00:00 UTC)
fn mjd_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1858, 11, 17, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Integer night an observation belongs to.
///
/// Truncates toward zero, so for the positive dates that survive quality
/// filtering this is the floor of the MJD.
///
/// # Example
/// ```
/// use ozdes_lightcurve::time::night_of;
/// assert_eq!(night_of(56543.91), 56543);
/// ```
pub fn night_of(mjd: f64) -> i64 {
    mjd.trunc() as i64
}

/// Convert a Modified Julian Date to a UTC datetime.
///
/// Returns `None` for non-finite values or dates chrono cannot represent.
pub fn mjd_to_datetime(mjd: f64) -> Option<DateTime<Utc>> {
    if !mjd.is_finite() {
        return None;
    }
    let micros = (mjd * SECONDS_PER_DAY * 1e6).round();
    if micros.abs() > i64::MAX as f64 {
        return None;
    }
    mjd_epoch().checked_add_signed(Duration::microseconds(micros as i64))
}

/// Calendar date (UTC) of a Modified Julian Date
pub fn mjd_to_date(mjd: f64) -> Option<NaiveDate> {
    mjd_to_datetime(mjd).map(|dt| dt.date_naive())
}
