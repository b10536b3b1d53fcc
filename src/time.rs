//! Time kernel: Julian dates, sidereal time and local wall-clock anchoring.
//!
//! Every instant inside the engine is a hifitime [Epoch]; Julian dates are
//! derived from Unix seconds and only ever exist as transient `f64`s fed
//! to the ephemeris and coordinate transforms. Civil time (calendar dates,
//! IANA zones) is confined to this module's boundary helpers.

use chrono::{LocalResult, NaiveDate, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use hifitime::Epoch;

/// Julian date of the Unix epoch (1970-01-01T00:00:00 UTC)
pub(crate) const JD_UNIX_EPOCH: f64 = 2440587.5;

/// Julian date of J2000.0 (2000-01-01T12:00:00 TT)
pub(crate) const JD_J2000: f64 = 2451545.0;

pub(crate) const SECONDS_PER_DAY: f64 = 86400.0;

/// Julian date for an [Epoch].
pub(crate) fn julian_date(t: Epoch) -> f64 {
    t.to_unix_seconds() / SECONDS_PER_DAY + JD_UNIX_EPOCH
}

/// Julian centuries since J2000.0.
pub(crate) fn julian_century(jd: f64) -> f64 {
    (jd - JD_J2000) / 36525.0
}

/// Wrap an angle to [0, 360) degrees.
pub(crate) fn normalize_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Wrap an angle to [-180, 180) degrees.
pub(crate) fn wrap_degrees_180(deg: f64) -> f64 {
    normalize_degrees(deg + 180.0) - 180.0
}

/// Greenwich mean sidereal time, degrees in [0, 360).
pub(crate) fn gmst_degrees(jd: f64) -> f64 {
    let t = julian_century(jd);
    normalize_degrees(
        280.46061837 + 360.98564736629 * (jd - JD_J2000) + 0.000387933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Local sidereal time for an east-positive longitude, degrees in [0, 360).
pub(crate) fn local_sidereal_degrees(jd: f64, longitude_deg: f64) -> f64 {
    normalize_degrees(gmst_degrees(jd) + longitude_deg)
}

/// UTC [Epoch] of `date` at local wall-clock `hour` in zone `tz`.
///
/// Total over DST transitions: a fold resolves to the earliest mapping,
/// a gap steps forward until the wall clock exists again. An hour > 23
/// saturates to 23 (config validation rejects it upstream).
pub(crate) fn local_hour_epoch(date: NaiveDate, hour: u32, tz: Tz) -> Epoch {
    let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let mut naive = date.and_time(time);

    for _ in 0..8 {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                return Epoch::from_unix_seconds(dt.timestamp() as f64);
            },
            LocalResult::None => {
                naive += TimeDelta::minutes(30);
            },
        }
    }

    // DST gaps are bounded; reinterpret as UTC rather than loop forever
    Epoch::from_unix_seconds(naive.and_utc().timestamp() as f64)
}
