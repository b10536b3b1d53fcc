//! Low-precision solar and lunar ephemeris.
//!
//! Self-contained: no external kernels or almanac files. The solar model
//! is good to about an arcminute, the truncated lunar series to roughly
//! 0.3 degrees. Both are pure functions of the Julian date, total over
//! any input: far-future dates simply degrade in accuracy.

use crate::coords::{Equatorial, DEG};
use crate::time::normalize_degrees;

pub(crate) mod moon;
pub(crate) mod sun;

/// Mean obliquity of the ecliptic, degrees.
pub(crate) fn mean_obliquity(t: f64) -> f64 {
    23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0
}

/// Obliquity corrected for nutation, degrees.
pub(crate) fn obliquity_corrected(t: f64) -> f64 {
    let omega = 125.04 - 1934.136 * t;
    mean_obliquity(t) + 0.00256 * (omega * DEG).cos()
}

/// Ecliptic (longitude, latitude) to equatorial coordinates for a given
/// obliquity, all in degrees.
pub(crate) fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64, obliquity_deg: f64) -> Equatorial {
    let lon = lon_deg * DEG;
    let lat = lat_deg * DEG;
    let obl = obliquity_deg * DEG;

    let sin_ra = lon.sin() * obl.cos() - lat.tan() * obl.sin();
    let cos_ra = lon.cos();
    let ra = normalize_degrees(sin_ra.atan2(cos_ra) / DEG);

    let sin_dec = (lat.sin() * obl.cos() + lat.cos() * obl.sin() * lon.sin()).clamp(-1.0, 1.0);
    let dec = sin_dec.asin() / DEG;

    Equatorial::new(ra, dec)
}

/// A body the event finder can track across a night.
///
/// Deep-sky targets are fixed in the equatorial frame so their position
/// is independent of the sample instant; the Moon moves about half a
/// degree per hour and must be recomputed at every sample. The trait
/// makes both look the same to the sampling loops.
pub(crate) trait Body {
    fn position(&self, jd: f64) -> Equatorial;
}

/// The Sun, per [sun::position].
pub(crate) struct Sun;

impl Body for Sun {
    fn position(&self, jd: f64) -> Equatorial {
        sun::position(jd)
    }
}

/// The Moon, per [moon::position]. Recomputed at every sample.
pub(crate) struct Moon;

impl Body for Moon {
    fn position(&self, jd: f64) -> Equatorial {
        moon::position(jd)
    }
}

/// A deep-sky object pinned to catalog coordinates.
pub(crate) struct FixedBody(pub Equatorial);

impl Body for FixedBody {
    fn position(&self, _jd: f64) -> Equatorial {
        self.0
    }
}
