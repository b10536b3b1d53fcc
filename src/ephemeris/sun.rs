//! Low-precision solar position: mean longitude plus equation of center,
//! reduced to apparent longitude and converted through the corrected
//! obliquity. Accuracy is on the order of an arcminute, which is far
//! below the half-degree granularity of any rise/set decision downstream.

use super::{ecliptic_to_equatorial, obliquity_corrected};
use crate::coords::{Equatorial, DEG};
use crate::time::{julian_century, normalize_degrees};

/// Geometric mean longitude, degrees.
fn mean_longitude(t: f64) -> f64 {
    normalize_degrees(280.46646 + t * (36000.76983 + t * 0.0003032))
}

/// Mean anomaly, degrees.
fn mean_anomaly(t: f64) -> f64 {
    normalize_degrees(357.52911 + t * (35999.05029 - t * 0.0001537))
}

/// Equation of center, degrees.
fn equation_of_center(t: f64) -> f64 {
    let m = mean_anomaly(t) * DEG;
    m.sin() * (1.914602 - t * (0.004817 + t * 0.000014))
        + (2.0 * m).sin() * (0.019993 - t * 0.000101)
        + (3.0 * m).sin() * 0.000289
}

/// Apparent ecliptic longitude, degrees: true longitude corrected for
/// nutation and aberration.
pub(crate) fn apparent_longitude(t: f64) -> f64 {
    let omega = 125.04 - 1934.136 * t;
    mean_longitude(t) + equation_of_center(t) - 0.00569 - 0.00478 * (omega * DEG).sin()
}

/// Apparent geocentric equatorial position of the Sun.
pub(crate) fn position(jd: f64) -> Equatorial {
    let t = julian_century(jd);
    let lambda = apparent_longitude(t);
    // the Sun sits on the ecliptic: latitude is zero
    ecliptic_to_equatorial(lambda, 0.0, obliquity_corrected(t))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn meeus_example_25a() {
        // 1992 October 13.0 TD, JD 2448908.5
        let eq = position(2_448_908.5);
        assert!((eq.ra_deg - 198.38083).abs() < 0.01, "RA {}", eq.ra_deg);
        assert!((eq.dec_deg + 7.78507).abs() < 0.01, "Dec {}", eq.dec_deg);
    }

    #[test]
    fn j2000_reference() {
        // J2000.0 noon: published apparent RA 281.287, Dec -23.034.
        // The low-precision model carries ~0.01 degrees of intrinsic
        // error in RA here (nutation in longitude is folded into a
        // constant), hence the wider bound.
        let eq = position(2_451_545.0);
        assert!((eq.ra_deg - 281.287).abs() < 0.02, "RA {}", eq.ra_deg);
        assert!((eq.dec_deg + 23.034).abs() < 0.01, "Dec {}", eq.dec_deg);
    }

    #[test]
    fn declination_stays_within_obliquity() {
        let mut jd = 2_451_545.0;
        for _ in 0..60 {
            let eq = position(jd);
            assert!(eq.dec_deg.abs() < 23.5);
            assert!((0.0..360.0).contains(&eq.ra_deg));
            jd += 6.1;
        }
    }
}
