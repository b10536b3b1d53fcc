//! Fast first-visibility estimation for catalog-scale scans.
//!
//! The exact night-by-night walk costs a full grid scan per target per
//! night; browsing a catalog of hundreds of objects over a year cannot
//! afford it. This estimator precomputes one [VisibilityRef] per request
//! and then answers "when does this target first become observable" per
//! target in constant time from hour-angle geometry, followed by a small
//! bounded verification pass of direct altitude checks. The answer is
//! advisory (a date, not an event instant) and carries an error band of
//! a few days; nothing downstream rates or filters on it.

use chrono::{Days, NaiveDate};
use chrono_tz::Tz;
use hifitime::{Epoch, Unit};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::constants::{NIGHT_HALF_WINDOW_DEG, SIDEREAL_DRIFT_DEG_PER_DAY};
use crate::coords::{equatorial_to_horizontal, Equatorial, DEG};
use crate::site::{CelestialTarget, GeoCoordinate};
use crate::time::{julian_date, local_hour_epoch, local_sidereal_degrees, wrap_degrees_180};

/// Per-request precomputed reference state, shared across every target
/// of a catalog scan so none of them re-derives epoch arithmetic.
#[derive(Debug, Clone)]
pub struct VisibilityRef {
    site: GeoCoordinate,
    tz: Tz,
    /// Civil midnight at the end of the reference date
    pub reference_midnight: Epoch,
    pub reference_date: NaiveDate,
    /// Julian date of the reference midnight
    pub jd: f64,
    /// Local sidereal time at the reference midnight, degrees
    pub lst_deg: f64,
    /// Observer latitude, radians
    pub lat_rad: f64,
}

/// Estimator verdict for one target.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FastVisibility {
    /// The target's transit altitude never reaches the threshold from
    /// this latitude; `peak_date` is when it culminates highest anyway.
    NeverClears {
        max_altitude_deg: f64,
        peak_date: NaiveDate,
    },
    /// Expected observable from `first_date` (0 days away = tonight).
    Visible {
        first_date: NaiveDate,
        days_away: i64,
    },
}

impl VisibilityRef {
    pub(crate) fn new(site: &GeoCoordinate, tz: Tz, reference_date: NaiveDate) -> Self {
        let next_day = reference_date
            .checked_add_days(Days::new(1))
            .unwrap_or(reference_date);
        let reference_midnight = local_hour_epoch(next_day, 0, tz);
        let jd = julian_date(reference_midnight);
        Self {
            site: site.clone(),
            tz,
            reference_midnight,
            reference_date,
            jd,
            lst_deg: local_sidereal_degrees(jd, site.longitude_deg),
            lat_rad: site.latitude_deg * DEG,
        }
    }

    /// Estimate when `target` first clears `min_alt_deg` during a night.
    pub fn estimate(&self, target: &CelestialTarget, min_alt_deg: f64) -> FastVisibility {
        let max_alt = target.max_altitude_deg(self.site.latitude_deg);
        if max_alt < min_alt_deg {
            return FastVisibility::NeverClears {
                max_altitude_deg: max_alt,
                peak_date: self.transit_date(target),
            };
        }

        let dec = target.dec_deg * DEG;
        // hour angle at which altitude equals the threshold
        let cos_ha = ((min_alt_deg * DEG).sin() - dec.sin() * self.lat_rad.sin())
            / (dec.cos() * self.lat_rad.cos());

        if cos_ha >= 1.0 {
            // numerically on the never-rises edge despite the max-alt gate
            return FastVisibility::NeverClears {
                max_altitude_deg: max_alt,
                peak_date: self.transit_date(target),
            };
        }
        let half_width_deg = if cos_ha <= -1.0 {
            // circumpolar above the threshold
            180.0
        } else {
            cos_ha.acos() / DEG
        };

        // observable some time tonight when the midnight hour angle sits
        // inside the half-width padded by the dusk-to-dawn margin
        let window_deg = (half_width_deg + NIGHT_HALF_WINDOW_DEG).min(180.0);
        let ha_deg = wrap_degrees_180(self.lst_deg - target.ra_deg);

        let days_est = if ha_deg.abs() <= window_deg {
            0
        } else {
            // days until the drifting hour angle re-enters at -window
            let delta = (-window_deg - ha_deg).rem_euclid(360.0);
            (delta / SIDEREAL_DRIFT_DEG_PER_DAY).round() as i64
        };

        let first_date = self.verify(target, min_alt_deg, days_est.max(0) as u64);
        let days_away = (first_date - self.reference_date).num_days().max(0);
        FastVisibility::Visible {
            first_date,
            days_away,
        }
    }

    /// Date the target transits at the reference hour: when the drifting
    /// sidereal time catches up with its right ascension.
    fn transit_date(&self, target: &CelestialTarget) -> NaiveDate {
        let delta = (target.ra_deg - self.lst_deg).rem_euclid(360.0);
        let days = (delta / SIDEREAL_DRIFT_DEG_PER_DAY).round() as u64;
        self.reference_date
            .checked_add_days(Days::new(days))
            .unwrap_or(self.reference_date)
    }

    /// Bounded refinement: direct altitude checks at evening, midnight
    /// and predawn on the estimated date and a few weekly steps after
    /// it. Never a full-year scan; if nothing confirms, the estimate
    /// stands.
    fn verify(&self, target: &CelestialTarget, min_alt_deg: f64, days_est: u64) -> NaiveDate {
        let eq = Equatorial::new(target.ra_deg, target.dec_deg);

        for week in 0..=4u64 {
            let Some(date) = self
                .reference_date
                .checked_add_days(Days::new(days_est + week * 7))
            else {
                break;
            };
            let Some(next_day) = date.checked_add_days(Days::new(1)) else {
                break;
            };
            let midnight = local_hour_epoch(next_day, 0, self.tz);

            for offset_h in [-3.0, 0.0, 3.0] {
                let t = midnight + offset_h * Unit::Hour;
                let jd = julian_date(t);
                let pos = equatorial_to_horizontal(
                    eq,
                    jd,
                    self.site.latitude_deg,
                    self.site.longitude_deg,
                );
                if pos.altitude_deg >= min_alt_deg {
                    return date;
                }
            }
        }

        self.reference_date
            .checked_add_days(Days::new(days_est))
            .unwrap_or(self.reference_date)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reference() -> VisibilityRef {
        let site = GeoCoordinate::new(33.749, -84.388, 320.0, "America/New_York").unwrap();
        let tz = site.tz().unwrap();
        VisibilityRef::new(&site, tz, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
    }

    #[test]
    fn never_rises_branch() {
        let vref = reference();
        // dec -80 from latitude 33.7: transit altitude is negative
        let target = CelestialTarget::new("S", "far south", 100.0, -80.0, None);
        match vref.estimate(&target, 0.0) {
            FastVisibility::NeverClears {
                max_altitude_deg, ..
            } => {
                assert!(max_altitude_deg < 0.0);
            },
            other => panic!("expected NeverClears, got {other:?}"),
        }
    }

    #[test]
    fn below_threshold_but_above_horizon_never_clears() {
        let vref = reference();
        // peaks at ~16 degrees: above the horizon, below a 30-degree floor
        let target = CelestialTarget::new("L", "low", 100.0, -40.0, None);
        match vref.estimate(&target, 30.0) {
            FastVisibility::NeverClears {
                max_altitude_deg, ..
            } => {
                assert!(max_altitude_deg > 0.0 && max_altitude_deg < 30.0);
            },
            other => panic!("expected NeverClears, got {other:?}"),
        }
    }

    #[test]
    fn winter_target_visible_immediately() {
        let vref = reference();
        // M42 culminates near midnight in mid-January
        let m42 = CelestialTarget::new("M42", "Orion Nebula", 83.82, -5.39, Some(4.0));
        match vref.estimate(&m42, 20.0) {
            FastVisibility::Visible { days_away, .. } => {
                assert_eq!(days_away, 0, "M42 should be up in January");
            },
            other => panic!("expected Visible, got {other:?}"),
        }
    }

    #[test]
    fn out_of_season_target_months_away() {
        let vref = reference();
        // RA 270 is a summer object seen from a January reference
        let summer = CelestialTarget::new("M17", "Omega Nebula", 275.2, -16.2, Some(6.0));
        match vref.estimate(&summer, 30.0) {
            FastVisibility::Visible { days_away, .. } => {
                assert!(
                    (30..=330).contains(&days_away),
                    "expected months away, got {days_away}"
                );
            },
            other => panic!("expected Visible, got {other:?}"),
        }
    }

    #[test]
    fn circumpolar_target_is_immediate() {
        let vref = reference();
        // dec 85 from latitude 33.7: never sets, always above 25 degrees
        let polar = CelestialTarget::new("P", "polar", 37.9, 89.3, None);
        match vref.estimate(&polar, 20.0) {
            FastVisibility::Visible { days_away, .. } => {
                assert_eq!(days_away, 0);
            },
            other => panic!("expected Visible, got {other:?}"),
        }
    }
}
