//! Night context assembly: one calendar date in, one fully populated
//! [NightResult] out (or nothing, when the site gets no usable darkness
//! that date).

use chrono::NaiveDate;
use chrono_tz::Tz;
use hifitime::{Epoch, Unit};
use log::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cfg::Config;
use crate::constants::OVERLAP_BUCKET_MIN;
use crate::coords::{
    angular_separation_equatorial, equatorial_to_horizontal, Equatorial, DEG,
};
use crate::ephemeris::{moon, sun, FixedBody, Moon};
use crate::events::{
    find_sunrise, find_sunset, find_visibility_span, imaging_window_hours, moon_altitude_profile,
    MoonSample, Threshold, VisibilitySpan,
};
use crate::rating::{rate, Rating};
use crate::site::{CelestialTarget, GeoCoordinate};
use crate::time::{julian_date, local_hour_epoch};

/// One observing night's boundaries.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NightWindow {
    pub sunset: Epoch,
    pub sunrise: Epoch,
    /// Sunset plus the dusk buffer
    pub darkness_start: Epoch,
    /// Sunrise minus the dawn buffer
    pub darkness_end: Epoch,
    pub dark_hours: f64,
    /// Midpoint of the sunset-to-sunrise interval
    pub midnight_reference: Epoch,
}

/// Everything computed for one calendar date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NightResult {
    pub date: NaiveDate,
    pub window: NightWindow,
    /// Illuminated fraction of the lunar disk, percent [0, 100]
    pub moon_phase_pct: f64,
    /// Moon altitude at the observation instant
    pub moon_altitude_deg: f64,
    /// When the moon is above the geometric horizon during darkness
    pub moon_span: Option<VisibilitySpan>,
    /// 20-minute moon altitude samples for the host's chart
    pub moon_profile: Vec<MoonSample>,
    /// One entry per requested target, input order preserved
    pub targets: Vec<TargetNightResult>,
}

/// One target crossed with one night.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TargetNightResult {
    pub target_id: String,
    /// Altitude at the observation instant
    pub target_alt_deg: f64,
    /// Target-moon separation at the observation instant
    pub moon_separation_deg: f64,
    /// Fixed-threshold imaging walk from the observation instant
    pub imaging_window_hours: f64,
    /// Directional-horizon visibility during darkness
    pub span: Option<VisibilitySpan>,
    pub hours_moon_down: f64,
    pub hours_moon_up: f64,
    /// Mean target-moon separation over the moon-up buckets; absent
    /// when the moon never intrudes on the span
    pub avg_separation_moon_up: Option<f64>,
    pub rating: Rating,
}

/// Build the full context for one date. `None` means the darkness window
/// is degenerate (polar twilight, failed sun search): a defined empty
/// outcome, not an error.
pub(crate) fn build_night(
    site: &GeoCoordinate,
    tz: Tz,
    cfg: &Config,
    date: NaiveDate,
    targets: &[CelestialTarget],
) -> Option<NightResult> {
    let noon = local_hour_epoch(date, 12, tz);
    let sunset = find_sunset(site, noon);
    let sunrise = find_sunrise(site, sunset);

    let buffer = cfg.dusk_dawn_buffer_hours * Unit::Hour;
    let darkness_start = sunset + buffer;
    let darkness_end = sunrise - buffer;
    if darkness_end <= darkness_start {
        debug!("{date}: degenerate darkness window, skipping night");
        return None;
    }

    let window = NightWindow {
        sunset,
        sunrise,
        darkness_start,
        darkness_end,
        dark_hours: (darkness_end - darkness_start).to_unit(Unit::Hour),
        midnight_reference: sunset + 0.5 * (sunrise - sunset).to_seconds() * Unit::Second,
    };

    let observation = local_hour_epoch(date, cfg.observation_hour, tz);
    let jd_obs = julian_date(observation);

    let sun_eq = sun::position(jd_obs);
    let moon_eq = moon::position(jd_obs);
    let elongation = angular_separation_equatorial(sun_eq, moon_eq);
    let moon_phase_pct = (1.0 - (elongation * DEG).cos()) / 2.0 * 100.0;
    let moon_altitude_deg =
        equatorial_to_horizontal(moon_eq, jd_obs, site.latitude_deg, site.longitude_deg)
            .altitude_deg;

    // the moon moves ~0.5 degrees/hour: its span recomputes the position
    // at every sample instead of reusing moon_eq
    let moon_span =
        find_visibility_span(&Moon, site, darkness_start, darkness_end, Threshold::Fixed(0.0));
    let moon_profile = moon_altitude_profile(site, darkness_start, darkness_end);

    let targets = targets
        .iter()
        .map(|target| {
            build_target_night(
                site,
                cfg,
                target,
                observation,
                jd_obs,
                &window,
                moon_span.as_ref(),
                moon_eq,
                moon_phase_pct,
            )
        })
        .collect();

    Some(NightResult {
        date,
        window,
        moon_phase_pct,
        moon_altitude_deg,
        moon_span,
        moon_profile,
        targets,
    })
}

#[allow(clippy::too_many_arguments)]
fn build_target_night(
    site: &GeoCoordinate,
    cfg: &Config,
    target: &CelestialTarget,
    observation: Epoch,
    jd_obs: f64,
    window: &NightWindow,
    moon_span: Option<&VisibilitySpan>,
    moon_eq: Equatorial,
    moon_phase_pct: f64,
) -> TargetNightResult {
    let eq = Equatorial::new(target.ra_deg, target.dec_deg);
    let position = equatorial_to_horizontal(eq, jd_obs, site.latitude_deg, site.longitude_deg);
    let moon_separation_deg = angular_separation_equatorial(eq, moon_eq);
    let imaging = imaging_window_hours(eq, site, observation, window.sunrise);

    let span = find_visibility_span(
        &FixedBody(eq),
        site,
        window.darkness_start,
        window.darkness_end,
        Threshold::Directional(&cfg.horizon),
    );

    let (hours_moon_down, hours_moon_up, avg_separation_moon_up) = match &span {
        Some(span) => moon_overlap(span, moon_span, eq, site),
        None => (0.0, 0.0, None),
    };

    let rating = rate(
        moon_phase_pct,
        hours_moon_down,
        hours_moon_up,
        avg_separation_moon_up,
        &cfg.moon_tiers,
    );

    TargetNightResult {
        target_id: target.id.clone(),
        target_alt_deg: position.altitude_deg,
        moon_separation_deg,
        imaging_window_hours: imaging,
        span,
        hours_moon_down,
        hours_moon_up,
        avg_separation_moon_up,
        rating,
    }
}

/// Partition a target's visible interval into 10-minute buckets and
/// split it into moon-down and moon-up time. Buckets classify at their
/// start instant; the trailing partial bucket contributes its true
/// remainder, so the two sums tile the span exactly.
pub(crate) fn moon_overlap(
    span: &VisibilitySpan,
    moon_span: Option<&VisibilitySpan>,
    target: Equatorial,
    site: &GeoCoordinate,
) -> (f64, f64, Option<f64>) {
    let mut hours_down = 0.0;
    let mut hours_up = 0.0;
    let mut separation_sum = 0.0;
    let mut up_buckets = 0u32;

    let mut t = span.rise;
    while t < span.set {
        let bucket_end = (t + OVERLAP_BUCKET_MIN * Unit::Minute).min(span.set);
        let hours = (bucket_end - t).to_unit(Unit::Hour);

        let moon_up = moon_span.is_some_and(|moon| moon.contains(t));
        if moon_up {
            hours_up += hours;
            up_buckets += 1;
            let jd = julian_date(t);
            separation_sum += angular_separation_equatorial(target, moon::position(jd));
        } else {
            hours_down += hours;
        }

        t = bucket_end;
    }

    let avg = (up_buckets > 0).then(|| separation_sum / up_buckets as f64);
    (hours_down, hours_up, avg)
}
