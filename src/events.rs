//! Event searches: sunset/sunrise bracketing, visibility spans over a
//! darkness window, the fixed-threshold imaging walk and the moon
//! altitude profile.
//!
//! Every search is a coarse grid scan. Nothing here raises an error: a
//! scan that finds no crossing degrades to its starting guess and the
//! caller recognizes the degenerate geometry (see the night builder).

use hifitime::{Epoch, Unit};
use log::warn;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::constants::{
    IMAGING_MIN_ALT_DEG, IMAGING_SUNRISE_MARGIN_H, IMAGING_WALK_STEP_MIN, MOON_PROFILE_STEP_MIN,
    SPAN_SAMPLE_STEP_MIN, SUN_RISE_SET_ALT_DEG, SUN_SCAN_STEP_MIN, SUN_SCAN_WINDOW_H,
};
use crate::coords::{equatorial_to_horizontal, Equatorial, HorizontalPosition};
use crate::ephemeris::{moon, Body, Sun};
use crate::horizon::DirectionalAltitudeProfile;
use crate::site::GeoCoordinate;
use crate::time::julian_date;

/// Minimum-altitude rule for a span search: a fixed altitude, or the
/// azimuth-dependent directional horizon.
pub(crate) enum Threshold<'a> {
    Fixed(f64),
    Directional(&'a DirectionalAltitudeProfile),
}

impl Threshold<'_> {
    fn min_altitude_at(&self, azimuth_deg: f64) -> f64 {
        match self {
            Self::Fixed(alt) => *alt,
            Self::Directional(profile) => profile.min_altitude_at(azimuth_deg),
        }
    }
}

/// A continuous interval during one night in which a body stays above
/// its visibility threshold. Confined to the darkness window; only the
/// first rise-to-set cycle of a night is modeled.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VisibilitySpan {
    pub rise: Epoch,
    pub set: Epoch,
    /// Azimuth at the rise instant
    pub rise_azimuth_deg: f64,
    /// Azimuth at the set instant
    pub set_azimuth_deg: f64,
    /// Effective threshold at the rise azimuth
    pub rise_min_alt_deg: f64,
    /// Effective threshold at the set azimuth
    pub set_min_alt_deg: f64,
    /// The body was already above threshold when darkness began; `rise`
    /// is the window start, not a true rise event
    pub already_up_at_start: bool,
    /// Still above threshold at the window end; `set` is the window end
    pub still_up_at_end: bool,
}

impl VisibilitySpan {
    pub fn duration_hours(&self) -> f64 {
        (self.set - self.rise).to_unit(Unit::Hour)
    }

    /// Whether an instant falls inside the span (half-open on the set
    /// side, so a body that just set counts as down).
    pub fn contains(&self, t: Epoch) -> bool {
        t >= self.rise && t < self.set
    }
}

/// Sun altitude at an instant.
pub(crate) fn sun_altitude_deg(t: Epoch, site: &GeoCoordinate) -> f64 {
    body_position(&Sun, t, site).altitude_deg
}

fn body_position(body: &dyn Body, t: Epoch, site: &GeoCoordinate) -> HorizontalPosition {
    let jd = julian_date(t);
    equatorial_to_horizontal(body.position(jd), jd, site.latitude_deg, site.longitude_deg)
}

/// Last instant the sun is still above the rise/set altitude before
/// dropping below, scanning a 5-minute grid forward from `scan_start`.
///
/// Falls back to `scan_start` when the scan window holds no crossing
/// (polar day/night); the caller must treat the resulting degenerate
/// darkness window as "no usable night", not as a real event.
pub(crate) fn find_sunset(site: &GeoCoordinate, scan_start: Epoch) -> Epoch {
    let steps = (SUN_SCAN_WINDOW_H * 60.0 / SUN_SCAN_STEP_MIN) as usize;
    let mut prev = scan_start;
    let mut prev_above = sun_altitude_deg(prev, site) > SUN_RISE_SET_ALT_DEG;

    for i in 1..=steps {
        let t = scan_start + (i as f64) * SUN_SCAN_STEP_MIN * Unit::Minute;
        let above = sun_altitude_deg(t, site) > SUN_RISE_SET_ALT_DEG;
        if prev_above && !above {
            return prev;
        }
        prev = t;
        prev_above = above;
    }

    warn!("no sunset crossing in scan window from {scan_start}, falling back");
    scan_start
}

/// First instant the sun climbs back above the rise/set altitude,
/// scanning forward from `scan_start`. Same fallback contract as
/// [find_sunset].
pub(crate) fn find_sunrise(site: &GeoCoordinate, scan_start: Epoch) -> Epoch {
    let steps = (SUN_SCAN_WINDOW_H * 60.0 / SUN_SCAN_STEP_MIN) as usize;
    let mut prev_above = sun_altitude_deg(scan_start, site) > SUN_RISE_SET_ALT_DEG;

    for i in 1..=steps {
        let t = scan_start + (i as f64) * SUN_SCAN_STEP_MIN * Unit::Minute;
        let above = sun_altitude_deg(t, site) > SUN_RISE_SET_ALT_DEG;
        if !prev_above && above {
            return t;
        }
        prev_above = above;
    }

    warn!("no sunrise crossing in scan window from {scan_start}, falling back");
    scan_start
}

#[derive(PartialEq)]
enum Tracking {
    BelowThreshold,
    AboveThreshold,
}

#[derive(Copy, Clone)]
struct Sample {
    t: Epoch,
    azimuth_deg: f64,
    min_alt_deg: f64,
}

/// Search `[start, end]` on a 10-minute grid for the first interval the
/// body spends above threshold.
///
/// A body already up at `start` gets `rise == start` with the flag set;
/// a body still up at `end` gets `set == end` likewise. Only the first
/// rise-to-set cycle is captured: a body that sets behind an obstruction
/// and clears it again before dawn keeps only its first span.
pub(crate) fn find_visibility_span(
    body: &dyn Body,
    site: &GeoCoordinate,
    start: Epoch,
    end: Epoch,
    threshold: Threshold,
) -> Option<VisibilitySpan> {
    if end <= start {
        return None;
    }

    let mut state = Tracking::BelowThreshold;
    let mut span: Option<VisibilitySpan> = None;
    let mut last_above: Option<Sample> = None;
    let mut t = start;

    loop {
        let pos = body_position(body, t, site);
        let min_alt = threshold.min_altitude_at(pos.azimuth_deg);
        let above = pos.altitude_deg >= min_alt;

        match state {
            Tracking::BelowThreshold => {
                if above {
                    span = Some(VisibilitySpan {
                        rise: t,
                        set: t,
                        rise_azimuth_deg: pos.azimuth_deg,
                        set_azimuth_deg: pos.azimuth_deg,
                        rise_min_alt_deg: min_alt,
                        set_min_alt_deg: min_alt,
                        already_up_at_start: t == start,
                        still_up_at_end: false,
                    });
                    state = Tracking::AboveThreshold;
                }
            },
            Tracking::AboveThreshold => {
                if !above {
                    // set at the last above sample; later re-rises are
                    // outside the single-span model and dropped
                    if let (Some(span), Some(sample)) = (span.as_mut(), last_above) {
                        span.set = sample.t;
                        span.set_azimuth_deg = sample.azimuth_deg;
                        span.set_min_alt_deg = sample.min_alt_deg;
                    }
                    return span;
                }
            },
        }

        if above {
            last_above = Some(Sample {
                t,
                azimuth_deg: pos.azimuth_deg,
                min_alt_deg: min_alt,
            });
        }

        if t == end {
            break;
        }
        t = (t + SPAN_SAMPLE_STEP_MIN * Unit::Minute).min(end);
    }

    if state == Tracking::AboveThreshold {
        if let (Some(span), Some(sample)) = (span.as_mut(), last_above) {
            span.set = end;
            span.set_azimuth_deg = sample.azimuth_deg;
            span.set_min_alt_deg = sample.min_alt_deg;
            span.still_up_at_end = true;
        }
    }

    span
}

/// Hours a target can be imaged starting at `from`: zero when it is
/// already below the fixed 30-degree floor, otherwise a 15-minute walk
/// until it drops below or until one hour before the following sunrise.
pub(crate) fn imaging_window_hours(
    target: Equatorial,
    site: &GeoCoordinate,
    from: Epoch,
    next_sunrise: Epoch,
) -> f64 {
    let jd = julian_date(from);
    let pos = equatorial_to_horizontal(target, jd, site.latitude_deg, site.longitude_deg);
    if pos.altitude_deg < IMAGING_MIN_ALT_DEG {
        return 0.0;
    }

    let stop = next_sunrise - IMAGING_SUNRISE_MARGIN_H * Unit::Hour;
    let mut t = from;
    loop {
        let next = t + IMAGING_WALK_STEP_MIN * Unit::Minute;
        if next > stop {
            break;
        }
        let jd = julian_date(next);
        let pos = equatorial_to_horizontal(target, jd, site.latitude_deg, site.longitude_deg);
        if pos.altitude_deg < IMAGING_MIN_ALT_DEG {
            break;
        }
        t = next;
    }

    (t - from).to_unit(Unit::Hour)
}

/// One moon altitude sample for the host's night chart.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MoonSample {
    pub at: Epoch,
    pub altitude_deg: f64,
}

/// Moon altitude every 20 minutes across the darkness window. The
/// cadence and bounds are part of the public contract; the engine itself
/// never reads these samples back.
pub(crate) fn moon_altitude_profile(
    site: &GeoCoordinate,
    start: Epoch,
    end: Epoch,
) -> Vec<MoonSample> {
    let mut samples = Vec::new();
    let mut t = start;
    while t <= end {
        let jd = julian_date(t);
        let pos = equatorial_to_horizontal(
            moon::position(jd),
            jd,
            site.latitude_deg,
            site.longitude_deg,
        );
        samples.push(MoonSample {
            at: t,
            altitude_deg: pos.altitude_deg,
        });
        t = t + MOON_PROFILE_STEP_MIN * Unit::Minute;
    }
    samples
}
