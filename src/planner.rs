//! Top-level planning engine.
//!
//! A [Planner] owns a validated site and configuration and exposes the
//! two calculation entry points: [Planner::plan] for the per-night
//! result tree and [Planner::suggest] for gap-filling candidates. It is
//! stateless between calls; inputs are borrowed, outputs are freshly
//! allocated, and a single instance may serve concurrent callers.

use chrono::NaiveDate;
use chrono_tz::Tz;
use log::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cfg::{Config, DateRange};
use crate::error::Error;
use crate::estimator::VisibilityRef;
use crate::night::{build_night, NightResult};
use crate::site::{CelestialTarget, GeoCoordinate};
use crate::suggest::{self, SuggestionCandidate};

/// The aggregate outcome of one calculation request: one [NightResult]
/// per usable night, in range order. Degenerate nights are omitted, so
/// the list may be shorter than the requested day count.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PlanResult {
    pub nights: Vec<NightResult>,
}

/// Session planning engine for one observer site.
pub struct Planner {
    /// Engine parametrization
    pub cfg: Config,
    site: GeoCoordinate,
    tz: Tz,
}

impl Planner {
    /// Build a planner, resolving the site's IANA timezone and
    /// validating the configuration. This is the only fallible boundary;
    /// every calculation past it is total.
    pub fn new(site: GeoCoordinate, cfg: Config) -> Result<Self, Error> {
        let tz = site.tz()?;
        cfg.validate()?;
        Ok(Self { cfg, site, tz })
    }

    pub fn site(&self) -> &GeoCoordinate {
        &self.site
    }

    /// Compute the full per-night result tree for `targets` across
    /// `range`. CPU-bound; for wide ranges run it on a worker thread.
    pub fn plan(&self, targets: &[CelestialTarget], range: DateRange) -> PlanResult {
        debug!(
            "planning {} day(s) x {} target(s) at ({:.3}, {:.3})",
            range.days,
            targets.len(),
            self.site.latitude_deg,
            self.site.longitude_deg
        );

        let nights = range
            .dates()
            .filter_map(|date| build_night(&self.site, self.tz, &self.cfg, date, targets))
            .collect();

        PlanResult { nights }
    }

    /// Rank unselected `catalog` targets by how well they fill the
    /// darkness time `selected` leaves uncovered across `range`. Returns
    /// at most twelve candidates, best first.
    pub fn suggest(
        &self,
        catalog: &[CelestialTarget],
        selected: &[CelestialTarget],
        range: DateRange,
    ) -> Vec<SuggestionCandidate> {
        suggest::suggest(self, catalog, selected, range)
    }

    /// Precompute the shared reference state for a catalog-scale
    /// [VisibilityRef::estimate] sweep anchored at `reference_date`.
    pub fn visibility_ref(&self, reference_date: NaiveDate) -> VisibilityRef {
        VisibilityRef::new(&self.site, self.tz, reference_date)
    }

    /// One night's context, built with this planner's configuration.
    pub(crate) fn night(
        &self,
        date: NaiveDate,
        targets: &[CelestialTarget],
    ) -> Option<NightResult> {
        build_night(&self.site, self.tz, &self.cfg, date, targets)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_rejects_unknown_timezone() {
        let site = GeoCoordinate::new(0.0, 0.0, 0.0, "Not/AZone").unwrap();
        assert!(matches!(
            Planner::new(site, Config::default()),
            Err(Error::UnknownTimezone(_))
        ));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let site = GeoCoordinate::new(33.749, -84.388, 320.0, "America/New_York").unwrap();
        let cfg = Config {
            observation_hour: 99,
            ..Default::default()
        };
        assert_eq!(
            Planner::new(site, cfg).err(),
            Some(Error::InvalidObservationHour(99))
        );
    }
}
