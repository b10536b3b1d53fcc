//! Observer site and catalog target value types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use chrono_tz::Tz;

use crate::error::Error;

/// Observer site: geocoordinates plus the IANA zone that anchors the
/// nightly observation hour to wall-clock time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoCoordinate {
    /// Degrees, north positive, [-90, 90]
    pub latitude_deg: f64,
    /// Degrees, east positive, [-180, 180]
    pub longitude_deg: f64,
    /// Meters above sea level. Carried for the host (labels, export);
    /// the rise/set model does not apply a horizon-dip correction.
    pub elevation_m: f64,
    /// IANA timezone identifier, e.g. "America/New_York"
    pub timezone: String,
}

impl GeoCoordinate {
    /// Validated site. The timezone string is checked when the engine is
    /// built, not here, so a site can be constructed from untrusted input
    /// and the zone failure reported at the same boundary as the rest of
    /// the configuration.
    pub fn new(
        latitude_deg: f64,
        longitude_deg: f64,
        elevation_m: f64,
        timezone: impl Into<String>,
    ) -> Result<Self, Error> {
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(Error::InvalidLatitude(latitude_deg));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(Error::InvalidLongitude(longitude_deg));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            elevation_m,
            timezone: timezone.into(),
        })
    }

    /// Resolve the IANA identifier.
    pub(crate) fn tz(&self) -> Result<Tz, Error> {
        self.timezone
            .parse()
            .map_err(|_| Error::UnknownTimezone(self.timezone.clone()))
    }
}

/// A catalog or user-defined deep-sky object. RA/Dec validity is the
/// catalog/import layer's contract; the engine treats them as given.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CelestialTarget {
    pub id: String,
    pub name: String,
    /// Right ascension, degrees [0, 360)
    pub ra_deg: f64,
    /// Declination, degrees [-90, 90]
    pub dec_deg: f64,
    /// Apparent magnitude, when the catalog provides one
    pub magnitude: Option<f64>,
}

impl CelestialTarget {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        ra_deg: f64,
        dec_deg: f64,
        magnitude: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ra_deg,
            dec_deg,
            magnitude,
        }
    }

    /// Altitude at meridian transit for an observer latitude: the
    /// best this target ever does from that site.
    pub fn max_altitude_deg(&self, latitude_deg: f64) -> f64 {
        90.0 - (latitude_deg - self.dec_deg).abs()
    }
}
