//! Directional horizon obstruction model: eight minimum-altitude values
//! at the compass points N, NE, E, SE, S, SW, W, NW, interpolated
//! piecewise-linearly in between so the effective horizon is continuous
//! all the way around the circle.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::time::normalize_degrees;

/// Width of one compass sector, degrees.
const SECTOR_DEG: f64 = 45.0;

/// Per-direction minimum observable altitude, degrees above the geometric
/// horizon. Index 0 is north, proceeding clockwise in 45-degree steps.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DirectionalAltitudeProfile {
    pub sectors: [f64; 8],
}

impl Default for DirectionalAltitudeProfile {
    /// Unobstructed horizon in every direction.
    fn default() -> Self {
        Self { sectors: [0.0; 8] }
    }
}

impl DirectionalAltitudeProfile {
    /// Profile from eight sector altitudes (N, NE, E, SE, S, SW, W, NW).
    pub fn new(sectors: [f64; 8]) -> Result<Self, Error> {
        let profile = Self { sectors };
        profile.validate()?;
        Ok(profile)
    }

    /// Uniform profile, the same minimum altitude in every direction.
    pub fn flat(min_alt_deg: f64) -> Result<Self, Error> {
        Self::new([min_alt_deg; 8])
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.sectors.iter().any(|alt| *alt < 0.0) {
            return Err(Error::NegativeHorizonAltitude);
        }
        Ok(())
    }

    /// Minimum observable altitude toward `azimuth_deg`, interpolated
    /// between the two adjacent sector values. Exact at sector
    /// boundaries, continuous everywhere, periodic across north.
    pub fn min_altitude_at(&self, azimuth_deg: f64) -> f64 {
        let az = normalize_degrees(azimuth_deg);
        let sector = ((az / SECTOR_DEG) as usize) % 8;
        let fraction = (az % SECTOR_DEG) / SECTOR_DEG;
        let lower = self.sectors[sector];
        let upper = self.sectors[(sector + 1) % 8];
        lower + (upper - lower) * fraction
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn ragged() -> DirectionalAltitudeProfile {
        DirectionalAltitudeProfile::new([0.0, 10.0, 25.0, 5.0, 0.0, 15.0, 30.0, 2.0]).unwrap()
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(45.0, 10.0)]
    #[case(90.0, 25.0)]
    #[case(135.0, 5.0)]
    #[case(180.0, 0.0)]
    #[case(225.0, 15.0)]
    #[case(270.0, 30.0)]
    #[case(315.0, 2.0)]
    fn exact_at_sector_boundaries(#[case] az: f64, #[case] expected: f64) {
        assert!((ragged().min_altitude_at(az) - expected).abs() < 1e-12);
    }

    #[test]
    fn continuous_at_boundaries() {
        let profile = ragged();
        for boundary in (0..360).step_by(45) {
            let b = boundary as f64;
            let below = profile.min_altitude_at(b - 1e-6);
            let at = profile.min_altitude_at(b);
            let above = profile.min_altitude_at(b + 1e-6);
            assert!((below - at).abs() < 1e-3, "discontinuity below {b}");
            assert!((above - at).abs() < 1e-3, "discontinuity above {b}");
        }
    }

    #[test]
    fn continuous_across_north() {
        // the NW->N segment interpolates toward sector 0, not toward NE
        let profile = ragged();
        let just_west_of_north = profile.min_altitude_at(359.9);
        assert!((just_west_of_north - 0.0).abs() < 0.01);
    }

    #[test]
    fn midpoint_is_halfway() {
        let profile = ragged();
        assert!((profile.min_altitude_at(22.5) - 5.0).abs() < 1e-12);
        assert!((profile.min_altitude_at(337.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_negative_sector() {
        assert_eq!(
            DirectionalAltitudeProfile::new([0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            Err(Error::NegativeHorizonAltitude)
        );
    }
}
