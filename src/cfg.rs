//! Engine configuration: nightly anchoring, darkness buffer, horizon
//! profile and the moon-tolerance tier policy.

#[cfg(feature = "serde")]
use serde::Deserialize;

use chrono::{Days, NaiveDate};

use crate::error::Error;
use crate::horizon::DirectionalAltitudeProfile;

fn default_observation_hour() -> u32 {
    22
}

fn default_buffer_hours() -> f64 {
    1.5
}

fn default_cutoff_phase() -> f64 {
    75.0
}

fn default_tiers() -> [MoonTier; 4] {
    [
        MoonTier {
            phase_floor_pct: 0.0,
            min_separation_deg: 20.0,
        },
        MoonTier {
            phase_floor_pct: 11.0,
            min_separation_deg: 40.0,
        },
        MoonTier {
            phase_floor_pct: 26.0,
            min_separation_deg: 60.0,
        },
        MoonTier {
            phase_floor_pct: 51.0,
            min_separation_deg: 90.0,
        },
    ]
}

/// One moonlight-tolerance step: applies from `phase_floor_pct` up to the
/// next tier's floor.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct MoonTier {
    /// Lower bound (inclusive) of the illumination range this tier covers
    pub phase_floor_pct: f64,
    /// Target-moon separation required for moon-up time to remain usable
    pub min_separation_deg: f64,
}

/// Moon tolerance policy: four ordered phase tiers plus a hard cutoff
/// above which no separation rescues the night.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct MoonTierConfig {
    /// Ascending by phase floor; the first tier should start at 0
    #[cfg_attr(feature = "serde", serde(default = "default_tiers"))]
    pub tiers: [MoonTier; 4],
    /// Illumination percentage at and above which imaging is ruled out
    #[cfg_attr(feature = "serde", serde(default = "default_cutoff_phase"))]
    pub cutoff_phase_pct: f64,
}

impl Default for MoonTierConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            cutoff_phase_pct: default_cutoff_phase(),
        }
    }
}

impl MoonTierConfig {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        for pair in self.tiers.windows(2) {
            if pair[1].phase_floor_pct <= pair[0].phase_floor_pct {
                return Err(Error::UnorderedMoonTiers);
            }
        }
        if self.cutoff_phase_pct < self.tiers[3].phase_floor_pct {
            return Err(Error::CutoffBelowTiers);
        }
        if self
            .tiers
            .iter()
            .any(|t| !(0.0..=180.0).contains(&t.min_separation_deg))
        {
            return Err(Error::InvalidTierSeparation);
        }
        Ok(())
    }

    /// The tier governing a given moon phase: the highest floor at or
    /// below it. Phases below the first floor clamp to the first tier.
    pub(crate) fn tier_for(&self, phase_pct: f64) -> &MoonTier {
        self.tiers
            .iter()
            .rev()
            .find(|tier| phase_pct >= tier.phase_floor_pct)
            .unwrap_or(&self.tiers[0])
    }

    /// True when the phase falls in the lowest (new-moon) tier.
    pub(crate) fn is_lowest_tier(&self, phase_pct: f64) -> bool {
        phase_pct < self.tiers[1].phase_floor_pct
    }
}

/// Engine configuration. [Config::default] matches the shipped presets;
/// every field can be overridden before handing it to the planner, which
/// validates the whole at construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Local wall-clock hour anchoring each night's observation instant
    #[cfg_attr(feature = "serde", serde(default = "default_observation_hour"))]
    pub observation_hour: u32,
    /// Hours trimmed off both ends of the sunset-to-sunrise interval to
    /// form the darkness window
    #[cfg_attr(feature = "serde", serde(default = "default_buffer_hours"))]
    pub dusk_dawn_buffer_hours: f64,
    /// Directional horizon obstruction model
    #[cfg_attr(feature = "serde", serde(default))]
    pub horizon: DirectionalAltitudeProfile,
    /// Moon tolerance policy
    #[cfg_attr(feature = "serde", serde(default))]
    pub moon_tiers: MoonTierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            observation_hour: default_observation_hour(),
            dusk_dawn_buffer_hours: default_buffer_hours(),
            horizon: DirectionalAltitudeProfile::default(),
            moon_tiers: MoonTierConfig::default(),
        }
    }
}

impl Config {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.observation_hour > 23 {
            return Err(Error::InvalidObservationHour(self.observation_hour));
        }
        if self.dusk_dawn_buffer_hours < 0.0 {
            return Err(Error::NegativeBuffer);
        }
        self.horizon.validate()?;
        self.moon_tiers.validate()
    }
}

/// A contiguous run of calendar dates: start date plus an inclusive day
/// count.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct DateRange {
    pub start: NaiveDate,
    pub days: u32,
}

impl DateRange {
    pub fn new(start: NaiveDate, days: u32) -> Result<Self, Error> {
        if days == 0 {
            return Err(Error::EmptyDateRange);
        }
        Ok(Self { start, days })
    }

    /// Dates in range order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let start = self.start;
        (0..self.days).filter_map(move |offset| start.checked_add_days(Days::new(offset as u64)))
    }

    /// Date at `offset` days past the start, saturating at the calendar
    /// boundary.
    pub(crate) fn date_at(&self, offset: u32) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(self.start)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn tier_selection() {
        let tiers = MoonTierConfig::default();
        assert!((tiers.tier_for(0.0).min_separation_deg - 20.0).abs() < 1e-12);
        assert!((tiers.tier_for(10.9).min_separation_deg - 20.0).abs() < 1e-12);
        assert!((tiers.tier_for(11.0).min_separation_deg - 40.0).abs() < 1e-12);
        assert!((tiers.tier_for(50.0).min_separation_deg - 60.0).abs() < 1e-12);
        assert!((tiers.tier_for(99.0).min_separation_deg - 90.0).abs() < 1e-12);
        assert!(tiers.is_lowest_tier(5.0));
        assert!(!tiers.is_lowest_tier(30.0));
    }

    #[test]
    fn rejects_unordered_tiers() {
        let mut cfg = MoonTierConfig::default();
        cfg.tiers[2].phase_floor_pct = 5.0;
        assert_eq!(cfg.validate(), Err(Error::UnorderedMoonTiers));
    }

    #[test]
    fn rejects_cutoff_below_highest_tier() {
        let cfg = MoonTierConfig {
            cutoff_phase_pct: 40.0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(Error::CutoffBelowTiers));
    }

    #[test]
    fn rejects_bad_hour_and_buffer() {
        let cfg = Config {
            observation_hour: 24,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(Error::InvalidObservationHour(24)));

        let cfg = Config {
            dusk_dawn_buffer_hours: -1.0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(Error::NegativeBuffer));
    }

    #[test]
    fn date_range_iteration() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 30).unwrap();
        let range = DateRange::new(start, 3).unwrap();
        let dates: Vec<_> = range.dates().collect();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(DateRange::new(start, 0), Err(Error::EmptyDateRange));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_with_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"observation_hour": 21}"#).unwrap();
        assert_eq!(cfg.observation_hour, 21);
        assert!((cfg.dusk_dawn_buffer_hours - 1.5).abs() < 1e-12);
        assert_eq!(cfg.moon_tiers, MoonTierConfig::default());
    }
}
