//! Imaging rating derivation.
//!
//! A rating is a pure function of the night's moon phase, the target's
//! moon-up/moon-down hour split, the average moon separation while the
//! moon is up, and the tier policy. No hidden state: identical inputs
//! always produce the identical verdict, and the rule ordering below is
//! the tie-break.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cfg::MoonTierConfig;

/// Categorical verdict for one target on one night. Ordered best first,
/// so the derived ordering doubles as a ranking key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Rating {
    /// Fully usable: moon-free, or moonlight faint and far enough to ignore
    Good,
    /// Usable with moon in the sky: separation clears the tier threshold
    Allowable,
    /// Part of the window is usable, the moon-up part is not
    Mixed,
    /// Nothing usable this night
    NoImaging,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "Good"),
            Self::Allowable => write!(f, "Allowable"),
            Self::Mixed => write!(f, "Mixed"),
            Self::NoImaging => write!(f, "NoImaging"),
        }
    }
}

/// Derive the rating for one target-night.
///
/// Rules, applied in order:
/// 1. phase at or above the hard cutoff: [Rating::NoImaging], separation
///    is irrelevant;
/// 2. moon-down time only: [Rating::Good];
/// 3. moon-up time with separation meeting the phase tier's threshold:
///    [Rating::Allowable], upgraded to [Rating::Good] in the new-moon
///    tier where cleared moonlight is treated as no moonlight;
/// 4. both moon-down and moon-up time with the moon-up part failing the
///    threshold: [Rating::Mixed];
/// 5. otherwise (only moon-up time, threshold failed): [Rating::NoImaging].
pub(crate) fn rate(
    phase_pct: f64,
    hours_moon_down: f64,
    hours_moon_up: f64,
    avg_separation_moon_up: Option<f64>,
    tiers: &MoonTierConfig,
) -> Rating {
    if phase_pct >= tiers.cutoff_phase_pct {
        return Rating::NoImaging;
    }

    if hours_moon_down > 0.0 && hours_moon_up == 0.0 {
        return Rating::Good;
    }

    let tier = tiers.tier_for(phase_pct);
    let separation_ok = matches!(
        avg_separation_moon_up,
        Some(sep) if sep >= tier.min_separation_deg
    );

    if hours_moon_up > 0.0 && separation_ok {
        if tiers.is_lowest_tier(phase_pct) {
            return Rating::Good;
        }
        return Rating::Allowable;
    }

    if hours_moon_down > 0.0 && hours_moon_up > 0.0 {
        return Rating::Mixed;
    }

    Rating::NoImaging
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn cutoff_overrides_separation() {
        let tiers = MoonTierConfig::default();
        // near-full moon: even a perfectly opposed target is ruled out
        assert_eq!(rate(95.0, 5.0, 0.0, None, &tiers), Rating::NoImaging);
        assert_eq!(rate(95.0, 0.0, 5.0, Some(179.0), &tiers), Rating::NoImaging);
        assert_eq!(rate(75.0, 3.0, 0.0, None, &tiers), Rating::NoImaging);
    }

    #[test]
    fn moon_down_only_is_good() {
        let tiers = MoonTierConfig::default();
        assert_eq!(rate(40.0, 4.5, 0.0, None, &tiers), Rating::Good);
    }

    #[test]
    fn separation_clears_tier() {
        let tiers = MoonTierConfig::default();
        // quarter tier needs 60 degrees
        assert_eq!(rate(40.0, 1.0, 3.0, Some(75.0), &tiers), Rating::Allowable);
        assert_eq!(rate(40.0, 0.0, 4.0, Some(75.0), &tiers), Rating::Allowable);
    }

    #[test]
    fn new_moon_tier_upgrades_to_good() {
        let tiers = MoonTierConfig::default();
        assert_eq!(rate(5.0, 0.0, 4.0, Some(25.0), &tiers), Rating::Good);
    }

    #[test]
    fn failed_separation_with_dark_time_is_mixed() {
        let tiers = MoonTierConfig::default();
        assert_eq!(rate(40.0, 2.0, 2.0, Some(30.0), &tiers), Rating::Mixed);
    }

    #[test]
    fn failed_separation_without_dark_time_is_no_imaging() {
        let tiers = MoonTierConfig::default();
        assert_eq!(rate(40.0, 0.0, 4.0, Some(30.0), &tiers), Rating::NoImaging);
    }

    #[test]
    fn no_visible_time_is_no_imaging() {
        let tiers = MoonTierConfig::default();
        assert_eq!(rate(40.0, 0.0, 0.0, None, &tiers), Rating::NoImaging);
    }

    #[rstest]
    #[case(3.0, 0.5, 2.5, Some(44.0))]
    #[case(62.0, 2.0, 1.5, Some(91.0))]
    #[case(20.0, 0.0, 6.0, Some(39.9))]
    fn deterministic(
        #[case] phase: f64,
        #[case] down: f64,
        #[case] up: f64,
        #[case] sep: Option<f64>,
    ) {
        let tiers = MoonTierConfig::default();
        let first = rate(phase, down, up, sep, &tiers);
        for _ in 0..10 {
            assert_eq!(rate(phase, down, up, sep, &tiers), first);
        }
    }

    #[test]
    fn ordering_ranks_good_first() {
        assert!(Rating::Good < Rating::Allowable);
        assert!(Rating::Allowable < Rating::Mixed);
        assert!(Rating::Mixed < Rating::NoImaging);
    }
}
