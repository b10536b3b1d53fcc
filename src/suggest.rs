//! Gap-filling target suggestions.
//!
//! Samples a few representative nights across the requested range,
//! derives the darkness time the user's current selection leaves
//! uncovered, and ranks unselected catalog targets by how much of that
//! time they would fill.

use std::collections::HashSet;

use chrono::NaiveDate;
use hifitime::{Epoch, Unit};
use itertools::Itertools;
use log::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cfg::DateRange;
use crate::constants::{MAX_SUGGESTIONS, MIN_GAP_HOURS};
use crate::coords::Equatorial;
use crate::ephemeris::FixedBody;
use crate::events::{find_visibility_span, Threshold, VisibilitySpan};
use crate::night::{moon_overlap, NightWindow};
use crate::planner::Planner;
use crate::rating::{rate, Rating};
use crate::site::CelestialTarget;

/// A catalog target proposed to fill uncovered darkness time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SuggestionCandidate {
    pub target: CelestialTarget,
    /// Hours of selection gaps this target covers on its best sampled
    /// night, rounded to 0.1 h, always >= 0.5
    pub gap_coverage_hours: f64,
    /// Rating on the best sampled night
    pub rating: Rating,
    /// Visibility bounds on the best sampled night
    pub visible_from: Epoch,
    pub visible_to: Epoch,
    /// First sampled night offering coverage, set only when the target
    /// is not yet in season on the earliest sampled night
    pub available_from: Option<NaiveDate>,
}

struct SampledNight {
    date: NaiveDate,
    window: NightWindow,
    moon_phase_pct: f64,
    moon_span: Option<VisibilitySpan>,
    gaps: Vec<(Epoch, Epoch)>,
}

struct BestNight {
    coverage: f64,
    rating: Rating,
    span: VisibilitySpan,
}

/// Representative day offsets: the midpoint for short ranges, three
/// spread points for anything beyond a month.
fn sample_offsets(days: u32) -> Vec<u32> {
    if days <= 30 {
        vec![days / 2]
    } else {
        let mut offsets = vec![10, days / 2, days - 11];
        offsets.sort_unstable();
        offsets.dedup();
        offsets
    }
}

pub(crate) fn suggest(
    planner: &Planner,
    catalog: &[CelestialTarget],
    selected: &[CelestialTarget],
    range: DateRange,
) -> Vec<SuggestionCandidate> {
    let nights = sample_nights(planner, selected, range);
    if nights.is_empty() {
        debug!("no sampled night leaves usable gaps, nothing to suggest");
        return Vec::new();
    }
    let earliest = nights[0].date;

    let selected_ids: HashSet<&str> = selected.iter().map(|t| t.id.as_str()).collect();
    let latitude = planner.site().latitude_deg;

    let mut candidates = Vec::new();
    for target in catalog {
        if selected_ids.contains(target.id.as_str()) {
            continue;
        }
        if target.max_altitude_deg(latitude) < 0.0 {
            continue;
        }
        if let Some(candidate) = evaluate_candidate(planner, target, &nights, earliest) {
            candidates.push(candidate);
        }
    }

    debug!(
        "{} candidates cover gaps across {} sampled nights",
        candidates.len(),
        nights.len()
    );

    candidates
        .into_iter()
        .sorted_by(rank)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Build the sampled nights and their gap sets, dropping nights whose
/// total uncovered time is below the floor.
fn sample_nights(
    planner: &Planner,
    selected: &[CelestialTarget],
    range: DateRange,
) -> Vec<SampledNight> {
    let mut nights = Vec::new();

    for offset in sample_offsets(range.days) {
        let date = range.date_at(offset);
        let Some(night) = planner.night(date, selected) else {
            continue;
        };

        let covered = merge_intervals(
            night
                .targets
                .iter()
                .filter_map(|t| t.span.as_ref())
                .map(|span| (span.rise, span.set))
                .collect(),
        );
        let gaps = complement(
            &covered,
            night.window.darkness_start,
            night.window.darkness_end,
        );

        let total: f64 = gaps.iter().map(|g| hours(*g)).sum();
        if total < MIN_GAP_HOURS {
            debug!("{date}: gaps total {total:.1}h, below floor");
            continue;
        }

        nights.push(SampledNight {
            date,
            window: night.window,
            moon_phase_pct: night.moon_phase_pct,
            moon_span: night.moon_span,
            gaps,
        });
    }

    nights
}

fn evaluate_candidate(
    planner: &Planner,
    target: &CelestialTarget,
    nights: &[SampledNight],
    earliest: NaiveDate,
) -> Option<SuggestionCandidate> {
    let site = planner.site();
    let cfg = &planner.cfg;
    let eq = Equatorial::new(target.ra_deg, target.dec_deg);

    let mut best: Option<BestNight> = None;
    let mut first_available: Option<NaiveDate> = None;

    for night in nights {
        let Some(span) = find_visibility_span(
            &FixedBody(eq),
            site,
            night.window.darkness_start,
            night.window.darkness_end,
            Threshold::Directional(&cfg.horizon),
        ) else {
            continue;
        };

        let coverage = round_tenth(
            night
                .gaps
                .iter()
                .map(|gap| overlap_hours((span.rise, span.set), *gap))
                .sum(),
        );
        if coverage < MIN_GAP_HOURS {
            continue;
        }

        let (down, up, avg) = moon_overlap(&span, night.moon_span.as_ref(), eq, site);
        let rating = rate(night.moon_phase_pct, down, up, avg, &cfg.moon_tiers);

        first_available.get_or_insert(night.date);

        let better = match &best {
            None => true,
            Some(b) => {
                coverage > b.coverage + 1e-9
                    || ((coverage - b.coverage).abs() <= 1e-9 && rating < b.rating)
            },
        };
        if better {
            best = Some(BestNight {
                coverage,
                rating,
                span,
            });
        }
    }

    let best = best?;
    if best.rating == Rating::NoImaging {
        return None;
    }

    Some(SuggestionCandidate {
        target: target.clone(),
        gap_coverage_hours: best.coverage,
        rating: best.rating,
        visible_from: best.span.rise,
        visible_to: best.span.set,
        available_from: first_available.filter(|date| *date != earliest),
    })
}

/// Ordering: in-season candidates before late arrivals, then coverage
/// descending in 0.5 h bands so near-equal coverage falls through to the
/// rating, then exact coverage. Banding keeps the comparator a total
/// order, which a pairwise "within 0.5 h" tie rule is not.
fn rank(a: &SuggestionCandidate, b: &SuggestionCandidate) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    let band = |c: &SuggestionCandidate| (c.gap_coverage_hours / MIN_GAP_HOURS).floor() as i64;

    a.available_from
        .is_some()
        .cmp(&b.available_from.is_some())
        .then_with(|| band(b).cmp(&band(a)))
        .then_with(|| a.rating.cmp(&b.rating))
        .then_with(|| {
            b.gap_coverage_hours
                .partial_cmp(&a.gap_coverage_hours)
                .unwrap_or(Ordering::Equal)
        })
}

/// Sort by start and fold overlapping or touching intervals together.
pub(crate) fn merge_intervals(mut intervals: Vec<(Epoch, Epoch)>) -> Vec<(Epoch, Epoch)> {
    intervals.sort_by_key(|interval| interval.0);

    let mut merged: Vec<(Epoch, Epoch)> = Vec::new();
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.0 <= last.1 {
                if interval.1 > last.1 {
                    last.1 = interval.1;
                }
                continue;
            }
        }
        merged.push(interval);
    }
    merged
}

/// Complement of merged intervals within `[start, end]`: together with
/// the input they tile the window with no overlap.
pub(crate) fn complement(
    merged: &[(Epoch, Epoch)],
    start: Epoch,
    end: Epoch,
) -> Vec<(Epoch, Epoch)> {
    let mut gaps = Vec::new();
    let mut cursor = start;

    for (s, e) in merged {
        if *s > cursor && cursor < end {
            gaps.push((cursor, (*s).min(end)));
        }
        if *e > cursor {
            cursor = *e;
        }
        if cursor >= end {
            break;
        }
    }
    if cursor < end {
        gaps.push((cursor, end));
    }
    gaps
}

fn overlap_hours(a: (Epoch, Epoch), b: (Epoch, Epoch)) -> f64 {
    let start = a.0.max(b.0);
    let end = a.1.min(b.1);
    if end > start {
        (end - start).to_unit(Unit::Hour)
    } else {
        0.0
    }
}

fn hours(interval: (Epoch, Epoch)) -> f64 {
    (interval.1 - interval.0).to_unit(Unit::Hour)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod test {
    use super::*;

    fn t(hours: f64) -> Epoch {
        Epoch::from_gregorian_utc(2026, 1, 16, 0, 0, 0, 0) + hours * Unit::Hour
    }

    #[test]
    fn merge_folds_overlaps() {
        let merged = merge_intervals(vec![(t(3.0), t(5.0)), (t(0.0), t(2.0)), (t(4.0), t(7.0))]);
        assert_eq!(merged, vec![(t(0.0), t(2.0)), (t(3.0), t(7.0))]);
    }

    #[test]
    fn merge_joins_touching_intervals() {
        let merged = merge_intervals(vec![(t(0.0), t(2.0)), (t(2.0), t(4.0))]);
        assert_eq!(merged, vec![(t(0.0), t(4.0))]);
    }

    #[test]
    fn complement_tiles_window() {
        let window = (t(0.0), t(10.0));
        let covered = vec![(t(1.0), t(3.0)), (t(6.0), t(7.5))];
        let gaps = complement(&covered, window.0, window.1);
        assert_eq!(
            gaps,
            vec![(t(0.0), t(1.0)), (t(3.0), t(6.0)), (t(7.5), t(10.0))]
        );

        // covered + gaps tile the window exactly
        let mut all: Vec<_> = covered.iter().chain(gaps.iter()).copied().collect();
        all.sort_by_key(|interval| interval.0);
        let total: f64 = all.iter().map(|interval| hours(*interval)).sum();
        assert!((total - 10.0).abs() < 1e-9);
        for pair in all.windows(2) {
            assert_eq!(pair[0].1, pair[1].0, "overlap or hole in tiling");
        }
    }

    #[test]
    fn complement_of_full_coverage_is_empty() {
        let gaps = complement(&[(t(0.0), t(10.0))], t(0.0), t(10.0));
        assert!(gaps.is_empty());
    }

    #[test]
    fn complement_of_nothing_is_whole_window() {
        let gaps = complement(&[], t(0.0), t(8.0));
        assert_eq!(gaps, vec![(t(0.0), t(8.0))]);
    }

    #[test]
    fn sample_offsets_by_range_length() {
        assert_eq!(sample_offsets(7), vec![3]);
        assert_eq!(sample_offsets(30), vec![15]);
        assert_eq!(sample_offsets(90), vec![10, 45, 79]);
    }

    #[test]
    fn rank_prefers_in_season_then_coverage() {
        let target = CelestialTarget::new("X", "X", 0.0, 0.0, None);
        let make = |coverage, rating, available_from| SuggestionCandidate {
            target: target.clone(),
            gap_coverage_hours: coverage,
            rating,
            visible_from: t(0.0),
            visible_to: t(1.0),
            available_from,
        };
        let later = NaiveDate::from_ymd_opt(2026, 3, 1);

        let a = make(3.7, Rating::Mixed, None);
        let b = make(6.0, Rating::Good, later);
        assert_eq!(rank(&a, &b), std::cmp::Ordering::Less);

        let c = make(2.0, Rating::Mixed, None);
        assert_eq!(rank(&a, &c), std::cmp::Ordering::Less);

        // inside the same coverage band the better rating wins despite
        // slightly less coverage
        let d = make(3.6, Rating::Good, None);
        assert_eq!(rank(&d, &a), std::cmp::Ordering::Less);
    }
}
