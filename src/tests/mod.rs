
use log::LevelFilter;
use std::sync::Once;

use crate::prelude::*;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Mid-latitude northern site used across the scenarios.
pub fn atlanta() -> GeoCoordinate {
    GeoCoordinate::new(33.749, -84.388, 320.0, "America/New_York").unwrap()
}

pub fn m42() -> CelestialTarget {
    CelestialTarget::new("M42", "Orion Nebula", 83.82, -5.39, Some(4.0))
}

/// A winter night with the full default configuration.
pub fn january_night() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}
