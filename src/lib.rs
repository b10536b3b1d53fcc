#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod constants;
mod coords;
mod ephemeris;
mod error;
mod estimator;
mod events;
mod horizon;
mod night;
mod planner;
mod rating;
mod site;
mod suggest;
mod time;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, DateRange, MoonTier, MoonTierConfig};
    pub use crate::coords::{Equatorial, HorizontalPosition};
    pub use crate::error::Error;
    pub use crate::estimator::{FastVisibility, VisibilityRef};
    pub use crate::events::{MoonSample, VisibilitySpan};
    pub use crate::horizon::DirectionalAltitudeProfile;
    pub use crate::night::{NightResult, NightWindow, TargetNightResult};
    pub use crate::planner::{PlanResult, Planner};
    pub use crate::rating::Rating;
    pub use crate::site::{CelestialTarget, GeoCoordinate};
    pub use crate::suggest::SuggestionCandidate;
    // re-export
    pub use chrono::NaiveDate;
    pub use hifitime::{Duration, Epoch, Unit};
}

// pub export
pub use error::Error;
