use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Latitude must lie within [-90, 90] degrees.
    #[error("latitude out of range: {0}")]
    InvalidLatitude(f64),

    /// Longitude must lie within [-180, 180] degrees.
    #[error("longitude out of range: {0}")]
    InvalidLongitude(f64),

    /// The site's timezone string is not a known IANA identifier.
    #[error("unknown IANA timezone: {0}")]
    UnknownTimezone(String),

    /// Nightly sampling is anchored to a wall-clock hour of day.
    #[error("observation hour must lie within 0..=23, got {0}")]
    InvalidObservationHour(u32),

    /// The dusk/dawn buffer shrinks the darkness window, it cannot grow it.
    #[error("dusk/dawn buffer must be non-negative")]
    NegativeBuffer,

    /// Directional horizon obstructions are altitudes above the geometric
    /// horizon, so every sector value must be >= 0.
    #[error("horizon profile minimum altitude must be non-negative")]
    NegativeHorizonAltitude,

    /// Moon tiers are selected by phase: floors must ascend strictly.
    #[error("moon tiers must be ordered by ascending phase floor")]
    UnorderedMoonTiers,

    /// The hard cutoff must not undercut the highest tier's floor.
    #[error("phase cutoff below the highest tier floor")]
    CutoffBelowTiers,

    /// Tier separations are angular distances on the sky.
    #[error("tier minimum separation out of [0, 180] degree range")]
    InvalidTierSeparation,

    #[error("date range must cover at least one day")]
    EmptyDateRange,
}
