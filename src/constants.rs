/// Sun altitude at rise/set, in degrees. Accounts for atmospheric
/// refraction and the solar radius.
pub const SUN_RISE_SET_ALT_DEG: f64 = -0.5;

/// Sunset/sunrise coarse scan step (minutes)
pub const SUN_SCAN_STEP_MIN: f64 = 5.0;

/// Sunset/sunrise scan window (hours)
pub const SUN_SCAN_WINDOW_H: f64 = 24.0;

/// Visibility span sampling step (minutes)
pub const SPAN_SAMPLE_STEP_MIN: f64 = 10.0;

/// Imaging window walk step (minutes)
pub const IMAGING_WALK_STEP_MIN: f64 = 15.0;

/// Fixed minimum altitude for the imaging-window walk (degrees)
pub const IMAGING_MIN_ALT_DEG: f64 = 30.0;

/// The imaging walk stops this long before the following sunrise (hours)
pub const IMAGING_SUNRISE_MARGIN_H: f64 = 1.0;

/// Moon altitude profile cadence (minutes). Part of the public contract:
/// host charts assume this sampling rate.
pub const MOON_PROFILE_STEP_MIN: f64 = 20.0;

/// Moon overlap analysis bucket width (minutes)
pub const OVERLAP_BUCKET_MIN: f64 = 10.0;

/// Gaps and gap coverage below this duration are ignored (hours)
pub const MIN_GAP_HOURS: f64 = 0.5;

/// Upper bound on returned suggestion candidates
pub const MAX_SUGGESTIONS: usize = 12;

/// Fast estimator: hour-angle margin added around a target's
/// above-threshold half-width, so that any dusk-to-dawn hour counts as
/// observable rather than the reference midnight alone. Empirical: 45
/// missed predawn risers.
pub const NIGHT_HALF_WINDOW_DEG: f64 = 75.0;

/// Advance of local sidereal time at a fixed civil hour (degrees/day)
pub const SIDEREAL_DRIFT_DEG_PER_DAY: f64 = 0.9856;
