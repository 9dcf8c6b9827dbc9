/// Earth's sidereal angular rate in degrees per second.
pub const SIDEREAL_RATE_DEG_PER_SEC: f64 = 4.178e-3;

/// Below this |cos(altitude)| the rotation rate is treated as undefined.
pub const COS_ALTITUDE_EPSILON: f64 = 1e-12;

/// Seconds represented by one unit of the trailing filename digit (tenths of a minute).
pub const SECONDS_PER_FILENAME_TICK: f64 = 6.0;

/// Minimum usable samples for a cubic spline fit.
pub const CUBIC_MIN_SAMPLES: usize = 4;

/// Fallback observer latitude used when geocoding fails (Melbourne).
pub const DEFAULT_LATITUDE_DEG: f64 = -37.814;

/// Fallback observer longitude used when geocoding fails (Melbourne).
pub const DEFAULT_LONGITUDE_DEG: f64 = 144.96332;

/// TT - UT in seconds, applied before evaluating the analytic theories.
/// Roughly the 2020 value; drifts by well under a second per year.
pub const DELTA_T_SECONDS: f64 = 69.2;

/// Julian day of the J2000.0 epoch, the reference frame of the Pluto theory.
pub const J2000_JD: f64 = 2_451_545.0;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Speed of light expressed as light-time per AU, in days.
pub const LIGHT_TIME_DAYS_PER_AU: f64 = 0.005_775_518_3;

/// Light-time iterations for planetary positions.
pub const LIGHT_TIME_ITERATIONS: usize = 3;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default width in pixels of the QA border stamped before rotation.
pub const DEFAULT_BORDER_WIDTH: usize = 4;

/// Default QA border colour (red), normalized channel values.
pub const DEFAULT_BORDER_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

/// Suffix appended to the input stem for de-rotated outputs.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_derot";

/// Small slack when rounding rotated extents up to whole pixels.
pub const EXTENT_ROUNDING_SLACK: f64 = 1e-9;
