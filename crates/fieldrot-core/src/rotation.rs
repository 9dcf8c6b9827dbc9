use crate::consts::{COS_ALTITUDE_EPSILON, SIDEREAL_RATE_DEG_PER_SEC};
use crate::error::{FieldRotError, Result};

/// Instantaneous field-rotation rate of an alt-az mount, in degrees per second.
///
/// `rate = W * cos(lat) * cos(az) / cos(alt)` with `W` the sidereal rate.
/// All arguments are in degrees. The rate is undefined where `cos(alt)` vanishes.
pub fn rotation_rate(latitude_deg: f64, altitude_deg: f64, azimuth_deg: f64) -> Result<f64> {
    let cos_alt = altitude_deg.to_radians().cos();
    if cos_alt.abs() < COS_ALTITUDE_EPSILON {
        return Err(FieldRotError::UndefinedRotationRate { altitude_deg });
    }
    Ok(SIDEREAL_RATE_DEG_PER_SEC
        * latitude_deg.to_radians().cos()
        * azimuth_deg.to_radians().cos()
        / cos_alt)
}
