//! Angle Helpers
//!
//! Degree/radian conversion and the spherical-to-Cartesian look vector
//! used by the camera. Yaw and pitch are kept in degrees throughout the
//! crate; radians appear only inside the trig calls.

use super::vec3::Vec3;

/// Degrees-to-radians factor.
pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

/// Radians-to-degrees factor.
pub const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;

/// Pitch is limited so the camera never flips over the vertical axis.
pub const PITCH_LIMIT_DEG: f32 = 89.0;

/// Clamp a pitch angle to the permitted range.
#[inline]
pub fn clamp_pitch(pitch_deg: f32) -> f32 {
    pitch_deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG)
}

/// Unit look vector for a yaw/pitch pair (both in degrees).
///
/// Yaw 0 looks along +X, yaw -90 along -Z; pitch tilts toward +Y.
#[inline]
pub fn look_direction(yaw_deg: f32, pitch_deg: f32) -> Vec3 {
    let yaw = yaw_deg * DEG_TO_RAD;
    let pitch = pitch_deg * DEG_TO_RAD;

    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

/// Yaw angle (degrees) of a direction's horizontal component.
#[inline]
pub fn yaw_of(direction: Vec3) -> f32 {
    direction.z.atan2(direction.x) * RAD_TO_DEG
}

/// Pitch angle (degrees) of a direction.
#[inline]
pub fn pitch_of(direction: Vec3) -> f32 {
    let horizontal = (direction.x * direction.x + direction.z * direction.z).sqrt();
    direction.y.atan2(horizontal) * RAD_TO_DEG
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    #[test]
    fn test_clamp_pitch() {
        assert_eq!(clamp_pitch(0.0), 0.0);
        assert_eq!(clamp_pitch(120.0), PITCH_LIMIT_DEG);
        assert_eq!(clamp_pitch(-120.0), -PITCH_LIMIT_DEG);
    }

    #[test]
    fn test_look_direction_axes() {
        let east = look_direction(0.0, 0.0);
        assert!((east.x - 1.0).abs() < TOL);
        assert!(east.y.abs() < TOL);
        assert!(east.z.abs() < TOL);

        let north = look_direction(-90.0, 0.0);
        assert!(north.x.abs() < TOL);
        assert!((north.z + 1.0).abs() < TOL);
    }

    #[test]
    fn test_look_direction_is_unit() {
        for yaw in [-180.0, -45.0, 0.0, 30.0, 90.0, 270.0] {
            for pitch in [-89.0, -30.0, 0.0, 45.0, 89.0] {
                let dir = look_direction(yaw, pitch);
                assert!((dir.length() - 1.0).abs() < TOL, "({yaw}, {pitch})");
            }
        }
    }

    #[test]
    fn test_yaw_pitch_round_trip() {
        let dir = look_direction(-45.0, 30.0);
        assert!((yaw_of(dir) + 45.0).abs() < 1e-3);
        assert!((pitch_of(dir) - 30.0).abs() < 1e-3);
    }
}
