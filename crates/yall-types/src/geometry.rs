//! Field geometry primitives.
//!
//! Translations are in metres. Rotations are stored as roll/pitch/yaw in
//! **radians**; the camera publishes and accepts degrees, so conversion
//! happens only at the bus boundary (see `yall-estimator::codec`).
//!
//! # Example
//!
//! ```rust
//! use yall_types::geometry::{Pose3d, Rotation3d, Translation3d};
//!
//! let pose = Pose3d::new(
//!     Translation3d::new(1.0, 2.0, 0.0),
//!     Rotation3d::from_degrees(0.0, 0.0, 90.0),
//! );
//! assert!((pose.rotation.yaw - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
//! assert_eq!(pose.to_pose2d().x, 1.0);
//! ```

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Translation3d
// ────────────────────────────────────────────────────────────────────────────

/// A 3-D translation in metres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Translation3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rotation3d
// ────────────────────────────────────────────────────────────────────────────

/// Extrinsic roll (X), pitch (Y), yaw (Z) rotation in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation3d {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Rotation3d {
    /// Build a rotation from radians.
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Build a rotation from degrees, the unit the camera speaks.
    pub fn from_degrees(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::new(roll.to_radians(), pitch.to_radians(), yaw.to_radians())
    }

    /// `[roll, pitch, yaw]` in degrees.
    pub fn to_degrees(self) -> [f64; 3] {
        [
            self.roll.to_degrees(),
            self.pitch.to_degrees(),
            self.yaw.to_degrees(),
        ]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Poses
// ────────────────────────────────────────────────────────────────────────────

/// A rigid-body pose on the field.
///
/// `Pose3d::default()` is the identity pose and doubles as the explicit
/// "no data" value whenever an array is too short to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose3d {
    pub translation: Translation3d,
    pub rotation: Rotation3d,
}

impl Pose3d {
    pub fn new(translation: Translation3d, rotation: Rotation3d) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// The identity pose (origin, no rotation).
    pub fn identity() -> Self {
        Self::default()
    }

    /// `true` when every component is exactly zero.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Project onto the field plane, keeping x, y and yaw.
    pub fn to_pose2d(self) -> Pose2d {
        Pose2d::new(self.translation.x, self.translation.y, self.rotation.yaw)
    }
}

/// A planar pose: x/y in metres and heading in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2d {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl Pose2d {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Robot orientation (MegaTag2 input)
// ────────────────────────────────────────────────────────────────────────────

/// Angular rates about each axis, in **degrees per second**.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AngularVelocity3d {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl AngularVelocity3d {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }
}

/// Robot orientation and angular velocity, normally from the gyro, fed to
/// the camera so MegaTag2 can solve with a known heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation3d {
    pub orientation: Rotation3d,
    pub angular_velocity: AngularVelocity3d,
}

impl Orientation3d {
    pub fn new(orientation: Rotation3d, angular_velocity: AngularVelocity3d) -> Self {
        Self {
            orientation,
            angular_velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn rotation_from_degrees_converts_to_radians() {
        let r = Rotation3d::from_degrees(180.0, -90.0, 90.0);
        assert!((r.roll - PI).abs() < 1e-12);
        assert!((r.pitch + FRAC_PI_2).abs() < 1e-12);
        assert!((r.yaw - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn rotation_degrees_roundtrip() {
        let deg = Rotation3d::from_degrees(12.5, -3.0, 271.0).to_degrees();
        assert!((deg[0] - 12.5).abs() < 1e-9);
        assert!((deg[1] + 3.0).abs() < 1e-9);
        assert!((deg[2] - 271.0).abs() < 1e-9);
    }

    #[test]
    fn default_pose_is_identity() {
        assert!(Pose3d::default().is_identity());
        let moved = Pose3d::new(Translation3d::new(0.0, 0.1, 0.0), Rotation3d::default());
        assert!(!moved.is_identity());
    }

    #[test]
    fn pose2d_projection_keeps_yaw() {
        let pose = Pose3d::new(
            Translation3d::new(4.0, 5.0, 6.0),
            Rotation3d::new(0.1, 0.2, 0.3),
        );
        let flat = pose.to_pose2d();
        assert_eq!(flat, Pose2d::new(4.0, 5.0, 0.3));
    }

    #[test]
    fn translation_distance() {
        let a = Translation3d::new(0.0, 0.0, 0.0);
        let b = Translation3d::new(3.0, 4.0, 0.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }
}
