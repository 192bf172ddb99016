//! Array codec: flat `f64` arrays on the bus ↔ typed geometry and results.
//!
//! Every function here is total. Short or malformed input decodes to a
//! neutral value (identity pose, `0.0`, empty list) instead of an error, so
//! a half-written entry can never take down the control loop.
//!
//! Angles travel over the bus in **degrees**; [`Pose3d`] stores radians.

use yall_types::{
    AngularVelocity3d, Orientation3d, Pose2d, Pose3d, RawDetection, RawFiducial, Rotation3d,
    Translation3d,
};

/// Slots in a `[x, y, z, roll, pitch, yaw]` pose array.
pub const POSE_FIELDS: usize = 6;

/// Bounds-safe index: `raw[index]`, or `0.0` past the end.
pub fn extract(raw: &[f64], index: usize) -> f64 {
    raw.get(index).copied().unwrap_or(0.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Poses
// ────────────────────────────────────────────────────────────────────────────

/// Decode `[x, y, z, roll°, pitch°, yaw°]`. Arrays shorter than six slots
/// decode to the identity pose.
pub fn pose3d_from_array(raw: &[f64]) -> Pose3d {
    if raw.len() < POSE_FIELDS {
        return Pose3d::identity();
    }
    Pose3d::new(
        Translation3d::new(raw[0], raw[1], raw[2]),
        Rotation3d::from_degrees(raw[3], raw[4], raw[5]),
    )
}

/// Decode the planar part (x, y, yaw) of a six-slot pose array.
pub fn pose2d_from_array(raw: &[f64]) -> Pose2d {
    if raw.len() < POSE_FIELDS {
        return Pose2d::default();
    }
    Pose2d::new(raw[0], raw[1], raw[5].to_radians())
}

/// Encode a pose as `[x, y, z, roll°, pitch°, yaw°]`.
pub fn pose3d_to_array(pose: &Pose3d) -> [f64; POSE_FIELDS] {
    let [roll, pitch, yaw] = pose.rotation.to_degrees();
    [
        pose.translation.x,
        pose.translation.y,
        pose.translation.z,
        roll,
        pitch,
        yaw,
    ]
}

/// Encode a planar pose as `[x, y, 0, 0, 0, yaw°]`.
pub fn pose2d_to_array(pose: &Pose2d) -> [f64; POSE_FIELDS] {
    [pose.x, pose.y, 0.0, 0.0, 0.0, pose.yaw.to_degrees()]
}

// ────────────────────────────────────────────────────────────────────────────
// Translations and orientation
// ────────────────────────────────────────────────────────────────────────────

/// Decode `[x, y, z]` in metres; missing slots read as `0.0`.
pub fn translation3d_from_array(raw: &[f64]) -> Translation3d {
    Translation3d::new(extract(raw, 0), extract(raw, 1), extract(raw, 2))
}

pub fn translation3d_to_array(translation: &Translation3d) -> [f64; 3] {
    [translation.x, translation.y, translation.z]
}

/// Decode `[yaw°, yawRate, pitch°, pitchRate, roll°, rollRate]` (rates in
/// degrees per second), the layout of `robot_orientation_set`.
pub fn orientation_from_array(raw: &[f64]) -> Orientation3d {
    Orientation3d::new(
        Rotation3d::from_degrees(extract(raw, 4), extract(raw, 2), extract(raw, 0)),
        AngularVelocity3d::new(extract(raw, 5), extract(raw, 3), extract(raw, 1)),
    )
}

/// Encode an orientation in the `robot_orientation_set` layout.
pub fn orientation_to_array(orientation: &Orientation3d) -> [f64; 6] {
    let [roll, pitch, yaw] = orientation.orientation.to_degrees();
    let rates = orientation.angular_velocity;
    [yaw, rates.yaw, pitch, rates.pitch, roll, rates.roll]
}

// ────────────────────────────────────────────────────────────────────────────
// Per-target blocks
// ────────────────────────────────────────────────────────────────────────────

/// Decode `count` consecutive seven-slot fiducial blocks starting at `start`.
///
/// Callers validate the length first; slots past the end read as `0.0`.
pub fn fiducial_blocks(raw: &[f64], start: usize, count: usize) -> Vec<RawFiducial> {
    (0..count)
        .map(|i| {
            let base = start + i * RawFiducial::FIELDS;
            RawFiducial {
                id: extract(raw, base) as i32,
                txnc: extract(raw, base + 1),
                tync: extract(raw, base + 2),
                ta: extract(raw, base + 3),
                dist_to_camera: extract(raw, base + 4),
                dist_to_robot: extract(raw, base + 5),
                ambiguity: extract(raw, base + 6),
            }
        })
        .collect()
}

/// Decode the standalone `rawfiducials` entry. A length that is not a whole
/// number of blocks decodes to an empty list.
pub fn raw_fiducials_from_array(raw: &[f64]) -> Vec<RawFiducial> {
    if raw.len() % RawFiducial::FIELDS != 0 {
        return Vec::new();
    }
    fiducial_blocks(raw, 0, raw.len() / RawFiducial::FIELDS)
}

/// Decode the `rawdetections` entry (twelve slots per neural detection). A
/// length that is not a whole number of blocks decodes to an empty list.
pub fn raw_detections_from_array(raw: &[f64]) -> Vec<RawDetection> {
    if raw.len() % RawDetection::FIELDS != 0 {
        return Vec::new();
    }
    raw.chunks_exact(RawDetection::FIELDS)
        .map(|block| RawDetection {
            class_id: block[0] as i32,
            txnc: block[1],
            tync: block[2],
            ta: block[3],
            corners: [
                (block[4], block[5]),
                (block[6], block[7]),
                (block[8], block[9]),
                (block[10], block[11]),
            ],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn short_arrays_decode_to_identity() {
        for len in 0..POSE_FIELDS {
            let raw = vec![5.0; len];
            assert!(pose3d_from_array(&raw).is_identity(), "len {len}");
            assert_eq!(pose2d_from_array(&raw), Pose2d::default());
        }
    }

    #[test]
    fn pose_angles_are_converted_to_radians() {
        let pose = pose3d_from_array(&[1.0, 2.0, 3.0, 0.0, 0.0, 90.0]);
        assert_eq!(pose.translation, Translation3d::new(1.0, 2.0, 3.0));
        assert!((pose.rotation.yaw - FRAC_PI_2).abs() < 1e-9);
        assert_eq!(pose.rotation.roll, 0.0);
    }

    #[test]
    fn longer_arrays_only_use_the_leading_pose() {
        let pose = pose3d_from_array(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 99.0, 4.0]);
        assert_eq!(pose.translation.z, 3.0);
    }

    #[test]
    fn pose3d_array_roundtrip_within_tolerance() {
        let original = Pose3d::new(
            Translation3d::new(-3.25, 7.125, 0.5),
            Rotation3d::new(0.3, -1.1, 2.9),
        );
        let back = pose3d_from_array(&pose3d_to_array(&original));
        assert!(original.translation.distance(back.translation) < 1e-9);
        assert!((original.rotation.roll - back.rotation.roll).abs() < 1e-6);
        assert!((original.rotation.pitch - back.rotation.pitch).abs() < 1e-6);
        assert!((original.rotation.yaw - back.rotation.yaw).abs() < 1e-6);
    }

    #[test]
    fn pose2d_encodes_zero_height_and_tilt() {
        let arr = pose2d_to_array(&Pose2d::new(1.0, 2.0, FRAC_PI_2));
        assert_eq!(&arr[..5], &[1.0, 2.0, 0.0, 0.0, 0.0]);
        assert!((arr[5] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn extract_is_bounds_safe() {
        let raw = [1.0, 2.0];
        assert_eq!(extract(&raw, 1), 2.0);
        assert_eq!(extract(&raw, 2), 0.0);
        assert_eq!(extract(&[], 0), 0.0);
    }

    #[test]
    fn translation_tolerates_short_input() {
        assert_eq!(
            translation3d_from_array(&[1.0]),
            Translation3d::new(1.0, 0.0, 0.0)
        );
        assert_eq!(
            translation3d_to_array(&Translation3d::new(0.1, 0.2, 0.3)),
            [0.1, 0.2, 0.3]
        );
    }

    #[test]
    fn orientation_uses_yaw_first_layout() {
        let orientation = Orientation3d::new(
            Rotation3d::from_degrees(5.0, 10.0, 45.0),
            AngularVelocity3d::new(1.0, 2.0, 3.0),
        );
        let arr = orientation_to_array(&orientation);
        assert!((arr[0] - 45.0).abs() < 1e-9);
        assert_eq!(arr[1], 3.0);
        assert!((arr[2] - 10.0).abs() < 1e-9);
        assert_eq!(arr[3], 2.0);
        assert!((arr[4] - 5.0).abs() < 1e-9);
        assert_eq!(arr[5], 1.0);

        let back = orientation_from_array(&arr);
        assert!((back.orientation.yaw - orientation.orientation.yaw).abs() < 1e-9);
        assert_eq!(back.angular_velocity, orientation.angular_velocity);
    }

    #[test]
    fn raw_fiducials_require_whole_blocks() {
        let raw = [3.0, 0.1, 0.2, 0.5, 2.0, 2.5, 0.1, 4.0, -0.1, -0.2, 0.4, 3.0, 3.5, 0.3];
        let tags = raw_fiducials_from_array(&raw);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].id, 3);
        assert_eq!(tags[1].id, 4);
        assert_eq!(tags[1].ambiguity, 0.3);

        assert!(raw_fiducials_from_array(&raw[..13]).is_empty());
        assert!(raw_fiducials_from_array(&[]).is_empty());
    }

    #[test]
    fn raw_detections_decode_corners() {
        let raw: Vec<f64> = (0..12).map(f64::from).collect();
        let detections = raw_detections_from_array(&raw);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].class_id, 0);
        assert_eq!(detections[0].corners[3], (10.0, 11.0));

        assert!(raw_detections_from_array(&raw[..11]).is_empty());
    }
}
