//! Per-target records decoded from the camera's flat result arrays.

use serde::{Deserialize, Serialize};

/// One AprilTag observed in the current frame.
///
/// Lives for exactly one refresh cycle: each refresh replaces the whole list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFiducial {
    /// AprilTag id.
    pub id: i32,
    /// Horizontal offset from the principal pixel (degrees).
    pub txnc: f64,
    /// Vertical offset from the principal pixel (degrees).
    pub tync: f64,
    /// Tag area as a percentage of the image.
    pub ta: f64,
    /// Distance from the tag to the camera (metres).
    pub dist_to_camera: f64,
    /// Distance from the tag to the robot (metres).
    pub dist_to_robot: f64,
    /// Pose ambiguity in `[0, 1]`; lower is better.
    pub ambiguity: f64,
}

impl RawFiducial {
    /// Number of array slots one fiducial occupies on the bus.
    pub const FIELDS: usize = 7;
}

impl std::fmt::Display for RawFiducial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tag ID {}", self.id)?;
        writeln!(f, " Coordinate in image ({:.2}, {:.2})", self.txnc, self.tync)?;
        writeln!(f, " Tag Area {:.2}", self.ta)?;
        writeln!(f, " Distance to Camera {:.2}", self.dist_to_camera)?;
        writeln!(f, " Distance to Robot {:.2}", self.dist_to_robot)?;
        writeln!(f, " Ambiguity {:.2}", self.ambiguity)
    }
}

/// One neural-detector hit with its bounding quadrilateral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub class_id: i32,
    pub txnc: f64,
    pub tync: f64,
    pub ta: f64,
    /// Corner pixels in detector order: `[(x0, y0), (x1, y1), (x2, y2), (x3, y3)]`.
    pub corners: [(f64, f64); 4],
}

impl RawDetection {
    /// Number of array slots one detection occupies on the bus.
    pub const FIELDS: usize = 12;
}
