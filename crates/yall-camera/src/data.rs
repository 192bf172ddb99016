//! Read-only views over the camera's result entries.
//!
//! | View | Entries |
//! |---|---|
//! | [`LimelightData`] | `rawfiducials`, `rawdetections`, `camerapose_robotspace`, `tcclass`, `tdclass`, `llpython`, `rawbarcodes` |
//! | [`TargetData`] | `tv`, `tx`, `ty`, `txnc`, `tync`, `ta`, `tid`, `tclass`, `tc`, `t2d`, `*_targetspace`, `targetpose_*` |
//! | [`PipelineData`] | `tl`, `cl`, `getpipe`, `getpipetype` |
//!
//! Every getter reads the bus afresh; nothing is cached here.

use yall_bus::Table;
use yall_estimator::codec::{pose3d_from_array, raw_detections_from_array, raw_fiducials_from_array};
use yall_types::{Pose3d, RawDetection, RawFiducial, YallError};

/// `t2d` carries this many values when the pipeline publishes target metrics.
pub const TARGET_METRICS_LEN: usize = 17;

#[derive(Debug, Clone)]
pub struct LimelightData {
    table: Table,
}

impl LimelightData {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    pub fn target(&self) -> TargetData {
        TargetData {
            table: self.table.clone(),
        }
    }

    pub fn pipeline(&self) -> PipelineData {
        PipelineData {
            table: self.table.clone(),
        }
    }

    /// Fiducials seen in the current frame; empty when the array is not a
    /// whole number of 7-value blocks.
    pub fn raw_fiducials(&self) -> Vec<RawFiducial> {
        raw_fiducials_from_array(&self.table.read_array("rawfiducials").values)
    }

    /// Neural detections in the current frame; empty when the array is not
    /// a whole number of 12-value blocks.
    pub fn raw_detections(&self) -> Vec<RawDetection> {
        raw_detections_from_array(&self.table.read_array("rawdetections").values)
    }

    /// Camera pose in the robot frame as configured on the camera.
    pub fn camera_to_robot(&self) -> Pose3d {
        pose3d_from_array(&self.table.read_array("camerapose_robotspace").values)
    }

    pub fn classifier_class(&self) -> String {
        self.table.read_string("tcclass", "")
    }

    pub fn detector_class(&self) -> String {
        self.table.read_string("tdclass", "")
    }

    pub fn barcodes(&self) -> Vec<String> {
        self.table.read_string_array("rawbarcodes")
    }

    /// Values published by the camera's python pipeline.
    pub fn python_data(&self) -> Vec<f64> {
        self.table.read_array("llpython").values
    }

    /// Send values to the camera's python pipeline.
    pub fn set_python_data(&self, values: Vec<f64>) -> Result<(), YallError> {
        self.table.set_array("llrobot", values)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TargetData
// ────────────────────────────────────────────────────────────────────────────

/// Primary-target entries.
#[derive(Debug, Clone)]
pub struct TargetData {
    table: Table,
}

impl TargetData {
    /// `tv == 1`.
    pub fn has_target(&self) -> bool {
        self.table.read_scalar("tv", 0.0) == 1.0
    }

    /// Horizontal offset to the target, degrees.
    pub fn horizontal_offset(&self) -> f64 {
        self.table.read_scalar("tx", 0.0)
    }

    /// Vertical offset to the target, degrees.
    pub fn vertical_offset(&self) -> f64 {
        self.table.read_scalar("ty", 0.0)
    }

    /// Horizontal offset from the principal pixel, degrees.
    pub fn horizontal_offset_from_principal(&self) -> f64 {
        self.table.read_scalar("txnc", 0.0)
    }

    /// Vertical offset from the principal pixel, degrees.
    pub fn vertical_offset_from_principal(&self) -> f64 {
        self.table.read_scalar("tync", 0.0)
    }

    /// Target area, percent of image.
    pub fn area(&self) -> f64 {
        self.table.read_scalar("ta", 0.0)
    }

    pub fn april_tag_id(&self) -> f64 {
        self.table.read_scalar("tid", 0.0)
    }

    pub fn neural_class_id(&self) -> String {
        self.table.read_string("tclass", "")
    }

    /// HSV colour under the crosshair.
    pub fn color(&self) -> Vec<f64> {
        self.table.read_array("tc").values
    }

    /// Raw `t2d` target metrics.
    pub fn metrics(&self) -> Vec<f64> {
        self.table.read_array("t2d").values
    }

    pub fn target_count(&self) -> i32 {
        self.metric(1)
    }

    pub fn classifier_class_index(&self) -> i32 {
        self.metric(10)
    }

    pub fn detector_class_index(&self) -> i32 {
        self.metric(11)
    }

    pub fn robot_to_target(&self) -> Pose3d {
        self.pose("botpose_targetspace")
    }

    pub fn camera_to_target(&self) -> Pose3d {
        self.pose("camerapose_targetspace")
    }

    pub fn target_to_camera(&self) -> Pose3d {
        self.pose("targetpose_cameraspace")
    }

    pub fn target_to_robot(&self) -> Pose3d {
        self.pose("targetpose_robotspace")
    }

    fn metric(&self, index: usize) -> i32 {
        let t2d = self.metrics();
        if t2d.len() == TARGET_METRICS_LEN {
            t2d[index] as i32
        } else {
            0
        }
    }

    fn pose(&self, key: &str) -> Pose3d {
        pose3d_from_array(&self.table.read_array(key).values)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PipelineData
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PipelineData {
    table: Table,
}

impl PipelineData {
    /// Pipeline processing latency, ms.
    pub fn processing_latency(&self) -> f64 {
        self.table.read_scalar("tl", 0.0)
    }

    /// Capture latency, ms.
    pub fn capture_latency(&self) -> f64 {
        self.table.read_scalar("cl", 0.0)
    }

    pub fn pipeline_index(&self) -> f64 {
        self.table.read_scalar("getpipe", 0.0)
    }

    pub fn pipeline_type(&self) -> String {
        self.table.read_string("getpipetype", "")
    }
}
