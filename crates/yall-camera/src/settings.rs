//! [`LimelightSettings`] – configuration pushed to the camera.
//!
//! Settings are a plain value: build one with struct-update syntax, then hand
//! it to [`Limelight::apply_settings`](crate::Limelight::apply_settings).
//! Only fields set to `Some` are written, all in one batch, followed by a
//! single flush.
//!
//! | Field | Bus key |
//! |---|---|
//! | `led_mode` | `ledMode` |
//! | `pipeline_index` | `pipeline` |
//! | `priority_tag_id` | `priorityid` |
//! | `stream_mode` | `stream` |
//! | `crop_window` | `crop` |
//! | `robot_orientation` | `robot_orientation_set` |
//! | `fiducial_downscaling` | `fiducial_downscale_set` |
//! | `april_tag_offset` | `fiducial_offset_set` |
//! | `april_tag_id_filter` | `fiducial_id_filters_set` |
//! | `camera_offset` | `camerapose_robotspace_set` |

use serde::{Deserialize, Serialize};
use tracing::debug;
use yall_bus::{Table, Value};
use yall_estimator::codec::{orientation_to_array, pose3d_to_array, translation3d_to_array};
use yall_types::{Orientation3d, Pose3d, Translation3d, YallError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedMode {
    PipelineControl,
    ForceOff,
    ForceBlink,
    ForceOn,
}

impl LedMode {
    pub const fn code(self) -> f64 {
        match self {
            LedMode::PipelineControl => 0.0,
            LedMode::ForceOff => 1.0,
            LedMode::ForceBlink => 2.0,
            LedMode::ForceOn => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamMode {
    Standard,
    PictureInPictureMain,
    PictureInPictureSecondary,
}

impl StreamMode {
    pub const fn code(self) -> f64 {
        match self {
            StreamMode::Standard => 0.0,
            StreamMode::PictureInPictureMain => 1.0,
            StreamMode::PictureInPictureSecondary => 2.0,
        }
    }
}

/// Fiducial detector downscaling. `Pipeline` defers to the pipeline setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownscalingOverride {
    Pipeline,
    NoDownscale,
    HalfDownscale,
    DoubleDownscale,
    TripleDownscale,
    QuadrupleDownscale,
}

impl DownscalingOverride {
    /// Factor the camera expects on `fiducial_downscale_set`.
    pub const fn factor(self) -> f64 {
        match self {
            DownscalingOverride::Pipeline => 0.0,
            DownscalingOverride::NoDownscale => 1.0,
            DownscalingOverride::HalfDownscale => 1.5,
            DownscalingOverride::DoubleDownscale => 2.0,
            DownscalingOverride::TripleDownscale => 3.0,
            DownscalingOverride::QuadrupleDownscale => 4.0,
        }
    }
}

/// Crop rectangle in normalised image coordinates (`-1..=1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropWindow {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl CropWindow {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.min_x, self.max_x, self.min_y, self.max_y]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimelightSettings {
    pub led_mode: Option<LedMode>,
    pub pipeline_index: Option<u8>,
    /// Tag the camera prefers for `tx`/`ty` targeting.
    pub priority_tag_id: Option<i32>,
    pub stream_mode: Option<StreamMode>,
    pub crop_window: Option<CropWindow>,
    /// Robot heading for MegaTag2; must be refreshed every cycle.
    pub robot_orientation: Option<Orientation3d>,
    pub fiducial_downscaling: Option<DownscalingOverride>,
    /// Offset of the 3D point of interest from the tag centre.
    pub april_tag_offset: Option<Translation3d>,
    /// Only these tag ids are used for localisation.
    pub april_tag_id_filter: Option<Vec<i32>>,
    /// Camera pose in the robot frame.
    pub camera_offset: Option<Pose3d>,
}

impl LimelightSettings {
    /// Bus writes this batch would perform, in key order of the table above.
    pub fn entries(&self) -> Vec<(&'static str, Value)> {
        let mut out = Vec::new();
        if let Some(mode) = self.led_mode {
            out.push(("ledMode", Value::Double(mode.code())));
        }
        if let Some(index) = self.pipeline_index {
            out.push(("pipeline", Value::Double(f64::from(index))));
        }
        if let Some(id) = self.priority_tag_id {
            out.push(("priorityid", Value::Double(f64::from(id))));
        }
        if let Some(mode) = self.stream_mode {
            out.push(("stream", Value::Double(mode.code())));
        }
        if let Some(crop) = self.crop_window {
            out.push(("crop", Value::DoubleArray(crop.to_array().to_vec())));
        }
        if let Some(orientation) = &self.robot_orientation {
            out.push((
                "robot_orientation_set",
                Value::DoubleArray(orientation_to_array(orientation).to_vec()),
            ));
        }
        if let Some(downscale) = self.fiducial_downscaling {
            out.push(("fiducial_downscale_set", Value::Double(downscale.factor())));
        }
        if let Some(offset) = &self.april_tag_offset {
            out.push((
                "fiducial_offset_set",
                Value::DoubleArray(translation3d_to_array(offset).to_vec()),
            ));
        }
        if let Some(ids) = &self.april_tag_id_filter {
            out.push((
                "fiducial_id_filters_set",
                Value::DoubleArray(ids.iter().copied().map(f64::from).collect()),
            ));
        }
        if let Some(pose) = &self.camera_offset {
            out.push((
                "camerapose_robotspace_set",
                Value::DoubleArray(pose3d_to_array(pose).to_vec()),
            ));
        }
        out
    }

    /// Write every set field to `table`, then flush once.
    pub fn apply(&self, table: &Table) -> Result<(), YallError> {
        let entries = self.entries();
        debug!(table = table.name(), count = entries.len(), "applying camera settings");
        for (key, value) in entries {
            table.set(key, value)?;
        }
        table.flush()
    }
}
