//! `yall-camera` – one Limelight camera as seen over the telemetry bus.
//!
//! # Modules
//!
//! - [`limelight`] – [`Limelight`]: owns the camera's bus table and its
//!   pose cache, hands out [`PoseEstimator`][yall_estimator::PoseEstimator]s.
//! - [`data`] – [`LimelightData`]: read-only views of targeting, pipeline and
//!   raw result entries.
//! - [`settings`] – [`LimelightSettings`]: immutable batch of configuration
//!   writes.
//! - [`snapshot`] – fire-and-forget snapshot capture over HTTP.

pub mod data;
pub mod limelight;
pub mod settings;
pub mod snapshot;

pub use data::{LimelightData, PipelineData, TargetData};
pub use limelight::{Limelight, sanitize_name};
pub use settings::{CropWindow, DownscalingOverride, LedMode, LimelightSettings, StreamMode};
