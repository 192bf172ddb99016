//! `yall-types` – shared vocabulary for the Limelight telemetry client.
//!
//! Everything that crosses a crate boundary lives here: field geometry,
//! decoded fiducial/detector results, the alliance enum and the
//! crate-wide [`YallError`].
//!
//! # Modules
//!
//! - [`geometry`] – [`Pose3d`], [`Pose2d`], [`Translation3d`],
//!   [`Rotation3d`] and the robot [`Orientation3d`].
//! - [`results`] – [`RawFiducial`] and [`RawDetection`] records decoded from
//!   the camera's flat arrays.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod geometry;
pub mod results;

pub use geometry::{AngularVelocity3d, Orientation3d, Pose2d, Pose3d, Rotation3d, Translation3d};
pub use results::{RawDetection, RawFiducial};

/// Alliance colour reported by the match / driver-station service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    Red,
    Blue,
}

impl std::fmt::Display for Alliance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alliance::Red => write!(f, "red"),
            Alliance::Blue => write!(f, "blue"),
        }
    }
}

impl std::str::FromStr for Alliance {
    type Err = YallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Alliance::Red),
            "blue" => Ok(Alliance::Blue),
            other => Err(YallError::Config(format!("unknown alliance '{other}'"))),
        }
    }
}

/// Global error type for the boundary operations of the client.
///
/// Pose decoding itself never fails; these variants only come out of bus
/// writes, configuration loading, replay parsing, output encoding and
/// snapshot requests.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum YallError {
    #[error("Telemetry bus error: {0}")]
    Bus(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot request failed: {0}")]
    Snapshot(String),

    #[error("Replay error: {0}")]
    Replay(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Camera '{camera}' is not publishing on the bus")]
    Unavailable { camera: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alliance_parses_case_insensitively() {
        assert_eq!("Red".parse::<Alliance>().unwrap(), Alliance::Red);
        assert_eq!(" blue ".parse::<Alliance>().unwrap(), Alliance::Blue);
        assert!("green".parse::<Alliance>().is_err());
    }

    #[test]
    fn alliance_serializes_lowercase() {
        let json = serde_json::to_string(&Alliance::Blue).unwrap();
        assert_eq!(json, "\"blue\"");
        let back: Alliance = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(back, Alliance::Red);
    }

    #[test]
    fn yall_error_display() {
        let err = YallError::Unavailable {
            camera: "limelight-front".to_string(),
        };
        assert!(err.to_string().contains("limelight-front"));

        let err2 = YallError::Bus("table closed".to_string());
        assert!(err2.to_string().contains("Telemetry bus error"));

        let err3 = YallError::Output("failed to encode JSON".to_string());
        assert_eq!(err3.to_string(), "Output error: failed to encode JSON");
    }
}
