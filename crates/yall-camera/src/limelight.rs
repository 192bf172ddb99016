//! [`Limelight`] – entry point for one camera on the bus.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{error, info};
use yall_bus::{Table, TelemetrySource};
use yall_estimator::{AllianceSource, BotPoseCache, PoseEstimator};
use yall_types::YallError;

use crate::data::LimelightData;
use crate::settings::LimelightSettings;
use crate::snapshot;

/// Table name used when a camera is configured without one.
pub const DEFAULT_NAME: &str = "limelight";

/// Key the camera publishes as soon as it is running a pipeline.
const HEARTBEAT_KEY: &str = "getpipe";

/// `name`, or [`DEFAULT_NAME`] when blank.
pub fn sanitize_name(name: &str) -> &str {
    if name.trim().is_empty() {
        DEFAULT_NAME
    } else {
        name
    }
}

/// A Limelight camera publishing into one bus table.
///
/// Every [`PoseEstimator`] built from the same camera shares one
/// [`BotPoseCache`].
#[derive(Debug, Clone)]
pub struct Limelight {
    name: String,
    table: Table,
    cache: Arc<BotPoseCache>,
}

impl Limelight {
    /// Handle for the camera publishing into table `name`.
    ///
    /// The pose cache belongs to the handle, not to the table: two handles
    /// built for the same name decode every entry twice. Build one handle
    /// per camera and clone it where needed.
    pub fn new(source: Arc<dyn TelemetrySource>, name: &str) -> Self {
        let name = sanitize_name(name).to_string();
        let table = Table::new(source, name.clone());
        let cache = Arc::new(BotPoseCache::new(table.clone()));
        Self { name, table, cache }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Whether the camera is currently publishing.
    pub fn is_available(&self) -> bool {
        self.table.contains_key(HEARTBEAT_KEY)
    }

    /// Poll up to `attempts` times, `interval` apart, for the camera to show
    /// up on the bus. The camera is always checked at least once, even with
    /// `attempts == 0`. Meant for start-up, not for the periodic loop.
    ///
    /// # Errors
    ///
    /// [`YallError::Unavailable`] when the camera never appears; the other
    /// `limelight*` tables on the bus are logged to help spot a misnamed
    /// camera.
    pub fn wait_until_available(&self, attempts: u32, interval: Duration) -> Result<(), YallError> {
        let attempts = attempts.max(1);
        for attempt in 1..=attempts {
            if self.is_available() {
                return Ok(());
            }
            info!(camera = %self.name, attempt, attempts, "waiting for camera to attach");
            if attempt < attempts {
                thread::sleep(interval);
            }
        }

        let candidates: Vec<String> = self
            .table
            .source()
            .tables()
            .into_iter()
            .filter(|t| t.starts_with(DEFAULT_NAME))
            .collect();
        error!(
            camera = %self.name,
            available = if candidates.is_empty() { "--none--".to_string() } else { candidates.join(" ") },
            "camera is not on the bus (no {HEARTBEAT_KEY} key)"
        );
        Err(YallError::Unavailable {
            camera: self.name.clone(),
        })
    }

    /// Pose estimator for this camera using MegaTag2 or MegaTag1.
    pub fn pose_estimator(&self, megatag2: bool, alliance: Arc<dyn AllianceSource>) -> PoseEstimator {
        PoseEstimator::new(Arc::clone(&self.cache), megatag2, alliance)
    }

    /// Targeting, pipeline and raw result entries.
    pub fn data(&self) -> LimelightData {
        LimelightData::new(self.table.clone())
    }

    /// Write `settings` to the camera in one batch and flush.
    pub fn apply_settings(&self, settings: &LimelightSettings) -> Result<(), YallError> {
        settings.apply(&self.table)
    }

    /// Ask the camera to save a snapshot on a background thread.
    ///
    /// Nothing waits on the result; failures are logged by the worker.
    pub fn snapshot(&self, snapshot_name: &str) -> Result<JoinHandle<Result<(), YallError>>, YallError> {
        snapshot::spawn_capture(snapshot::snapshot_url(&self.name), snapshot_name.to_string())
    }

    pub fn flush(&self) -> Result<(), YallError> {
        self.table.flush()
    }
}
