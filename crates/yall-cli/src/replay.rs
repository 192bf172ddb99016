//! Replay of recorded bus traffic.
//!
//! A recording is JSON lines, one bus write per line:
//!
//! ```text
//! {"table":"limelight","key":"botpose_orb_wpiblue","value":{"type":"double_array","value":[...]},"timestamp_micros":1500000}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Each sample is
//! published into a [`MemoryBus`] with its recorded timestamp, then the
//! estimator is polled once.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use yall_bus::{MemoryBus, Value};
use yall_estimator::{AllianceSource, PoseEstimate, PoseEstimator};
use yall_types::YallError;

/// One recorded bus write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub table: String,
    pub key: String,
    pub value: Value,
    pub timestamp_micros: i64,
}

/// What the estimator reported after one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayFrame {
    pub index: usize,
    pub table: String,
    pub key: String,
    pub timestamp_micros: i64,
    pub estimate: Option<PoseEstimate>,
}

pub fn parse_recording<R: BufRead>(reader: R) -> Result<Vec<Sample>, YallError> {
    let mut samples = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| YallError::Replay(format!("line {}: {e}", n + 1)))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let sample = serde_json::from_str(line)
            .map_err(|e| YallError::Replay(format!("line {}: {e}", n + 1)))?;
        samples.push(sample);
    }
    Ok(samples)
}

pub fn load_recording(path: &Path) -> Result<Vec<Sample>, YallError> {
    let file = File::open(path)
        .map_err(|e| YallError::Replay(format!("failed to open {}: {e}", path.display())))?;
    parse_recording(BufReader::new(file))
}

/// Drives an estimator over a recording.
pub struct Replayer<'a> {
    bus: &'a MemoryBus,
    estimator: &'a PoseEstimator,
    alliance: &'a dyn AllianceSource,
    period: Duration,
}

impl<'a> Replayer<'a> {
    pub fn new(
        bus: &'a MemoryBus,
        estimator: &'a PoseEstimator,
        alliance: &'a dyn AllianceSource,
        period: Duration,
    ) -> Self {
        Self {
            bus,
            estimator,
            alliance,
            period,
        }
    }

    /// Alliance-frame estimate when the alliance is known, blue-origin
    /// otherwise.
    pub fn poll(&self) -> Option<PoseEstimate> {
        match self.alliance.current_alliance() {
            Some(_) => self.estimator.alliance_pose_estimate(),
            None => self.estimator.pose_estimate(),
        }
    }

    /// Publish every sample and hand each resulting frame to `on_frame`.
    /// Stops early once `shutdown` is set. Returns the number of samples
    /// replayed.
    pub fn run<F>(&self, samples: &[Sample], shutdown: &AtomicBool, mut on_frame: F) -> usize
    where
        F: FnMut(&ReplayFrame),
    {
        let mut replayed = 0;
        for (index, sample) in samples.iter().enumerate() {
            if shutdown.load(Ordering::SeqCst) {
                info!(replayed, total = samples.len(), "replay interrupted");
                break;
            }
            if index > 0 && !self.period.is_zero() {
                thread::sleep(self.period);
            }

            self.bus.publish_at(
                &sample.table,
                &sample.key,
                sample.value.clone(),
                sample.timestamp_micros,
            );
            debug!(table = %sample.table, key = %sample.key, "replayed sample");

            on_frame(&ReplayFrame {
                index,
                table: sample.table.clone(),
                key: sample.key.clone(),
                timestamp_micros: sample.timestamp_micros,
                estimate: self.poll(),
            });
            replayed += 1;
        }
        replayed
    }
}
