//! [`PoseEstimate`] snapshots and the live [`PoseEstimateEntry`] behind them.
//!
//! # Array layout
//!
//! Every `botpose*` entry the camera publishes has the shape
//!
//! ```text
//! [x, y, z, roll°, pitch°, yaw°, latency_ms, tag_count, tag_span, avg_dist, avg_area,
//!  <tag_count × (id, txnc, tync, ta, dist_to_camera, dist_to_robot, ambiguity)>]
//! ```
//!
//! # Decoding policy
//!
//! | Input | Result |
//! |---|---|
//! | empty array | `None`; the entry drops its tags and `has_data` goes `false` |
//! | length ≠ `11 + 7 × tag_count` | scalars kept, no fiducials, `has_data = false` |
//! | well-formed | scalars + fiducials, `has_data = !fiducials.is_empty()` |
//!
//! The timestamp is shifted back by the reported latency so it marks the
//! moment the frame was captured, not when the bus delivered it.

use serde::{Deserialize, Serialize};
use tracing::debug;
use yall_bus::{Table, TimestampedArray};
use yall_types::{Pose3d, RawFiducial};

use crate::cache::BotPose;
use crate::codec::{extract, fiducial_blocks, pose3d_from_array};
use crate::fiducial::FiducialSet;

/// Scalar slots preceding the per-tag blocks.
pub const SCALAR_FIELDS: usize = 11;

/// One decoded robot pose estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseEstimate {
    /// Robot pose in the entry's field frame.
    pub pose: Pose3d,
    /// Capture time on the bus clock, in seconds.
    pub timestamp_seconds: f64,
    /// Total pipeline latency in milliseconds.
    pub latency_ms: f64,
    /// Tags the camera reported using.
    pub tag_count: i32,
    /// Distance between the outermost tags, in metres.
    pub tag_span_meters: f64,
    /// Mean tag distance, in metres.
    pub avg_tag_distance: f64,
    /// Mean tag area, as a percentage of the image.
    pub avg_tag_area_percent: f64,
    /// Per-tag detail, in array order.
    pub raw_fiducials: Vec<RawFiducial>,
    /// `true` iff at least one fiducial was decoded.
    pub has_data: bool,
    /// Solved with MegaTag2.
    pub is_megatag2: bool,
}

impl PoseEstimate {
    /// An estimate with no data yet.
    pub fn empty(is_megatag2: bool) -> Self {
        Self {
            is_megatag2,
            ..Default::default()
        }
    }

    /// Decode one bus sample. Returns `None` only for an empty array.
    pub fn decode(sample: &TimestampedArray, is_megatag2: bool) -> Option<Self> {
        let raw = sample.values.as_slice();
        if raw.is_empty() {
            return None;
        }

        let latency_ms = extract(raw, 6);
        let tag_count = extract(raw, 7) as i32;
        let timestamp_seconds =
            sample.timestamp_micros as f64 / 1_000_000.0 - latency_ms / 1_000.0;

        let expected_len = SCALAR_FIELDS as i64 + RawFiducial::FIELDS as i64 * i64::from(tag_count);
        let raw_fiducials = if tag_count > 0 && raw.len() as i64 == expected_len {
            fiducial_blocks(raw, SCALAR_FIELDS, tag_count as usize)
        } else {
            if raw.len() as i64 != expected_len {
                debug!(
                    len = raw.len(),
                    expected = expected_len,
                    tag_count,
                    "pose array length does not match tag count; skipping fiducials"
                );
            }
            Vec::new()
        };

        Some(Self {
            pose: pose3d_from_array(raw),
            timestamp_seconds,
            latency_ms,
            tag_count,
            tag_span_meters: extract(raw, 8),
            avg_tag_distance: extract(raw, 9),
            avg_tag_area_percent: extract(raw, 10),
            has_data: !raw_fiducials.is_empty(),
            raw_fiducials,
            is_megatag2,
        })
    }

    /// Aggregate view over [`raw_fiducials`](Self::raw_fiducials).
    pub fn fiducials(&self) -> FiducialSet<'_> {
        FiducialSet::new(&self.raw_fiducials, self.has_data)
    }

    /// Lowest tag ambiguity; `1.0` without data.
    pub fn min_tag_ambiguity(&self) -> f64 {
        self.fiducials().min_ambiguity()
    }

    /// Highest tag ambiguity; `1.0` without data.
    pub fn max_tag_ambiguity(&self) -> f64 {
        self.fiducials().max_ambiguity()
    }

    /// Mean tag ambiguity; `1.0` without data.
    pub fn avg_tag_ambiguity(&self) -> f64 {
        self.fiducials().avg_ambiguity()
    }
}

impl std::fmt::Display for PoseEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.has_data {
            return writeln!(f, "No PoseEstimate available.");
        }
        writeln!(f, "Pose Estimate Information:")?;
        writeln!(f, "Timestamp (Seconds): {:.3}", self.timestamp_seconds)?;
        writeln!(f, "Latency: {:.3} ms", self.latency_ms)?;
        writeln!(f, "Tag Count: {}", self.tag_count)?;
        writeln!(f, "Tag Span: {:.2} meters", self.tag_span_meters)?;
        writeln!(f, "Average Tag Distance: {:.2} meters", self.avg_tag_distance)?;
        writeln!(f, "Average Tag Area: {:.2}% of image", self.avg_tag_area_percent)?;
        writeln!(f, "Is MegaTag2: {}", self.is_megatag2)?;
        writeln!(f)?;
        writeln!(f, "Raw Fiducials Details:")?;
        for (i, fiducial) in self.raw_fiducials.iter().enumerate() {
            writeln!(f, "Fiducial #{}:", i + 1)?;
            write!(f, "{fiducial}")?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PoseEstimateEntry
// ────────────────────────────────────────────────────────────────────────────

/// A [`PoseEstimate`] bound to one `botpose*` bus entry.
///
/// Every cache read re-reads the entry and overwrites the held estimate in
/// place. Owned by [`BotPoseCache`](crate::cache::BotPoseCache); callers
/// outside this crate only see [`estimate`](Self::estimate) or clones of it.
#[derive(Debug)]
pub struct PoseEstimateEntry {
    table: Table,
    key: BotPose,
    estimate: PoseEstimate,
}

impl PoseEstimateEntry {
    pub fn new(table: Table, key: BotPose) -> Self {
        Self {
            table,
            key,
            estimate: PoseEstimate::empty(key.is_megatag2()),
        }
    }

    pub fn key(&self) -> BotPose {
        self.key
    }

    /// The estimate as of the last refresh.
    pub fn estimate(&self) -> &PoseEstimate {
        &self.estimate
    }

    /// Pull the latest sample from the bus and re-decode.
    pub(crate) fn refresh(&mut self) -> Option<PoseEstimate> {
        let sample = self.table.read_array(self.key.entry_name());
        self.apply(&sample)
    }

    /// Decode `sample` into the held estimate.
    ///
    /// An empty sample clears `has_data` and drops the previous tags; the
    /// scalar fields keep their previous values.
    pub(crate) fn apply(&mut self, sample: &TimestampedArray) -> Option<PoseEstimate> {
        match PoseEstimate::decode(sample, self.key.is_megatag2()) {
            Some(decoded) => {
                self.estimate = decoded;
                Some(self.estimate.clone())
            }
            None => {
                self.estimate.has_data = false;
                self.estimate.raw_fiducials.clear();
                None
            }
        }
    }
}
