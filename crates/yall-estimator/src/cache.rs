//! [`BotPoseCache`] – one live [`PoseEstimateEntry`] per [`BotPose`] key.
//!
//! Entries are built on first access and kept for the lifetime of the cache;
//! every read refreshes the entry from the bus before handing it out, so
//! staleness is bounded only by how fast the camera publishes.
//!
//! The key map and each entry sit behind their own mutex: two threads
//! asking for different keys never contend, and two threads asking for the
//! same key decode one after the other instead of interleaving.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::trace;
use yall_bus::Table;
use yall_types::Alliance;

use crate::pose_estimate::{PoseEstimate, PoseEstimateEntry};

/// Which `botpose*` entry to decode: field frame × solving algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BotPose {
    /// Red-alliance origin, MegaTag1.
    Red,
    /// Red-alliance origin, MegaTag2.
    RedMegaTag2,
    /// Blue-alliance origin, MegaTag1.
    Blue,
    /// Blue-alliance origin, MegaTag2.
    BlueMegaTag2,
    /// Legacy field-centre origin, MegaTag1.
    FieldCenter,
}

impl BotPose {
    /// Bus entry name carrying this pose.
    pub const fn entry_name(self) -> &'static str {
        match self {
            BotPose::Red => "botpose_wpired",
            BotPose::RedMegaTag2 => "botpose_orb_wpired",
            BotPose::Blue => "botpose_wpiblue",
            BotPose::BlueMegaTag2 => "botpose_orb_wpiblue",
            BotPose::FieldCenter => "botpose",
        }
    }

    pub const fn is_megatag2(self) -> bool {
        matches!(self, BotPose::RedMegaTag2 | BotPose::BlueMegaTag2)
    }

    /// Key for the given alliance origin and algorithm.
    pub const fn for_alliance(alliance: Alliance, megatag2: bool) -> Self {
        match (alliance, megatag2) {
            (Alliance::Red, false) => BotPose::Red,
            (Alliance::Red, true) => BotPose::RedMegaTag2,
            (Alliance::Blue, false) => BotPose::Blue,
            (Alliance::Blue, true) => BotPose::BlueMegaTag2,
        }
    }
}

/// Read-through cache of [`PoseEstimateEntry`]s for one camera table.
#[derive(Debug)]
pub struct BotPoseCache {
    table: Table,
    entries: Mutex<HashMap<BotPose, Arc<Mutex<PoseEstimateEntry>>>>,
}

impl BotPoseCache {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Refresh and return the shared entry for `key`, building it on first
    /// use. Repeated calls for one key return the same instance; outside
    /// this crate it can only be read.
    pub fn get(&self, key: BotPose) -> Arc<Mutex<PoseEstimateEntry>> {
        let entry = self.entry(key);
        entry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .refresh();
        entry
    }

    /// Refresh `key` and return a copy of the decoded estimate.
    pub fn estimate(&self, key: BotPose) -> Option<PoseEstimate> {
        let entry = self.entry(key);
        let mut guard = entry.lock().unwrap_or_else(PoisonError::into_inner);
        guard.refresh()
    }

    /// Number of keys built so far.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, key: BotPose) -> Arc<Mutex<PoseEstimateEntry>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(key)
            .or_insert_with(|| {
                trace!(table = self.table.name(), entry = key.entry_name(), "building pose entry");
                Arc::new(Mutex::new(PoseEstimateEntry::new(self.table.clone(), key)))
            })
            .clone()
    }
}
