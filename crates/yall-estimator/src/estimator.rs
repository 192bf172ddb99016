//! [`PoseEstimator`] – the façade robot code polls once per control cycle.
//!
//! Holds no state of its own beyond the algorithm choice: every call reads
//! the current alliance, picks the matching [`BotPose`] key and lets the
//! shared [`BotPoseCache`] refresh and decode it.

use std::sync::Arc;

use tracing::debug;
use yall_types::{Alliance, Pose3d};

use crate::alliance::AllianceSource;
use crate::cache::{BotPose, BotPoseCache};
use crate::pose_estimate::PoseEstimate;

/// Pose estimator for one camera and one solving algorithm.
///
/// Estimators built from the same camera share its cache, so every entry
/// still exists exactly once however many estimators poll it.
#[derive(Clone)]
pub struct PoseEstimator {
    cache: Arc<BotPoseCache>,
    megatag2: bool,
    alliance: Arc<dyn AllianceSource>,
}

impl std::fmt::Debug for PoseEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseEstimator")
            .field("megatag2", &self.megatag2)
            .finish_non_exhaustive()
    }
}

impl PoseEstimator {
    pub fn new(cache: Arc<BotPoseCache>, megatag2: bool, alliance: Arc<dyn AllianceSource>) -> Self {
        Self {
            cache,
            megatag2,
            alliance,
        }
    }

    pub fn is_megatag2(&self) -> bool {
        self.megatag2
    }

    /// Blue-origin estimate, the field convention robot code normally uses.
    pub fn pose_estimate(&self) -> Option<PoseEstimate> {
        self.cache.estimate(BotPose::for_alliance(Alliance::Blue, self.megatag2))
    }

    /// Estimate in the frame of the robot's own alliance.
    ///
    /// Returns `None` while the alliance is unknown, whatever the cache holds.
    pub fn alliance_pose_estimate(&self) -> Option<PoseEstimate> {
        let Some(alliance) = self.alliance.current_alliance() else {
            debug!("alliance unknown; no alliance pose estimate");
            return None;
        };
        self.cache.estimate(BotPose::for_alliance(alliance, self.megatag2))
    }

    /// Pose from the legacy field-centre `botpose` entry.
    ///
    /// Identity when nothing usable has been published.
    pub fn legacy_bot_pose(&self) -> Pose3d {
        self.cache
            .estimate(BotPose::FieldCenter)
            .map(|estimate| estimate.pose)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use yall_bus::{MemoryBus, Table, Value};

    fn one_tag(x: f64) -> Value {
        Value::DoubleArray(vec![
            x, 2.0, 0.0, 0.0, 0.0, 180.0, 10.0, 1.0, 0.0, 1.0, 1.0, //
            4.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.1,
        ])
    }

    fn setup(
        megatag2: bool,
        alliance: Arc<dyn AllianceSource>,
    ) -> (MemoryBus, Arc<BotPoseCache>, PoseEstimator) {
        let bus = MemoryBus::default();
        let cache = Arc::new(BotPoseCache::new(Table::new(Arc::new(bus.clone()), "limelight")));
        let estimator = PoseEstimator::new(Arc::clone(&cache), megatag2, alliance);
        (bus, cache, estimator)
    }

    #[test]
    fn pose_estimate_reads_blue_origin() {
        let (bus, _, estimator) = setup(false, Arc::new(None::<Alliance>));
        bus.publish_at("limelight", "botpose_wpiblue", one_tag(3.0), 1);
        bus.publish_at("limelight", "botpose_wpired", one_tag(9.0), 1);

        let estimate = estimator.pose_estimate().unwrap();
        assert_eq!(estimate.pose.translation.x, 3.0);
        assert!(!estimate.is_megatag2);
    }

    #[test]
    fn megatag2_estimator_reads_orb_entries() {
        let (bus, _, estimator) = setup(true, Arc::new(Some(Alliance::Red)));
        bus.publish_at("limelight", "botpose_wpired", one_tag(1.0), 1);
        bus.publish_at("limelight", "botpose_orb_wpired", one_tag(5.0), 1);

        let estimate = estimator.alliance_pose_estimate().unwrap();
        assert_eq!(estimate.pose.translation.x, 5.0);
        assert!(estimate.is_megatag2);
    }

    #[test]
    fn unknown_alliance_is_absent_even_with_data() {
        let (bus, cache, estimator) = setup(false, Arc::new(None::<Alliance>));
        bus.publish_at("limelight", "botpose_wpired", one_tag(1.0), 1);
        bus.publish_at("limelight", "botpose_wpiblue", one_tag(1.0), 1);
        assert!(cache.estimate(BotPose::Red).is_some());

        assert!(estimator.alliance_pose_estimate().is_none());
    }

    #[test]
    fn alliance_is_read_on_every_call() {
        let current = Arc::new(Mutex::new(None::<Alliance>));
        let reader = Arc::clone(&current);
        let source = move || *reader.lock().unwrap();
        let (bus, _, estimator) = setup(false, Arc::new(source));
        bus.publish_at("limelight", "botpose_wpired", one_tag(8.0), 1);
        bus.publish_at("limelight", "botpose_wpiblue", one_tag(2.0), 1);

        assert!(estimator.alliance_pose_estimate().is_none());

        *current.lock().unwrap() = Some(Alliance::Red);
        assert_eq!(estimator.alliance_pose_estimate().unwrap().pose.translation.x, 8.0);

        *current.lock().unwrap() = Some(Alliance::Blue);
        assert_eq!(estimator.alliance_pose_estimate().unwrap().pose.translation.x, 2.0);
    }

    #[test]
    fn estimators_share_the_camera_cache() {
        let (bus, cache, mt1) = setup(false, Arc::new(Some(Alliance::Blue)));
        let mt2 = PoseEstimator::new(Arc::clone(&cache), true, Arc::new(Some(Alliance::Blue)));
        bus.publish_at("limelight", "botpose_wpiblue", one_tag(1.0), 1);
        bus.publish_at("limelight", "botpose_orb_wpiblue", one_tag(1.0), 1);

        mt1.pose_estimate();
        mt2.pose_estimate();
        mt1.alliance_pose_estimate();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn legacy_bot_pose_uses_field_center_entry() {
        let (bus, _, estimator) = setup(false, Arc::new(None::<Alliance>));
        assert!(estimator.legacy_bot_pose().is_identity());

        bus.publish_at("limelight", "botpose", one_tag(4.5), 1);
        let pose = estimator.legacy_bot_pose();
        assert_eq!(pose.translation.x, 4.5);
        assert!((pose.rotation.yaw - std::f64::consts::PI).abs() < 1e-9);

        bus.publish_at("limelight", "botpose", Value::DoubleArray(vec![1.0, 2.0]), 2);
        assert!(estimator.legacy_bot_pose().is_identity());
    }
}
