//! `yall-estimator` – pose-estimate decoding and alliance reconciliation.
//!
//! Turns the flat numeric arrays a Limelight publishes into validated,
//! latency-compensated, alliance-aware [`PoseEstimate`]s.
//!
//! # Modules
//!
//! - [`codec`] – pure array ↔ geometry conversions; never fail, never panic.
//! - [`fiducial`] – [`FiducialSet`]: ambiguity aggregates over the tags seen
//!   in one estimate.
//! - [`pose_estimate`] – [`PoseEstimate`] snapshots and the
//!   [`PoseEstimateEntry`] that refreshes one from the bus.
//! - [`cache`] – [`BotPoseCache`]: exactly one entry per [`BotPose`] key,
//!   refreshed on every read.
//! - [`alliance`] – [`AllianceSource`]: where the current alliance colour
//!   comes from.
//! - [`estimator`] – [`PoseEstimator`]: the façade robot code polls.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use yall_bus::{MemoryBus, Table, Value};
//! use yall_estimator::{BotPoseCache, PoseEstimator};
//! use yall_types::Alliance;
//!
//! let bus = MemoryBus::default();
//! let table = Table::new(Arc::new(bus.clone()), "limelight");
//! let cache = Arc::new(BotPoseCache::new(table));
//! let estimator = PoseEstimator::new(cache, false, Arc::new(Some(Alliance::Red)));
//!
//! bus.publish_at(
//!     "limelight",
//!     "botpose_wpired",
//!     Value::DoubleArray(vec![
//!         1.0, 2.0, 0.0, 0.0, 0.0, 90.0, 20.0, 1.0, 0.0, 2.0, 3.0,
//!         7.0, 0.1, 0.2, 0.3, 1.0, 1.5, 0.02,
//!     ]),
//!     2_000_000,
//! );
//!
//! let estimate = estimator.alliance_pose_estimate().unwrap();
//! assert!(estimate.has_data);
//! assert_eq!(estimate.raw_fiducials[0].id, 7);
//! ```

pub mod alliance;
pub mod cache;
pub mod codec;
pub mod estimator;
pub mod fiducial;
pub mod pose_estimate;

pub use alliance::{AllianceSource, FmsAlliance};
pub use cache::{BotPose, BotPoseCache};
pub use estimator::PoseEstimator;
pub use fiducial::FiducialSet;
pub use pose_estimate::{PoseEstimate, PoseEstimateEntry};
