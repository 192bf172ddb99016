//! [`FiducialSet`] – confidence aggregates over the tags in one estimate.
//!
//! Ambiguity is in `[0, 1]` with lower meaning more trustworthy. When an
//! estimate carries no decoded tags every aggregate reports the worst case,
//! `1.0`, so that a caller filtering on `ambiguity < threshold` rejects it.

use yall_types::RawFiducial;

/// Ambiguity reported when no tags were decoded.
pub const NO_DATA_AMBIGUITY: f64 = 1.0;

/// Borrowed view over the fiducials of a single estimate.
///
/// Without data the view is empty, whatever tags the slice still holds.
#[derive(Debug, Clone, Copy)]
pub struct FiducialSet<'a> {
    fiducials: &'a [RawFiducial],
    has_data: bool,
}

impl<'a> FiducialSet<'a> {
    pub fn new(fiducials: &'a [RawFiducial], has_data: bool) -> Self {
        Self {
            fiducials: if has_data { fiducials } else { &[] },
            has_data,
        }
    }

    pub fn len(&self) -> usize {
        self.fiducials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fiducials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a RawFiducial> + 'a {
        self.fiducials.iter()
    }

    /// Lowest ambiguity among the tags, or `1.0` without data.
    pub fn min_ambiguity(&self) -> f64 {
        if !self.has_data {
            return NO_DATA_AMBIGUITY;
        }
        self.fiducials
            .iter()
            .map(|tag| tag.ambiguity)
            .fold(f64::MAX, f64::min)
    }

    /// Highest ambiguity among the tags, or `1.0` without data.
    pub fn max_ambiguity(&self) -> f64 {
        if !self.has_data {
            return NO_DATA_AMBIGUITY;
        }
        self.fiducials
            .iter()
            .map(|tag| tag.ambiguity)
            .fold(0.0, f64::max)
    }

    /// Mean ambiguity across the tags, or `1.0` without data.
    pub fn avg_ambiguity(&self) -> f64 {
        if !self.has_data || self.fiducials.is_empty() {
            return NO_DATA_AMBIGUITY;
        }
        let sum: f64 = self.fiducials.iter().map(|tag| tag.ambiguity).sum();
        sum / self.fiducials.len() as f64
    }

    /// The tag nearest the camera, if any.
    pub fn closest(&self) -> Option<&'a RawFiducial> {
        self.fiducials
            .iter()
            .min_by(|a, b| a.dist_to_camera.total_cmp(&b.dist_to_camera))
    }
}
