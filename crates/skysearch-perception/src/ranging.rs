//! Forward-sector obstacle ranging.
//!
//! Reduces a raw body-frame point cloud (lidar returns, x forward, y right,
//! z down) to a single number: the horizontal distance to the nearest
//! return inside a box directly ahead of the vehicle.  The lateral and
//! vertical extents keep ground and ceiling returns out of the answer.
//!
//! # Example
//!
//! ```rust
//! use skysearch_perception::frames::Vec3;
//! use skysearch_perception::ranging::{ForwardSector, nearest_obstacle_distance};
//!
//! let sector = ForwardSector::default();
//! let cloud = [
//!     Vec3::new(4.0, 0.5, 0.0),   // ahead, inside the band
//!     Vec3::new(-2.0, 0.0, 0.0),  // behind
//!     Vec3::new(1.0, 0.0, 6.0),   // ground return
//! ];
//! assert!((nearest_obstacle_distance(&cloud, &sector) - 4.0f64.hypot(0.5)).abs() < 1e-9);
//! assert_eq!(nearest_obstacle_distance(&[], &sector), sector.max_range_m);
//! ```

use serde::{Deserialize, Serialize};

use crate::frames::Vec3;

/// Region ahead of the vehicle that counts for obstacle checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardSector {
    /// Returns closer than this along the forward axis are ignored
    /// (self-hits, propeller guards).
    #[serde(default = "default_min_forward")]
    pub min_forward_m: f64,
    /// Half of the lateral band width.
    #[serde(default = "default_half_width")]
    pub half_width_m: f64,
    /// Half of the vertical band height.
    #[serde(default = "default_half_height")]
    pub half_height_m: f64,
    /// Reported when nothing qualifies.
    #[serde(default = "default_max_range")]
    pub max_range_m: f64,
}

fn default_min_forward() -> f64 {
    0.5
}
fn default_half_width() -> f64 {
    1.5
}
fn default_half_height() -> f64 {
    1.0
}
fn default_max_range() -> f64 {
    20.0
}

impl Default for ForwardSector {
    fn default() -> Self {
        Self {
            min_forward_m: default_min_forward(),
            half_width_m: default_half_width(),
            half_height_m: default_half_height(),
            max_range_m: default_max_range(),
        }
    }
}

impl ForwardSector {
    /// True when the body-frame point lies inside the sector.
    pub fn contains(&self, p: Vec3) -> bool {
        p.x > self.min_forward_m
            && p.y.abs() <= self.half_width_m
            && p.z.abs() <= self.half_height_m
            && p.horizontal_norm() <= self.max_range_m
    }
}

/// Horizontal distance to the nearest point inside `sector`, or
/// `sector.max_range_m` when no point qualifies.
pub fn nearest_obstacle_distance(points: &[Vec3], sector: &ForwardSector) -> f64 {
    points
        .iter()
        .copied()
        .filter(|p| sector.contains(*p))
        .map(Vec3::horizontal_norm)
        .fold(sector.max_range_m, f64::min)
}
