//! Sensor traits: ranging point clouds and pose telemetry.

use skysearch_perception::{Pose, Vec3};
use skysearch_types::SkyError;

/// A ranging sensor (lidar) that returns body-frame points.
pub trait Ranging: Send {
    /// Read the latest point cloud from `sensor_id`, in the body frame
    /// (x forward, y right, z down).
    ///
    /// # Errors
    ///
    /// Returns [`SkyError::SensorUnavailable`] when the sensor cannot be read.
    fn point_cloud(&mut self, sensor_id: &str) -> Result<Vec<Vec3>, SkyError>;
}

/// Source of the vehicle's world pose.
pub trait PoseSource {
    /// Current pose: NED position and body orientation.
    fn pose(&self) -> Result<Pose, SkyError>;
}
