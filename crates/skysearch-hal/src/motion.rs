//! `Motion` trait for anything that can fly the vehicle forward and turn it.

use skysearch_perception::Vec3;
use skysearch_types::SkyError;

/// Blocking motion commands against a single vehicle.
///
/// Every command returns only after the motion has completed.  Concurrent
/// use of one vehicle from several controllers is not supported: headings
/// and positions would race.
pub trait Motion: Send {
    /// Fly `distance_m` metres along the current heading.
    ///
    /// # Errors
    ///
    /// Returns [`SkyError::HardwareFault`] if the command is rejected or does
    /// not complete.  Vehicle state is unknown after a failure.
    fn advance(&mut self, distance_m: f64) -> Result<(), SkyError>;

    /// Rotate to an absolute heading in degrees (0 = north, 90 = east).
    ///
    /// # Errors
    ///
    /// Returns [`SkyError::HardwareFault`] if the rotation fails.
    fn set_heading(&mut self, heading_deg: f64) -> Result<(), SkyError>;

    /// Current heading in degrees.
    fn heading(&self) -> Result<f64, SkyError>;

    /// Current NED position in metres.
    fn position(&self) -> Result<Vec3, SkyError>;
}
