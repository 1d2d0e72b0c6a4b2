//! `skysearch-perception` – geometry for placing the vehicle and what it sees.
//!
//! # Modules
//!
//! - [`frames`] – conversions between Euler angles, quaternions and rotation
//!   matrices, camera/world extrinsics, and the [`Pose`][frames::Pose] value
//!   type.
//! - [`ranging`] – [`nearest_obstacle_distance`][ranging::nearest_obstacle_distance]:
//!   reduces a body-frame point cloud to the nearest return inside a
//!   [`ForwardSector`][ranging::ForwardSector].
//! - [`projection`] – back-projects a pixel with planar depth into the camera
//!   frame and the world frame.

pub mod frames;
pub mod projection;
pub mod ranging;

pub use frames::{EulerAngles, Matrix3, Pose, Quaternion, Vec3};
pub use ranging::{ForwardSector, nearest_obstacle_distance};
