//! Pixel + depth back-projection.
//!
//! Places a detection found at pixel `(u, v)` in the world using a planar
//! depth value (distance along the optical axis) and the camera's pose.
//! The camera frame matches the body frame: x along the optical axis,
//! y right, z down, so a camera pose can be fed straight from the vehicle
//! pose plus any mounting offset.

use crate::frames::{Pose, Vec3};

/// Pinhole intrinsics in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Square-pixel intrinsics from image size and horizontal field of view.
    pub fn from_fov(width: u32, height: u32, hfov_deg: f64) -> Self {
        let f = width as f64 / (2.0 * (hfov_deg.to_radians() * 0.5).tan());
        Self::new(f, f, width as f64 * 0.5, height as f64 * 0.5)
    }
}

/// Depth readings outside `[min_m, max_m]` are treated as invalid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthWindow {
    pub min_m: f64,
    pub max_m: f64,
}

impl Default for DepthWindow {
    fn default() -> Self {
        Self {
            min_m: 1.0,
            max_m: 500.0,
        }
    }
}

impl DepthWindow {
    pub fn accepts(&self, depth: f64) -> bool {
        depth.is_finite() && depth >= self.min_m && depth <= self.max_m
    }
}

/// Camera-frame point seen at pixel `(u, v)` with planar depth `depth`.
///
/// Returns `None` when the depth is rejected by `window`.
pub fn pixel_to_camera(
    u: f64,
    v: f64,
    depth: f64,
    intrinsics: &CameraIntrinsics,
    window: &DepthWindow,
) -> Option<Vec3> {
    if !window.accepts(depth) {
        return None;
    }
    Some(Vec3::new(
        depth,
        (u - intrinsics.cx) * depth / intrinsics.fx,
        (v - intrinsics.cy) * depth / intrinsics.fy,
    ))
}

/// World-frame point seen at pixel `(u, v)` by a camera at `camera_pose`.
pub fn pixel_to_world(
    u: f64,
    v: f64,
    depth: f64,
    intrinsics: &CameraIntrinsics,
    window: &DepthWindow,
    camera_pose: &Pose,
) -> Option<Vec3> {
    pixel_to_camera(u, v, depth, intrinsics, window).map(|p| camera_pose.body_to_world(p))
}
