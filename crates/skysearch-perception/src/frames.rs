//! Rigid-body frame conversions.
//!
//! Converts between the three orientation representations used by the
//! flight stack (Euler angles, unit quaternions and 3×3 rotation matrices)
//! and between camera-frame and world-frame poses.
//!
//! # Conventions
//!
//! - Quaternions are always `(w, x, y, z)`.  [`Quaternion::from_xyzw`] and
//!   [`Quaternion::to_xyzw`] exist only for converting at API boundaries that
//!   use the scalar-last layout.
//! - Euler angles compose intrinsically in Z-Y-X (yaw, then pitch, then
//!   roll).  [`euler_to_quaternion`] takes radians; [`EulerAngles`] holds
//!   degrees.
//! - World positions are NED (x north, y east, z down).  Body frames are
//!   x forward, y right, z down.
//!
//! # Example
//!
//! ```rust
//! use skysearch_perception::frames::{
//!     euler_to_quaternion, quaternion_to_rotation_matrix, rotation_matrix_to_euler_angles,
//! };
//!
//! // 90° yaw, level flight.
//! let q = euler_to_quaternion(0.0, 0.0, std::f64::consts::FRAC_PI_2);
//! assert!((q.w - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
//! assert!((q.z - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
//!
//! let r = quaternion_to_rotation_matrix(q);
//! assert!((r.m[0][1] + 1.0).abs() < 1e-9);
//! assert!((r.m[1][0] - 1.0).abs() < 1e-9);
//!
//! let euler = rotation_matrix_to_euler_angles(&r);
//! assert!((euler.yaw - 90.0).abs() < 1e-6);
//! ```

use tracing::debug;

/// `1 − |R[2][0]|` below this value is treated as gimbal lock.
pub const GIMBAL_LOCK_EPSILON: f64 = 1e-6;

// ────────────────────────────────────────────────────────────────────────────
// Vec3
// ────────────────────────────────────────────────────────────────────────────

/// A 3-D vector (metres when used as a position).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    pub fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    pub fn neg(self) -> Self {
        self.scale(-1.0)
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Length of the projection onto the x-y plane.
    pub fn horizontal_norm(self) -> f64 {
        self.x.hypot(self.y)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Quaternion
// ────────────────────────────────────────────────────────────────────────────

/// A rotation quaternion in `(w, x, y, z)` order.
///
/// `q` and `-q` describe the same orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    /// Create a quaternion.  The caller is responsible for providing a unit
    /// quaternion when it is used as a rotation.
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Build from scalar-last components `[x, y, z, w]`.
    pub fn from_xyzw(xyzw: [f64; 4]) -> Self {
        Self::new(xyzw[3], xyzw[0], xyzw[1], xyzw[2])
    }

    /// Scalar-last components `[x, y, z, w]`.
    pub fn to_xyzw(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn to_wxyz(self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Pure heading rotation about the down axis.
    pub fn from_yaw_degrees(yaw_deg: f64) -> Self {
        euler_to_quaternion(0.0, 0.0, yaw_deg.to_radians())
    }

    pub fn norm(self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Scale to unit length.  A zero quaternion is returned unchanged.
    pub fn normalize(self) -> Self {
        let n = self.norm();
        if n == 0.0 {
            return self;
        }
        Self::new(self.w / n, self.x / n, self.y / n, self.z / n)
    }

    pub fn neg(self) -> Self {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }

    /// Hamilton product: compose two rotations (`self` applied after `rhs`).
    pub fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }

    /// Conjugate (== inverse for a unit quaternion).
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotate a vector by this quaternion: p' = q * p * q*.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let p = Self::new(0.0, v.x, v.y, v.z);
        let rotated = self.mul(p).mul(self.conjugate());
        Vec3::new(rotated.x, rotated.y, rotated.z)
    }

    /// True when `self` and `other` describe the same orientation within
    /// `tol`, accounting for the double cover.
    pub fn same_rotation(self, other: Self, tol: f64) -> bool {
        let close = |a: Self, b: Self| {
            (a.w - b.w).abs() < tol
                && (a.x - b.x).abs() < tol
                && (a.y - b.y).abs() < tol
                && (a.z - b.z).abs() < tol
        };
        close(self, other) || close(self, other.neg())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Matrix3
// ────────────────────────────────────────────────────────────────────────────

/// A row-major 3×3 matrix; `m[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    pub m: [[f64; 3]; 3],
}

impl Matrix3 {
    pub fn new(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    pub fn from_rows(r0: [f64; 3], r1: [f64; 3], r2: [f64; 3]) -> Self {
        Self::new([r0, r1, r2])
    }

    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::new([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Self::new(out)
    }

    pub fn mul_vec(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    pub fn neg(&self) -> Self {
        let mut out = self.m;
        out.iter_mut().flatten().for_each(|c| *c = -*c);
        Self::new(out)
    }

    pub fn trace(&self) -> f64 {
        self.m[0][0] + self.m[1][1] + self.m[2][2]
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Frobenius norm of `RᵗR − I`.  Zero for an exact rotation matrix.
    pub fn orthonormality_error(&self) -> f64 {
        let rtr = self.transpose().mul(self);
        let id = Self::identity();
        let mut sum = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                let d = rtr.m[i][j] - id.m[i][j];
                sum += d * d;
            }
        }
        sum.sqrt()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// EulerAngles
// ────────────────────────────────────────────────────────────────────────────

/// Roll, pitch and yaw in **degrees**, composed intrinsically Z-Y-X.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl EulerAngles {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    pub fn from_radians(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
    }

    /// `(roll, pitch, yaw)` in radians.
    pub fn to_radians(self) -> (f64, f64, f64) {
        (
            self.roll.to_radians(),
            self.pitch.to_radians(),
            self.yaw.to_radians(),
        )
    }

    pub fn to_quaternion(self) -> Quaternion {
        let (roll, pitch, yaw) = self.to_radians();
        euler_to_quaternion(roll, pitch, yaw)
    }

    pub fn to_rotation_matrix(self) -> Matrix3 {
        euler_to_rotation_matrix(self)
    }
}

/// Wrap an angle in degrees into `[-180, 180)`.
pub fn wrap_degrees(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

// ────────────────────────────────────────────────────────────────────────────
// Orientation conversions
// ────────────────────────────────────────────────────────────────────────────

/// Euler angles (radians, Z-Y-X) to a unit quaternion `(w, x, y, z)`.
pub fn euler_to_quaternion(roll: f64, pitch: f64, yaw: f64) -> Quaternion {
    let (sr, cr) = (roll * 0.5).sin_cos();
    let (sp, cp) = (pitch * 0.5).sin_cos();
    let (sy, cy) = (yaw * 0.5).sin_cos();

    Quaternion::new(
        cr * cp * cy + sr * sp * sy,
        sr * cp * cy - cr * sp * sy,
        cr * sp * cy + sr * cp * sy,
        cr * cp * sy - sr * sp * cy,
    )
}

/// Closed-form quaternion to rotation matrix.
///
/// The input is **not** normalised: a non-unit quaternion produces a matrix
/// that is not orthonormal.  Call [`Quaternion::normalize`] first when the
/// source cannot guarantee unit length.
pub fn quaternion_to_rotation_matrix(q: Quaternion) -> Matrix3 {
    let Quaternion { w, x, y, z } = q;
    Matrix3::from_rows(
        [
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - z * w),
            2.0 * (x * z + y * w),
        ],
        [
            2.0 * (x * y + z * w),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - x * w),
        ],
        [
            2.0 * (x * z - y * w),
            2.0 * (y * z + x * w),
            1.0 - 2.0 * (x * x + y * y),
        ],
    )
}

/// Rotation matrix to Z-Y-X Euler angles in degrees.
///
/// At gimbal lock (`1 − |R[2][0]| < GIMBAL_LOCK_EPSILON`) yaw is pinned to 0
/// and roll absorbs the coupled rotation.
pub fn rotation_matrix_to_euler_angles(r: &Matrix3) -> EulerAngles {
    let m = &r.m;
    let pitch = (-m[2][0]).clamp(-1.0, 1.0).asin();

    let (roll, yaw) = if 1.0 - m[2][0].abs() < GIMBAL_LOCK_EPSILON {
        ((-m[1][2]).atan2(m[1][1]), 0.0)
    } else {
        (m[2][1].atan2(m[2][2]), m[1][0].atan2(m[0][0]))
    };

    EulerAngles::from_radians(roll, pitch, yaw)
}

/// Euler angles in degrees to `Rz(yaw) · Ry(pitch) · Rx(roll)`.
pub fn euler_to_rotation_matrix(euler: EulerAngles) -> Matrix3 {
    let (roll, pitch, yaw) = euler.to_radians();
    let (sr, cr) = roll.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();

    let rx = Matrix3::from_rows([1.0, 0.0, 0.0], [0.0, cr, -sr], [0.0, sr, cr]);
    let ry = Matrix3::from_rows([cp, 0.0, sp], [0.0, 1.0, 0.0], [-sp, 0.0, cp]);
    let rz = Matrix3::from_rows([cy, -sy, 0.0], [sy, cy, 0.0], [0.0, 0.0, 1.0]);

    rz.mul(&ry.mul(&rx))
}

/// Rotation matrix to quaternion `(w, x, y, z)`.
///
/// Uses the direct formula when the trace is positive, otherwise the branch
/// keyed on the largest diagonal element (first one wins on ties).
pub fn rotation_matrix_to_quaternion(r: &Matrix3) -> Quaternion {
    let m = &r.m;
    let trace = r.trace();

    if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        return Quaternion::new(
            0.25 * s,
            (m[2][1] - m[1][2]) / s,
            (m[0][2] - m[2][0]) / s,
            (m[1][0] - m[0][1]) / s,
        );
    }

    let diag = [m[0][0], m[1][1], m[2][2]];
    let mut i = 0;
    for k in 1..3 {
        if diag[k] > diag[i] {
            i = k;
        }
    }

    match i {
        0 => {
            let s = (1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt() * 2.0;
            Quaternion::new(
                (m[2][1] - m[1][2]) / s,
                0.25 * s,
                (m[0][1] + m[1][0]) / s,
                (m[0][2] + m[2][0]) / s,
            )
        }
        1 => {
            let s = (1.0 + m[1][1] - m[0][0] - m[2][2]).sqrt() * 2.0;
            Quaternion::new(
                (m[0][2] - m[2][0]) / s,
                (m[0][1] + m[1][0]) / s,
                0.25 * s,
                (m[1][2] + m[2][1]) / s,
            )
        }
        _ => {
            let s = (1.0 + m[2][2] - m[0][0] - m[1][1]).sqrt() * 2.0;
            Quaternion::new(
                (m[1][0] - m[0][1]) / s,
                (m[0][2] + m[2][0]) / s,
                (m[1][2] + m[2][1]) / s,
                0.25 * s,
            )
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Camera / world projection
// ────────────────────────────────────────────────────────────────────────────

/// Camera centre in world coordinates from a world-in-camera extrinsic
/// `(q, T)`: `C = −Rᵗ · T`.
pub fn calculate_camera_position_world(orientation: Quaternion, translation: Vec3) -> Vec3 {
    let r = quaternion_to_rotation_matrix(orientation);
    r.transpose().neg().mul_vec(translation)
}

/// Camera-frame translation of a world position: `T = −R · C`.
///
/// Inverse of [`calculate_camera_position_world`] for the same `R`.
pub fn calculate_translation_from_world(r: &Matrix3, world_position: Vec3) -> Vec3 {
    r.neg().mul_vec(world_position)
}

/// Camera pose expressed in the world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraWorldPose {
    pub position: Vec3,
    pub orientation: EulerAngles,
}

/// Camera extrinsic `(q, T)` to the camera's world position and Euler
/// orientation.
pub fn camera_to_world(orientation: Quaternion, translation: Vec3) -> CameraWorldPose {
    let position = calculate_camera_position_world(orientation, translation);
    let euler = rotation_matrix_to_euler_angles(&quaternion_to_rotation_matrix(orientation));
    debug!(
        x = position.x,
        y = position.y,
        z = position.z,
        roll = euler.roll,
        pitch = euler.pitch,
        yaw = euler.yaw,
        "camera pose in world frame"
    );
    CameraWorldPose {
        position,
        orientation: euler,
    }
}

/// World position and Euler orientation to the camera extrinsic `(q, T)`.
pub fn world_to_camera(position: Vec3, orientation: EulerAngles) -> (Quaternion, Vec3) {
    let r = euler_to_rotation_matrix(orientation);
    let q = rotation_matrix_to_quaternion(&r);
    let t = calculate_translation_from_world(&r, position);
    debug!(
        qw = q.w,
        qx = q.x,
        qy = q.y,
        qz = q.z,
        tx = t.x,
        ty = t.y,
        tz = t.z,
        "camera extrinsic from world pose"
    );
    (q, t)
}

/// World position and quaternion orientation to the camera translation `T`.
pub fn world_to_camera_wxyz(position: Vec3, orientation: Quaternion) -> Vec3 {
    let r = quaternion_to_rotation_matrix(orientation);
    let t = calculate_translation_from_world(&r, position);
    debug!(tx = t.x, ty = t.y, tz = t.z, "camera translation from world pose");
    t
}

// ────────────────────────────────────────────────────────────────────────────
// Pose
// ────────────────────────────────────────────────────────────────────────────

/// Position (NED metres) and orientation of a body in the world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quaternion,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quaternion) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    pub fn euler(&self) -> EulerAngles {
        rotation_matrix_to_euler_angles(&quaternion_to_rotation_matrix(self.orientation))
    }

    /// Height above the origin; NED stores altitude as negative down.
    pub fn altitude(&self) -> f64 {
        -self.position.z
    }

    /// Express a body-frame point in the world frame.
    pub fn body_to_world(&self, p: Vec3) -> Vec3 {
        self.position.add(self.orientation.rotate(p))
    }

    /// Express a world-frame point in the body frame.  Assumes a unit
    /// orientation quaternion.
    pub fn world_to_body(&self, p: Vec3) -> Vec3 {
        self.orientation.conjugate().rotate(p.sub(self.position))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};

    const TOL: f64 = 1e-9;

    fn axis_angle(axis: Vec3, angle: f64) -> Quaternion {
        let a = axis.scale(1.0 / axis.norm());
        let (s, c) = (angle * 0.5).sin_cos();
        Quaternion::new(c, a.x * s, a.y * s, a.z * s)
    }

    fn assert_vec_close(a: Vec3, b: Vec3, tol: f64) {
        assert!(
            (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol && (a.z - b.z).abs() < tol,
            "{a:?} != {b:?}"
        );
    }

    // ── Quaternion ──────────────────────────────────────────────────────────

    #[test]
    fn yaw_90_scenario() {
        let q = EulerAngles::new(0.0, 0.0, 90.0).to_quaternion();
        assert!((q.w - FRAC_1_SQRT_2).abs() < 1e-4);
        assert!(q.x.abs() < 1e-4);
        assert!(q.y.abs() < 1e-4);
        assert!((q.z - FRAC_1_SQRT_2).abs() < 1e-4);

        let r = quaternion_to_rotation_matrix(q);
        assert!((r.m[0][1] + 1.0).abs() < 1e-6);
        assert!((r.m[1][0] - 1.0).abs() < 1e-6);
        assert!(r.m[0][0].abs() < 1e-6);
        assert!((r.m[2][2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn xyzw_boundary_helpers_swap_scalar_position() {
        let q = Quaternion::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(q.to_xyzw(), [0.2, 0.3, 0.4, 0.1]);
        assert_eq!(Quaternion::from_xyzw(q.to_xyzw()), q);
        assert_eq!(q.to_wxyz(), [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn euler_to_quaternion_is_unit() {
        for (r, p, y) in [(0.3, -0.2, 1.1), (-2.0, 1.2, -3.0), (10.0, -7.0, 4.0)] {
            let q = euler_to_quaternion(r, p, y);
            assert!((q.norm() - 1.0).abs() < TOL);
        }
    }

    #[test]
    fn quaternion_90deg_yaw_rotates_north_to_east() {
        let q = Quaternion::from_yaw_degrees(90.0);
        let r = q.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert_vec_close(r, Vec3::new(0.0, 1.0, 0.0), 1e-12);
    }

    #[test]
    fn normalize_scales_to_unit_and_keeps_zero() {
        let q = Quaternion::new(2.0, 0.0, 0.0, 2.0).normalize();
        assert!((q.norm() - 1.0).abs() < TOL);
        assert!((q.w - FRAC_1_SQRT_2).abs() < TOL);

        let zero = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(zero.normalize(), zero);
    }

    // ── Rotation matrices ───────────────────────────────────────────────────

    #[test]
    fn rotation_matrix_is_orthonormal() {
        let samples = [
            axis_angle(Vec3::new(1.0, 2.0, 3.0), 0.7),
            axis_angle(Vec3::new(-1.0, 0.5, 0.0), 2.9),
            axis_angle(Vec3::new(0.0, 0.0, 1.0), PI),
            euler_to_quaternion(1.2, -0.4, 2.5),
        ];
        for q in samples {
            let r = quaternion_to_rotation_matrix(q);
            assert!(r.orthonormality_error() < 1e-12, "{r:?}");
            assert!((r.determinant() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn non_unit_quaternion_is_not_normalised() {
        let r = quaternion_to_rotation_matrix(Quaternion::new(2.0, 0.0, 0.0, 0.0));
        assert!(r.orthonormality_error() < TOL, "pure scalar leaves identity");

        let skewed = quaternion_to_rotation_matrix(Quaternion::new(1.0, 1.0, 0.0, 0.0));
        assert!(skewed.orthonormality_error() > 0.1);
    }

    #[test]
    fn quaternion_path_matches_direct_euler_matrix() {
        let euler = EulerAngles::new(25.0, -40.0, 135.0);
        let via_q = quaternion_to_rotation_matrix(euler.to_quaternion());
        let direct = euler.to_rotation_matrix();
        for i in 0..3 {
            for j in 0..3 {
                assert!((via_q.m[i][j] - direct.m[i][j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn euler_roundtrip_through_quaternion_and_matrix() {
        let cases = [
            (0.0, 0.0, 0.0),
            (10.0, 20.0, 30.0),
            (-45.0, 60.0, -170.0),
            (179.0, -89.0, 1.0),
            (-120.0, 5.0, 95.0),
        ];
        for (roll, pitch, yaw) in cases {
            let q = euler_to_quaternion(
                f64::to_radians(roll),
                f64::to_radians(pitch),
                f64::to_radians(yaw),
            );
            let back = rotation_matrix_to_euler_angles(&quaternion_to_rotation_matrix(q));
            assert!((back.roll - roll).abs() < 1e-4, "roll {roll} -> {}", back.roll);
            assert!((back.pitch - pitch).abs() < 1e-4, "pitch {pitch} -> {}", back.pitch);
            assert!((back.yaw - yaw).abs() < 1e-4, "yaw {yaw} -> {}", back.yaw);
        }
    }

    #[test]
    fn quaternion_roundtrip_through_matrix_up_to_sign() {
        let cases = [
            Quaternion::identity(),
            axis_angle(Vec3::new(1.0, 0.0, 0.0), PI),
            axis_angle(Vec3::new(0.0, 1.0, 0.0), PI),
            axis_angle(Vec3::new(0.0, 0.0, 1.0), PI),
            axis_angle(Vec3::new(1.0, 1.0, 0.0), 2.5),
            axis_angle(Vec3::new(0.2, -0.7, 0.4), -1.3),
            axis_angle(Vec3::new(0.0, 1.0, 1.0), 3.0),
            euler_to_quaternion(0.4, 0.9, -2.8).neg(),
        ];
        for q in cases {
            let back = rotation_matrix_to_quaternion(&quaternion_to_rotation_matrix(q));
            assert!(q.same_rotation(back, 1e-9), "{q:?} -> {back:?}");
        }
    }

    #[test]
    fn negative_trace_selects_largest_diagonal_branch() {
        // 180° about y: diag = (-1, 1, -1), trace = -1.
        let r = quaternion_to_rotation_matrix(axis_angle(Vec3::new(0.0, 1.0, 0.0), PI));
        let q = rotation_matrix_to_quaternion(&r);
        assert!((q.y - 1.0).abs() < TOL, "y branch must yield +y, got {q:?}");
        assert!(q.w.abs() < TOL);
    }

    // ── Gimbal lock ─────────────────────────────────────────────────────────

    #[test]
    fn gimbal_lock_pitch_up_pins_yaw() {
        let r = euler_to_rotation_matrix(EulerAngles::new(10.0, 90.0, 20.0));
        let e = rotation_matrix_to_euler_angles(&r);
        assert!(!e.roll.is_nan() && !e.pitch.is_nan() && !e.yaw.is_nan());
        assert_eq!(e.yaw, 0.0);
        assert!((e.pitch - 90.0).abs() < 1e-9);
        assert!((e.roll - (-10.0)).abs() < 1e-6, "roll = {}", e.roll);
    }

    #[test]
    fn gimbal_lock_pitch_down_pins_yaw() {
        let r = euler_to_rotation_matrix(EulerAngles::new(10.0, -90.0, 20.0));
        let e = rotation_matrix_to_euler_angles(&r);
        assert_eq!(e.yaw, 0.0);
        assert!((e.pitch + 90.0).abs() < 1e-9);
        assert!((e.roll - 30.0).abs() < 1e-6, "roll = {}", e.roll);
    }

    #[test]
    fn out_of_range_sine_does_not_produce_nan() {
        let r = Matrix3::from_rows(
            [0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0],
            [-1.000_000_000_1, 0.0, 0.0],
        );
        let e = rotation_matrix_to_euler_angles(&r);
        assert!((e.pitch - 90.0).abs() < 1e-9);
        assert_eq!(e.yaw, 0.0);
        assert!(!e.roll.is_nan());
    }

    // ── Camera / world ──────────────────────────────────────────────────────

    #[test]
    fn camera_world_inverse_recovers_translation() {
        let cases = [
            (euler_to_quaternion(0.1, 0.2, 0.3), Vec3::new(1.0, -2.0, 3.0)),
            (axis_angle(Vec3::new(1.0, 1.0, 1.0), 2.0), Vec3::new(-50.0, 0.5, 12.0)),
            (Quaternion::identity(), Vec3::new(0.0, 0.0, -30.0)),
        ];
        for (q, t) in cases {
            let world = calculate_camera_position_world(q, t);
            let back = calculate_translation_from_world(&quaternion_to_rotation_matrix(q), world);
            assert_vec_close(back, t, 1e-9);
        }
    }

    #[test]
    fn camera_position_identity_is_negated_translation() {
        let c = calculate_camera_position_world(Quaternion::identity(), Vec3::new(1.0, 2.0, 3.0));
        assert_vec_close(c, Vec3::new(-1.0, -2.0, -3.0), TOL);
    }

    #[test]
    fn world_to_camera_and_back() {
        let position = Vec3::new(12.0, -4.0, -25.0);
        let orientation = EulerAngles::new(5.0, -10.0, 45.0);

        let (q, t) = world_to_camera(position, orientation);
        assert!((q.norm() - 1.0).abs() < 1e-12);
        assert_vec_close(world_to_camera_wxyz(position, q), t, 1e-9);

        let pose = camera_to_world(q, t);
        assert_vec_close(pose.position, position, 1e-9);
        assert!((pose.orientation.roll - 5.0).abs() < 1e-6);
        assert!((pose.orientation.pitch + 10.0).abs() < 1e-6);
        assert!((pose.orientation.yaw - 45.0).abs() < 1e-6);
    }

    // ── Pose ────────────────────────────────────────────────────────────────

    #[test]
    fn pose_body_world_roundtrip() {
        let pose = Pose::new(Vec3::new(10.0, 5.0, -20.0), Quaternion::from_yaw_degrees(90.0));
        assert!((pose.altitude() - 20.0).abs() < TOL);

        // One metre ahead while facing east.
        let ahead = pose.body_to_world(Vec3::new(1.0, 0.0, 0.0));
        assert_vec_close(ahead, Vec3::new(10.0, 6.0, -20.0), 1e-12);
        assert_vec_close(pose.world_to_body(ahead), Vec3::new(1.0, 0.0, 0.0), 1e-12);
        assert!((pose.euler().yaw - 90.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_degrees_range() {
        assert!((wrap_degrees(190.0) + 170.0).abs() < TOL);
        assert!((wrap_degrees(-190.0) - 170.0).abs() < TOL);
        assert!((wrap_degrees(180.0) + 180.0).abs() < TOL);
        assert!((wrap_degrees(720.0 + 30.0) - 30.0).abs() < TOL);
        assert!((wrap_degrees(FRAC_PI_2.to_degrees()) - 90.0).abs() < TOL);
    }
}
