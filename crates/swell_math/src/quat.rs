//! Quaternion for representing body orientation
//!
//! Components are stored x, y, z, w so the vector part comes first, matching
//! the layout used inside serialized body state.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::mat3::Mat3;
use crate::Vec3;

/// Rotation quaternion `w + xi + yj + zk`
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a quaternion from raw components
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis` (normalized internally)
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized();
        let (sin_h, cos_h) = (angle * 0.5).sin_cos();
        Self::new(axis.x * sin_h, axis.y * sin_h, axis.z * sin_h, cos_h)
    }

    /// Pure quaternion (zero scalar part) from a vector
    #[inline]
    pub fn from_vector(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 0.0)
    }

    /// Build from the first four floats of a slice (x, y, z, w)
    #[inline]
    pub fn from_slice(s: &[f32]) -> Self {
        Self::new(s[0], s[1], s[2], s[3])
    }

    /// Write x, y, z, w into the first four floats of a slice
    #[inline]
    pub fn write_to(self, out: &mut [f32]) {
        out[0] = self.x;
        out[1] = self.y;
        out[2] = self.z;
        out[3] = self.w;
    }

    /// Squared magnitude
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Magnitude
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Normalize to unit magnitude
    ///
    /// A degenerate (zero) quaternion becomes the identity.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            self.scale(1.0 / mag)
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate; for unit quaternions this is the inverse rotation
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiply every component by a scalar
    #[inline]
    pub fn scale(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }

    /// Hamilton product `self * other` (applies `other` first)
    #[allow(clippy::should_implement_trait)]
    pub fn mul(&self, other: &Self) -> Self {
        Self::new(
            self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
            self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
        )
    }

    /// Rotate a vector: `v' = q v q*`
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Row-major rotation matrix for a unit quaternion
    pub fn to_matrix(&self) -> Mat3 {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);

        [
            1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy),
            2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx),
            2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy),
        ]
    }
}
