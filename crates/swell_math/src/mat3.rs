//! 3x3 matrix utilities
//!
//! Matrices are flat row-major arrays so they can be handed directly to the
//! [`crate::linalg`] kernels (`mat_vec` with a 3-vector).

use crate::Vec3;

/// 3x3 matrix type (row-major)
pub type Mat3 = [f32; 9];

/// Identity matrix
pub const IDENTITY: Mat3 = [
    1.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
    0.0, 0.0, 1.0,
];

/// Zero matrix
pub const ZERO: Mat3 = [0.0; 9];

/// Diagonal matrix with the given entries
pub fn from_diagonal(d: [f32; 3]) -> Mat3 {
    [
        d[0], 0.0, 0.0,
        0.0, d[1], 0.0,
        0.0, 0.0, d[2],
    ]
}

/// Diagonal entries
pub fn diagonal(m: &Mat3) -> [f32; 3] {
    [m[0], m[4], m[8]]
}

/// Multiply every entry by a scalar
pub fn scale(m: &Mat3, s: f32) -> Mat3 {
    let mut result = *m;
    for v in result.iter_mut() {
        *v *= s;
    }
    result
}

/// Matrix product `a * b`
#[allow(clippy::needless_range_loop)]
pub fn mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut result = ZERO;
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i * 3 + j] += a[i * 3 + k] * b[k * 3 + j];
            }
        }
    }
    result
}

/// Transpose
pub fn transpose(m: &Mat3) -> Mat3 {
    [
        m[0], m[3], m[6],
        m[1], m[4], m[7],
        m[2], m[5], m[8],
    ]
}

/// Matrix times column vector
pub fn mul_vec3(m: &Mat3, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0] * v.x + m[1] * v.y + m[2] * v.z,
        m[3] * v.x + m[4] * v.y + m[5] * v.z,
        m[6] * v.x + m[7] * v.y + m[8] * v.z,
    )
}

/// Determinant
pub fn determinant(m: &Mat3) -> f32 {
    m[0] * (m[4] * m[8] - m[5] * m[7])
        - m[1] * (m[3] * m[8] - m[5] * m[6])
        + m[2] * (m[3] * m[7] - m[4] * m[6])
}

/// Inverse via the adjugate
///
/// A singular matrix maps to [`ZERO`], which for an inverse inertia tensor
/// means the body does not respond to torque. Singularity is judged relative
/// to the largest entry, so uniformly small matrices still invert.
pub fn inverse(m: &Mat3) -> Mat3 {
    let scale = m.iter().fold(0.0f32, |acc, x| acc.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return ZERO;
    }
    let det = determinant(m);
    if det.abs() <= f32::EPSILON * scale * scale * scale {
        return ZERO;
    }
    let inv_det = 1.0 / det;
    [
        (m[4] * m[8] - m[5] * m[7]) * inv_det,
        (m[2] * m[7] - m[1] * m[8]) * inv_det,
        (m[1] * m[5] - m[2] * m[4]) * inv_det,
        (m[5] * m[6] - m[3] * m[8]) * inv_det,
        (m[0] * m[8] - m[2] * m[6]) * inv_det,
        (m[2] * m[3] - m[0] * m[5]) * inv_det,
        (m[3] * m[7] - m[4] * m[6]) * inv_det,
        (m[1] * m[6] - m[0] * m[7]) * inv_det,
        (m[0] * m[4] - m[1] * m[3]) * inv_det,
    ]
}

/// Whether `m` equals its transpose within `epsilon`
pub fn is_symmetric(m: &Mat3, epsilon: f32) -> bool {
    (m[1] - m[3]).abs() <= epsilon
        && (m[2] - m[6]).abs() <= epsilon
        && (m[5] - m[7]).abs() <= epsilon
}
