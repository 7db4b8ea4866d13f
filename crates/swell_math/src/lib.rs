//! Mathematics Library
//!
//! This crate provides the numeric building blocks shared by the spectral
//! and physics crates of the Swell workspace.
//!
//! ## Core Types
//!
//! - [`Complex`] - 64-bit complex value used by the spectral transforms
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - Unit quaternion for body orientation
//! - [`Mat3`] - 3x3 row-major matrix stored as a flat array
//!
//! ## Flat Buffers
//!
//! [`linalg`] holds the allocation-free vector/matrix kernels that
//! integrators and force models sweep over shared state buffers.

mod complex;
mod vec3;
mod quat;
pub mod linalg;
pub mod mat3;

pub use complex::Complex;
pub use vec3::Vec3;
pub use quat::Quat;
pub use mat3::Mat3;
