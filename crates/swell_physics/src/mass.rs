//! Mass distribution models
//!
//! Each shape only knows how to turn a mass into a local-frame inertia tensor.
//! Dispatch is a single `match` in [`inertia_tensor`].

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use swell_math::mat3::{self, Mat3};

/// Canonical mass distributions, centred on the body origin
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MassDistribution {
    /// Solid cuboid with full side lengths along local x, y, z
    Box { extents: [f32; 3] },
    /// Solid sphere
    Sphere { radius: f32 },
    /// Solid cylinder with its axis along local z
    Cylinder { height: f32, radius: f32 },
}

impl MassDistribution {
    /// Solid box with the given full extents
    pub fn cuboid(x: f32, y: f32, z: f32) -> Self {
        MassDistribution::Box { extents: [x, y, z] }
    }

    /// Solid sphere
    pub fn sphere(radius: f32) -> Self {
        MassDistribution::Sphere { radius }
    }

    /// Solid z-aligned cylinder
    pub fn cylinder(height: f32, radius: f32) -> Self {
        MassDistribution::Cylinder { height, radius }
    }

    /// Local-frame inertia tensor for `mass`
    #[inline]
    pub fn inertia_tensor(&self, mass: f32) -> Mat3 {
        inertia_tensor(self, mass)
    }

    /// Enclosed volume
    pub fn volume(&self) -> f32 {
        match *self {
            MassDistribution::Box { extents: [x, y, z] } => x * y * z,
            MassDistribution::Sphere { radius } => 4.0 / 3.0 * PI * radius * radius * radius,
            MassDistribution::Cylinder { height, radius } => PI * radius * radius * height,
        }
    }

    /// Radius of the smallest origin-centred sphere containing the shape
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            MassDistribution::Box { extents: [x, y, z] } => 0.5 * (x * x + y * y + z * z).sqrt(),
            MassDistribution::Sphere { radius } => radius,
            MassDistribution::Cylinder { height, radius } => (radius * radius + 0.25 * height * height).sqrt(),
        }
    }
}

/// Inertia tensor of `shape` with total `mass`, in the shape's local frame
///
/// All three tensors are diagonal and scale linearly with mass.
pub fn inertia_tensor(shape: &MassDistribution, mass: f32) -> Mat3 {
    match *shape {
        MassDistribution::Box { extents: [x, y, z] } => mat3::from_diagonal([
            mass * (y * y + z * z) / 12.0,
            mass * (x * x + z * z) / 12.0,
            mass * (x * x + y * y) / 12.0,
        ]),
        MassDistribution::Sphere { radius } => {
            let i = 0.4 * mass * radius * radius;
            mat3::from_diagonal([i, i, i])
        }
        MassDistribution::Cylinder { height, radius } => {
            let transverse = mass * radius * radius / 4.0 + mass * height * height / 12.0;
            let axial = mass * radius * radius / 2.0;
            mat3::from_diagonal([transverse, transverse, axial])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn shapes() -> [MassDistribution; 3] {
        [
            MassDistribution::cuboid(1.0, 2.0, 3.0),
            MassDistribution::sphere(0.75),
            MassDistribution::cylinder(2.0, 0.5),
        ]
    }

    fn is_diagonal(m: &Mat3) -> bool {
        [1, 2, 3, 5, 6, 7].iter().all(|&i| m[i] == 0.0)
    }

    #[test]
    fn test_box_tensor() {
        let t = inertia_tensor(&MassDistribution::cuboid(1.0, 2.0, 3.0), 12.0);
        assert!(is_diagonal(&t));
        assert_eq!(mat3::diagonal(&t), [13.0, 10.0, 5.0]);
    }

    #[test]
    fn test_box_axis_uses_orthogonal_extents() {
        // Changing the x extent leaves I_xx untouched
        let a = inertia_tensor(&MassDistribution::cuboid(1.0, 2.0, 3.0), 5.0);
        let b = inertia_tensor(&MassDistribution::cuboid(9.0, 2.0, 3.0), 5.0);
        assert_eq!(a[0], b[0]);
        assert_ne!(a[4], b[4]);
        assert_ne!(a[8], b[8]);
    }

    #[test]
    fn test_sphere_is_scaled_identity() {
        let t = inertia_tensor(&MassDistribution::sphere(2.0), 5.0);
        let i = 0.4 * 5.0 * 4.0;
        assert_eq!(t, mat3::scale(&mat3::IDENTITY, i));
    }

    #[test]
    fn test_cylinder_tensor() {
        let t = inertia_tensor(&MassDistribution::cylinder(2.0, 1.0), 6.0);
        assert!(is_diagonal(&t));
        // 6/4 + 6*4/12 = 1.5 + 2 = 3.5; axial 6/2 = 3
        assert!((t[0] - 3.5).abs() < EPSILON);
        assert!((t[4] - 3.5).abs() < EPSILON);
        assert!((t[8] - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_linear_in_mass() {
        for shape in shapes() {
            let single = inertia_tensor(&shape, 3.0);
            let double = inertia_tensor(&shape, 6.0);
            for (a, b) in single.iter().zip(&double) {
                assert!((2.0 * a - b).abs() <= f32::EPSILON * b.abs(), "{:?}", shape);
            }
        }
    }

    #[test]
    fn test_tensors_symmetric() {
        for shape in shapes() {
            assert!(mat3::is_symmetric(&shape.inertia_tensor(1.7), 0.0));
        }
    }

    #[test]
    fn test_volume() {
        assert_eq!(MassDistribution::cuboid(1.0, 2.0, 3.0).volume(), 6.0);
        assert!((MassDistribution::sphere(1.0).volume() - 4.18879).abs() < 1e-4);
        assert!((MassDistribution::cylinder(2.0, 1.0).volume() - 2.0 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_bounding_radius() {
        assert_eq!(MassDistribution::sphere(0.5).bounding_radius(), 0.5);
        assert!((MassDistribution::cuboid(2.0, 2.0, 2.0).bounding_radius() - 3f32.sqrt()).abs() < EPSILON);
        assert_eq!(MassDistribution::cylinder(6.0, 4.0).bounding_radius(), 5.0);
    }

    #[test]
    fn test_serde_tagged_representation() {
        let text = toml::to_string(&MassDistribution::sphere(1.5)).unwrap();
        assert!(text.contains("shape = \"sphere\""));
        let back: MassDistribution = toml::from_str(&text).unwrap();
        assert_eq!(back, MassDistribution::sphere(1.5));
    }
}
