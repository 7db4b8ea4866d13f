//! Rigid body types for physics simulation

use crate::error::StateError;
use crate::mass::MassDistribution;
use crate::state::{segment, segment_mut, PhysicalState};
use slotmap::new_key_type;
use swell_math::mat3::{self, Mat3};
use swell_math::{Quat, Vec3};

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing so a key to a removed body returns None
    /// instead of pointing at whatever reuses its slot.
    pub struct BodyKey;
}

/// Floats per rigid body state segment:
/// position (3), orientation xyzw (4), linear momentum (3), angular momentum (3)
pub const RIGID_BODY_STATE_SIZE: usize = 13;

const POSITION: usize = 0;
const ORIENTATION: usize = 3;
const LINEAR_MOMENTUM: usize = 7;
const ANGULAR_MOMENTUM: usize = 10;

/// A rigid body with position, orientation, momentum and a mass distribution
///
/// Momentum rather than velocity is the integrated quantity, so forces and
/// torques appear directly in the derivative.
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Centre of mass in world coordinates
    pub position: Vec3,
    /// Rotation from body frame to world frame
    pub orientation: Quat,
    /// Linear momentum `m·v`
    pub linear_momentum: Vec3,
    /// Angular momentum `I·ω` in world frame
    pub angular_momentum: Vec3,
    /// Whether the world applies gravity to this body
    pub affected_by_gravity: bool,
    /// Force accumulated for the current derivative evaluation
    force: Vec3,
    /// Torque accumulated for the current derivative evaluation
    torque: Vec3,
    mass: f32,
    shape: MassDistribution,
    /// Cached inverse of the body-frame inertia tensor
    inverse_inertia: Mat3,
}

impl RigidBody {
    /// Create a body at rest at the origin
    pub fn new(shape: MassDistribution, mass: f32) -> Self {
        let mut body = Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            linear_momentum: Vec3::ZERO,
            angular_momentum: Vec3::ZERO,
            affected_by_gravity: true,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            mass,
            shape,
            inverse_inertia: mat3::ZERO,
        };
        body.refresh_inertia();
        body
    }

    /// Create a solid box body
    pub fn new_box(extents: Vec3, mass: f32) -> Self {
        Self::new(MassDistribution::cuboid(extents.x, extents.y, extents.z), mass)
    }

    /// Create a solid sphere body
    pub fn new_sphere(radius: f32, mass: f32) -> Self {
        Self::new(MassDistribution::sphere(radius), mass)
    }

    /// Create a solid cylinder body (axis along local z)
    pub fn new_cylinder(height: f32, radius: f32, mass: f32) -> Self {
        Self::new(MassDistribution::cylinder(height, radius), mass)
    }

    /// Set the position of this body
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the orientation of this body
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation.normalize();
        self
    }

    /// Set the linear velocity (stored as momentum)
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_momentum = velocity * self.mass;
        self
    }

    /// Set the world-frame angular momentum
    pub fn with_angular_momentum(mut self, angular_momentum: Vec3) -> Self {
        self.angular_momentum = angular_momentum;
        self
    }

    /// Set the mass, keeping the current velocity
    pub fn with_mass(mut self, mass: f32) -> Self {
        let velocity = self.velocity();
        self.mass = mass;
        self.linear_momentum = velocity * mass;
        self.refresh_inertia();
        self
    }

    /// Set whether this body is affected by gravity
    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    /// Total mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Inverse mass; zero for non-positive mass (immovable)
    pub fn inverse_mass(&self) -> f32 {
        if self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// Mass distribution
    pub fn shape(&self) -> &MassDistribution {
        &self.shape
    }

    /// Body-frame inertia tensor
    pub fn inertia_tensor(&self) -> Mat3 {
        self.shape.inertia_tensor(self.mass)
    }

    /// World-frame inverse inertia tensor `R I⁻¹ Rᵀ`
    pub fn world_inverse_inertia(&self) -> Mat3 {
        let r = self.orientation.to_matrix();
        mat3::mul(&mat3::mul(&r, &self.inverse_inertia), &mat3::transpose(&r))
    }

    /// Linear velocity `P / m`
    pub fn velocity(&self) -> Vec3 {
        self.linear_momentum * self.inverse_mass()
    }

    /// Angular velocity `ω = R I⁻¹ Rᵀ L`
    pub fn angular_velocity(&self) -> Vec3 {
        mat3::mul_vec3(&self.world_inverse_inertia(), self.angular_momentum)
    }

    /// Kinetic energy (translational plus rotational)
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.velocity().dot(self.linear_momentum)
            + 0.5 * self.angular_velocity().dot(self.angular_momentum)
    }

    /// Volume of the mass distribution
    pub fn volume(&self) -> f32 {
        self.shape.volume()
    }

    /// Radius of a sphere around the centre of mass enclosing the body
    pub fn bounding_radius(&self) -> f32 {
        self.shape.bounding_radius()
    }

    /// Transform a body-frame point to world coordinates
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation.rotate(local)
    }

    /// Accumulated force
    pub fn force(&self) -> Vec3 {
        self.force
    }

    /// Accumulated torque
    pub fn torque(&self) -> Vec3 {
        self.torque
    }

    /// Add a force through the centre of mass
    ///
    /// Forces applied between steps are held constant over the next
    /// [`PhysicsWorld::step`](crate::PhysicsWorld::step) and then cleared.
    /// Position-dependent forces belong in a [`ForceModel`](crate::ForceModel).
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Add a force at a world-space point, producing torque about the centre of mass
    pub fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.force += force;
        self.torque += (point - self.position).cross(force);
    }

    /// Add a pure torque (held for the next step, like [`Self::apply_force`])
    pub fn apply_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Reset the force and torque accumulators
    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    fn refresh_inertia(&mut self) {
        self.inverse_inertia = mat3::inverse(&self.inertia_tensor());
    }
}

impl PhysicalState for RigidBody {
    fn state_size(&self) -> usize {
        RIGID_BODY_STATE_SIZE
    }

    fn serialize_state(&self, out: &mut [f32], offset: usize) -> Result<(), StateError> {
        let s = segment_mut(out, offset, RIGID_BODY_STATE_SIZE)?;
        self.position.write_to(&mut s[POSITION..]);
        self.orientation.write_to(&mut s[ORIENTATION..]);
        self.linear_momentum.write_to(&mut s[LINEAR_MOMENTUM..]);
        self.angular_momentum.write_to(&mut s[ANGULAR_MOMENTUM..]);
        Ok(())
    }

    fn deserialize_state(&mut self, from: &[f32], offset: usize) -> Result<(), StateError> {
        let s = segment(from, offset, RIGID_BODY_STATE_SIZE)?;
        self.position = Vec3::from_slice(&s[POSITION..]);
        self.orientation = Quat::from_slice(&s[ORIENTATION..]);
        self.linear_momentum = Vec3::from_slice(&s[LINEAR_MOMENTUM..]);
        self.angular_momentum = Vec3::from_slice(&s[ANGULAR_MOMENTUM..]);
        Ok(())
    }

    fn serialize_state_derivative(&self, out: &mut [f32], offset: usize) -> Result<(), StateError> {
        let s = segment_mut(out, offset, RIGID_BODY_STATE_SIZE)?;

        // q̇ = ½ ω q
        let omega = Quat::from_vector(self.angular_velocity());
        let spin = omega.mul(&self.orientation).scale(0.5);

        self.velocity().write_to(&mut s[POSITION..]);
        spin.write_to(&mut s[ORIENTATION..]);
        self.force.write_to(&mut s[LINEAR_MOMENTUM..]);
        self.torque.write_to(&mut s[ANGULAR_MOMENTUM..]);
        Ok(())
    }
}
