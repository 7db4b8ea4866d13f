//! Physics world and simulation
//!
//! The world owns every body's state in one contiguous buffer. Each body gets
//! a fixed offset into it, recomputed whenever bodies are added or removed, so
//! the integrator can sweep all bodies in a single pass.

use crate::body::{BodyKey, RigidBody};
use crate::error::StateError;
use crate::integrator::{Dynamics, Integrator, IntegratorKind};
use crate::state::PhysicalState;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use swell_math::Vec3;

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity acceleration (applied to Y-axis, negative = down)
    pub gravity: f32,
    /// Integration strategy
    pub integrator: IntegratorKind,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            integrator: IntegratorKind::Euler,
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    /// Set the integration strategy
    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }
}

/// External forces applied during each derivative evaluation
///
/// Called once per body per evaluation, after gravity has been added and
/// with the body's state set to the point being evaluated. RK4 evaluates four
/// times per step, so models must not accumulate their own state per call.
pub trait ForceModel {
    fn apply(&mut self, key: BodyKey, body: &mut RigidBody);
}

impl<F: FnMut(BodyKey, &mut RigidBody)> ForceModel for F {
    fn apply(&mut self, key: BodyKey, body: &mut RigidBody) {
        self(key, body)
    }
}

/// Force model that adds nothing beyond gravity
pub struct NoForces;

impl ForceModel for NoForces {
    fn apply(&mut self, _key: BodyKey, _body: &mut RigidBody) {}
}

/// The physics world containing all rigid bodies
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody>,
    /// Offset of each body's segment in the state buffers
    layout: Vec<(BodyKey, usize)>,
    /// Packed state of every body
    state: Vec<f32>,
    /// Derivative at `state`
    derivative: Vec<f32>,
    /// Integrator output, swapped into `state` after each step
    next: Vec<f32>,
    /// Force and torque applied by callers between steps, per layout entry
    applied: Vec<(Vec3, Vec3)>,
    integrator: Integrator,
    config: PhysicsConfig,
    /// Total simulated time
    time: f64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        log::debug!("Creating physics world with {:?} integrator", config.integrator);
        Self {
            bodies: SlotMap::with_key(),
            layout: Vec::new(),
            state: Vec::new(),
            derivative: Vec::new(),
            next: Vec::new(),
            applied: Vec::new(),
            integrator: Integrator::new(config.integrator, 0),
            config,
            time: 0.0,
        }
    }

    /// Current configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Change gravity
    pub fn set_gravity(&mut self, gravity: f32) {
        self.config.gravity = gravity;
    }

    /// Switch integration strategy
    pub fn set_integrator(&mut self, kind: IntegratorKind) {
        self.config.integrator = kind;
        self.integrator = Integrator::new(kind, self.state.len());
    }

    /// Total simulated time in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        let key = self.bodies.insert(body);
        self.rebuild_layout();
        key
    }

    /// Remove a body from the world and return it
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        let body = self.bodies.remove(key);
        if body.is_some() {
            self.rebuild_layout();
        }
        body
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Iterate over all bodies
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    /// Offset of a body's segment in the state buffer
    pub fn state_offset(&self, key: BodyKey) -> Option<usize> {
        self.layout
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, offset)| offset)
    }

    /// Packed state as of the last step (or layout change)
    pub fn state(&self) -> &[f32] {
        &self.state
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// This performs:
    /// 1. Packing every body into the shared state buffer
    /// 2. Derivative evaluation (gravity, forces applied since the last
    ///    step, and `forces`)
    /// 3. Integration of the whole buffer
    /// 4. Unpacking, with orientations renormalized
    pub fn step(&mut self, dt: f32, forces: &mut dyn ForceModel) -> Result<(), StateError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(StateError::InvalidTimeStep(dt));
        }

        // Phase 1: Pack, keeping caller-applied forces for every evaluation
        for (&(key, offset), applied) in self.layout.iter().zip(&mut self.applied) {
            if let Some(body) = self.bodies.get(key) {
                body.serialize_state(&mut self.state, offset)?;
                *applied = (body.force(), body.torque());
            }
        }

        // Phase 2 & 3: Evaluate and integrate
        let mut dynamics = WorldDynamics {
            bodies: &mut self.bodies,
            layout: &self.layout,
            applied: &self.applied,
            gravity: self.config.gravity,
            forces,
        };
        dynamics.derivative(&mut self.derivative, &self.state)?;
        self.integrator
            .integrate(&mut self.next, &self.state, &self.derivative, dt, &mut dynamics)?;
        std::mem::swap(&mut self.state, &mut self.next);

        // Phase 4: Unpack
        for &(key, offset) in &self.layout {
            if let Some(body) = self.bodies.get_mut(key) {
                body.deserialize_state(&self.state, offset)?;
                body.orientation = body.orientation.normalize();
                body.serialize_state(&mut self.state, offset)?;
                body.clear_forces();
            }
        }

        self.time += dt as f64;
        log::trace!("Stepped {} bodies by {}s", self.bodies.len(), dt);
        Ok(())
    }

    /// Assign consecutive offsets and resize every buffer to match
    fn rebuild_layout(&mut self) {
        self.layout.clear();
        let mut offset = 0;
        for (key, body) in &self.bodies {
            self.layout.push((key, offset));
            offset += body.state_size();
        }

        self.state.resize(offset, 0.0);
        self.derivative.resize(offset, 0.0);
        self.next.resize(offset, 0.0);
        self.applied.resize(self.layout.len(), (Vec3::ZERO, Vec3::ZERO));
        self.integrator.resize(offset);

        for &(key, offset) in &self.layout {
            if let Some(body) = self.bodies.get(key) {
                let packed = body.serialize_state(&mut self.state, offset);
                debug_assert!(packed.is_ok(), "layout offset {} does not fit its body", offset);
            }
        }
        log::debug!("State layout rebuilt: {} bodies, {} floats", self.layout.len(), offset);
    }
}

/// Derivative evaluation over the world's bodies
struct WorldDynamics<'a> {
    bodies: &'a mut SlotMap<BodyKey, RigidBody>,
    layout: &'a [(BodyKey, usize)],
    applied: &'a [(Vec3, Vec3)],
    gravity: f32,
    forces: &'a mut dyn ForceModel,
}

impl Dynamics for WorldDynamics<'_> {
    fn derivative(&mut self, out: &mut [f32], state: &[f32]) -> Result<(), StateError> {
        for (&(key, offset), &(force, torque)) in self.layout.iter().zip(self.applied) {
            let Some(body) = self.bodies.get_mut(key) else {
                continue;
            };
            body.deserialize_state(state, offset)?;
            body.clear_forces();
            body.apply_force(force);
            body.apply_torque(torque);
            if body.affected_by_gravity {
                let weight = Vec3::new(0.0, self.gravity * body.mass(), 0.0);
                body.apply_force(weight);
            }
            self.forces.apply(key, body);
            body.serialize_state_derivative(out, offset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RIGID_BODY_STATE_SIZE;
    use swell_math::Quat;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_world_creation() {
        let world = PhysicsWorld::new();
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.config().gravity, -9.81);
        assert!(world.state().is_empty());
    }

    #[test]
    fn test_add_remove_updates_layout() {
        let mut world = PhysicsWorld::new();
        let a = world.add_body(RigidBody::new_sphere(1.0, 1.0));
        let b = world.add_body(RigidBody::new_sphere(1.0, 1.0));
        assert_eq!(world.state().len(), 2 * RIGID_BODY_STATE_SIZE);
        assert_ne!(world.state_offset(a), world.state_offset(b));

        assert!(world.remove_body(a).is_some());
        assert_eq!(world.state().len(), RIGID_BODY_STATE_SIZE);
        assert_eq!(world.state_offset(b), Some(0));
        assert_eq!(world.state_offset(a), None);
        assert!(world.get_body(a).is_none());
    }

    #[test]
    fn test_gravity_euler_step() {
        let mut world = PhysicsWorld::with_config(PhysicsConfig::new(-10.0));
        let key = world.add_body(RigidBody::new_sphere(0.5, 2.0));

        world.step(0.1, &mut NoForces).unwrap();

        let body = world.get_body(key).unwrap();
        // Momentum gains m·g·dt; position still uses the initial velocity
        assert!((body.velocity().y + 1.0).abs() < EPSILON);
        assert_eq!(body.position, Vec3::ZERO);
        assert!((world.time() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_bodies_without_gravity_stay_put() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(RigidBody::new_sphere(0.5, 1.0).with_gravity(false));
        for _ in 0..10 {
            world.step(0.05, &mut NoForces).unwrap();
        }
        assert_eq!(world.get_body(key).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn test_rejects_invalid_dt() {
        let mut world = PhysicsWorld::new();
        world.add_body(RigidBody::new_sphere(0.5, 1.0));
        assert_eq!(world.step(0.0, &mut NoForces), Err(StateError::InvalidTimeStep(0.0)));
        assert!(world.step(f32::NAN, &mut NoForces).is_err());
    }

    #[test]
    fn test_closure_force_model() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(RigidBody::new_sphere(0.5, 1.0).with_gravity(false));

        let mut push = |_key: BodyKey, body: &mut RigidBody| body.apply_force(Vec3::X * 4.0);
        world.step(0.5, &mut push).unwrap();

        let body = world.get_body(key).unwrap();
        assert!((body.velocity().x - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_forces_applied_before_step_act_for_one_step() {
        let mut world = PhysicsWorld::with_config(
            PhysicsConfig::new(0.0).with_integrator(IntegratorKind::Rk4),
        );
        let key = world.add_body(RigidBody::new_sphere(1.0, 2.0));

        let body = world.get_body_mut(key).unwrap();
        body.apply_force(Vec3::X * 4.0);
        body.apply_torque(Vec3::Y * 0.8);
        world.step(0.5, &mut NoForces).unwrap();

        let body = world.get_body(key).unwrap();
        assert!((body.velocity().x - 1.0).abs() < EPSILON);
        assert!((body.angular_momentum.y - 0.4).abs() < EPSILON);
        assert_eq!(body.force(), Vec3::ZERO);

        // Cleared after use
        world.step(0.5, &mut NoForces).unwrap();
        let body = world.get_body(key).unwrap();
        assert!((body.velocity().x - 1.0).abs() < EPSILON);
        assert!((body.angular_momentum.y - 0.4).abs() < EPSILON);
    }

    #[test]
    fn test_orientation_stays_normalized() {
        let mut world = PhysicsWorld::with_config(
            PhysicsConfig::new(0.0).with_integrator(IntegratorKind::Euler),
        );
        let key = world.add_body(
            RigidBody::new_box(Vec3::new(1.0, 0.5, 2.0), 3.0)
                .with_angular_momentum(Vec3::new(0.3, 1.0, -0.2)),
        );
        for _ in 0..200 {
            world.step(0.02, &mut NoForces).unwrap();
        }
        let body = world.get_body(key).unwrap();
        assert!((body.orientation.magnitude() - 1.0).abs() < EPSILON);
        assert_ne!(body.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_set_integrator() {
        let mut world = PhysicsWorld::new();
        world.add_body(RigidBody::new_sphere(0.5, 1.0));
        world.set_integrator(IntegratorKind::Rk4);
        assert_eq!(world.config().integrator, IntegratorKind::Rk4);
        world.step(0.1, &mut NoForces).unwrap();
    }
}
