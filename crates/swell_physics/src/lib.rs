//! Rigid-body physics for Swell
//!
//! This crate advances rigid bodies stored in one shared flat state buffer:
//! - Inertia tensors for canonical shapes (box, sphere, cylinder)
//! - The serialize/deserialize contract for per-body state segments
//! - Explicit Euler and RK4 integrators
//! - A physics world that owns the buffer and drives force models

pub mod body;
pub mod error;
pub mod integrator;
pub mod mass;
pub mod state;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, RigidBody, RIGID_BODY_STATE_SIZE};
pub use error::StateError;
pub use integrator::{euler, euler_in_place, Dynamics, Integrator, IntegratorKind, Rk4};
pub use mass::{inertia_tensor, MassDistribution};
pub use state::PhysicalState;
pub use world::{ForceModel, NoForces, PhysicsConfig, PhysicsWorld};
