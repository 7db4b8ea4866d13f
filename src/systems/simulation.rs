//! Ocean simulation system
//!
//! Couples the wave height field to the physics world:
//! - Fixed-timestep accumulation of frame deltas
//! - Height field re-synthesis at each physics step
//! - Buoyancy, drag and righting forces from the local water surface

use std::f32::consts::PI;

use swell_math::Vec3;
use swell_physics::{BodyKey, ForceModel, PhysicsWorld, RigidBody, StateError};
use swell_spectral::{HeightField, SpectralError};

use crate::config::AppConfig;

/// Parameters of the water-body interaction
#[derive(Clone, Debug, PartialEq)]
pub struct BuoyancyParams {
    /// Water density in kg/m³
    pub water_density: f32,
    /// Gravity magnitude (positive)
    pub gravity: f32,
    /// Linear drag rate (1/s) at full submersion
    pub linear_drag: f32,
    /// Angular drag rate (1/s) at full submersion
    pub angular_drag: f32,
    /// Lever arm (metres) of the torque aligning bodies with the surface normal
    pub righting_arm: f32,
}

impl Default for BuoyancyParams {
    fn default() -> Self {
        Self {
            water_density: 1025.0,
            gravity: 9.81,
            linear_drag: 2.0,
            angular_drag: 2.0,
            righting_arm: 0.1,
        }
    }
}

/// Submerged volume of a sphere of radius `r` whose lowest point is `depth` below the surface
///
/// Spherical cap volume `π·d²·(3r - d)/3`, with `d` clamped to `[0, 2r]`.
pub fn submerged_volume(radius: f32, depth: f32) -> f32 {
    let d = depth.clamp(0.0, 2.0 * radius);
    PI * d * d * (3.0 * radius - d) / 3.0
}

/// Radius of the sphere with the same volume as `body`
pub fn equivalent_radius(body: &RigidBody) -> f32 {
    (3.0 * body.volume() / (4.0 * PI)).cbrt()
}

/// Force model pushing bodies out of the water surface
///
/// Every body is treated as its volume-equivalent sphere for buoyancy. Drag
/// and righting torque scale with the submerged fraction.
pub struct BuoyancyModel<'a> {
    field: &'a HeightField,
    params: &'a BuoyancyParams,
}

impl<'a> BuoyancyModel<'a> {
    pub fn new(field: &'a HeightField, params: &'a BuoyancyParams) -> Self {
        Self { field, params }
    }
}

impl ForceModel for BuoyancyModel<'_> {
    fn apply(&mut self, _key: BodyKey, body: &mut RigidBody) {
        let volume = body.volume();
        if volume <= 0.0 {
            return;
        }
        let radius = equivalent_radius(body);
        let surface = self.field.height_at(body.position.x, body.position.z);
        let depth = surface - (body.position.y - radius);
        let submerged = submerged_volume(radius, depth);
        if submerged <= 0.0 {
            return;
        }
        let fraction = submerged / volume;

        // Archimedes
        let lift = self.params.water_density * self.params.gravity * submerged;
        body.apply_force(Vec3::Y * lift);

        // Drag against still water
        let drag = -self.params.linear_drag * fraction * body.mass();
        body.apply_force(body.velocity() * drag);
        let spin_drag = -self.params.angular_drag * fraction;
        body.apply_torque(body.angular_momentum * spin_drag);

        // Turn the body's up axis towards the surface normal
        let up = body.orientation.rotate(Vec3::Y);
        let normal = self.field.normal_at(body.position.x, body.position.z);
        body.apply_torque(up.cross(normal) * (lift * self.params.righting_arm));
    }
}

/// Error from the simulation driver
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Height field synthesis failed
    Spectral(SpectralError),
    /// Physics state could not be advanced
    State(StateError),
    /// Timestep or frame delta was not a positive finite number
    InvalidTimeStep(f32),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::Spectral(e) => write!(f, "Ocean synthesis failed: {}", e),
            SimulationError::State(e) => write!(f, "Physics step failed: {}", e),
            SimulationError::InvalidTimeStep(dt) => write!(f, "Invalid time step: {}", dt),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Spectral(e) => Some(e),
            SimulationError::State(e) => Some(e),
            SimulationError::InvalidTimeStep(_) => None,
        }
    }
}

impl From<SpectralError> for SimulationError {
    fn from(e: SpectralError) -> Self {
        SimulationError::Spectral(e)
    }
}

impl From<StateError> for SimulationError {
    fn from(e: StateError) -> Self {
        SimulationError::State(e)
    }
}

/// Bodies floating on a synthesized ocean
pub struct OceanSimulation {
    field: HeightField,
    world: PhysicsWorld,
    buoyancy: BuoyancyParams,
    fixed_timestep: f32,
    max_frame_dt: f32,
    accumulator: f32,
    time: f64,
}

impl OceanSimulation {
    /// Create a simulation stepping at 60 Hz
    pub fn new(field: HeightField, world: PhysicsWorld, buoyancy: BuoyancyParams) -> Self {
        Self {
            field,
            world,
            buoyancy,
            fixed_timestep: 1.0 / 60.0,
            max_frame_dt: 0.25,
            accumulator: 0.0,
            time: 0.0,
        }
    }

    /// Build the ocean, the physics world and its bodies from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, SimulationError> {
        let physics = &config.physics;
        let field = HeightField::new(config.ocean.to_spectrum_params(physics.gravity))?;
        let world = PhysicsWorld::with_config(physics.to_physics_config());
        let buoyancy = BuoyancyParams {
            water_density: physics.water_density,
            gravity: physics.gravity.abs(),
            linear_drag: physics.linear_drag,
            angular_drag: physics.angular_drag,
            righting_arm: physics.righting_arm,
        };

        let mut sim = Self::new(field, world, buoyancy)
            .with_timestep(config.simulation.fixed_timestep, config.simulation.max_frame_dt)?;
        for body in &config.bodies {
            sim.add_body(body.to_body());
        }
        log::info!(
            "Ocean simulation ready: {}x{} grid over {}m, {} bodies",
            sim.field.grid_size(),
            sim.field.grid_size(),
            sim.field.patch_length(),
            sim.world.body_count()
        );
        Ok(sim)
    }

    /// Set the physics step and the frame delta cap
    pub fn with_timestep(mut self, fixed_timestep: f32, max_frame_dt: f32) -> Result<Self, SimulationError> {
        check_time_step(fixed_timestep)?;
        check_time_step(max_frame_dt)?;
        self.fixed_timestep = fixed_timestep;
        self.max_frame_dt = max_frame_dt;
        Ok(self)
    }

    /// Add a body to the ocean
    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.world.add_body(body)
    }

    /// Get a body by key
    pub fn body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.world.get_body(key)
    }

    /// The physics world
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Mutable access to the physics world
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// The ocean surface at the last step
    pub fn field(&self) -> &HeightField {
        &self.field
    }

    /// Buoyancy parameters
    pub fn buoyancy(&self) -> &BuoyancyParams {
        &self.buoyancy
    }

    /// Simulated time in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Physics step size
    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    /// Time carried over to the next frame
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }

    /// Advance by one fixed physics step
    pub fn step(&mut self) -> Result<(), SimulationError> {
        self.field.update(self.time)?;
        let mut model = BuoyancyModel::new(&self.field, &self.buoyancy);
        self.world.step(self.fixed_timestep, &mut model)?;
        self.time += f64::from(self.fixed_timestep);
        Ok(())
    }

    /// Consume a frame delta, running as many fixed steps as fit
    ///
    /// Returns the number of physics steps taken. The leftover time carries
    /// over to the next call.
    pub fn update(&mut self, frame_dt: f32) -> Result<u32, SimulationError> {
        if !(frame_dt.is_finite() && frame_dt >= 0.0) {
            return Err(SimulationError::InvalidTimeStep(frame_dt));
        }
        // Cap dt to prevent spiral of death after a stall
        let dt = if frame_dt > self.max_frame_dt {
            log::warn!("Frame delta {:.3}s clamped to {:.3}s", frame_dt, self.max_frame_dt);
            self.max_frame_dt
        } else {
            frame_dt
        };

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep {
            self.step()?;
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }
        Ok(steps)
    }

    /// Height of the body's centre above the water directly beneath it
    pub fn freeboard(&self, key: BodyKey) -> Option<f32> {
        let body = self.world.get_body(key)?;
        Some(body.position.y - self.field.height_at(body.position.x, body.position.z))
    }
}

fn check_time_step(dt: f32) -> Result<(), SimulationError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidTimeStep(dt))
    }
}
