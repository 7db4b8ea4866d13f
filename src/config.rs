//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SWELL_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use swell_math::{Quat, Vec3};
use swell_physics::{IntegratorKind, MassDistribution, PhysicsConfig, RigidBody};
use swell_spectral::SpectrumParams;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ocean surface configuration
    #[serde(default)]
    pub ocean: OceanConfig,
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsSection,
    /// Simulation loop configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
    /// Floating bodies placed at startup
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SWELL_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // SWELL_OCEAN__WIND_SPEED=15 -> ocean.wind_speed = 15.0
        figment = figment.merge(Env::prefixed("SWELL_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Ocean surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OceanConfig {
    /// Samples per side (power of two)
    pub grid_size: usize,
    /// Side length of the periodic tile in metres
    pub patch_length: f64,
    /// Wind speed in metres per second
    pub wind_speed: f64,
    /// Wind direction [x, z]
    pub wind_direction: [f64; 2],
    /// Phillips amplitude constant (0 gives a flat sea)
    pub amplitude: f64,
    /// Waves shorter than this (metres) are suppressed
    pub small_wave_cutoff: f64,
    /// Random phase seed
    pub seed: u64,
}

impl Default for OceanConfig {
    fn default() -> Self {
        let params = SpectrumParams::default();
        Self {
            grid_size: params.grid_size,
            patch_length: params.patch_length,
            wind_speed: params.wind_speed,
            wind_direction: params.wind_direction,
            amplitude: params.amplitude,
            small_wave_cutoff: params.small_wave_cutoff,
            seed: params.seed,
        }
    }
}

impl OceanConfig {
    /// Spectrum parameters for a world with the given gravity (negative = down)
    pub fn to_spectrum_params(&self, gravity: f32) -> SpectrumParams {
        SpectrumParams {
            grid_size: self.grid_size,
            patch_length: self.patch_length,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
            amplitude: self.amplitude,
            gravity: f64::from(gravity.abs()),
            small_wave_cutoff: self.small_wave_cutoff,
            seed: self.seed,
            ..SpectrumParams::default()
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSection {
    /// Gravity (negative = downward)
    pub gravity: f32,
    /// Integration strategy ("euler" or "rk4")
    pub integrator: IntegratorKind,
    /// Water density in kg/m³
    pub water_density: f32,
    /// Linear drag rate (1/s) at full submersion
    pub linear_drag: f32,
    /// Angular drag rate (1/s) at full submersion
    pub angular_drag: f32,
    /// Lever arm (metres) of the torque aligning bodies with the surface normal
    pub righting_arm: f32,
}

impl Default for PhysicsSection {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            integrator: IntegratorKind::Rk4,
            water_density: 1025.0,
            linear_drag: 2.0,
            angular_drag: 2.0,
            righting_arm: 0.1,
        }
    }
}

impl PhysicsSection {
    /// Convert to the physics world's configuration
    pub fn to_physics_config(&self) -> PhysicsConfig {
        PhysicsConfig::new(self.gravity).with_integrator(self.integrator)
    }
}

/// Simulation loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Physics step size in seconds
    pub fixed_timestep: f32,
    /// Frame deltas above this are clamped
    pub max_frame_dt: f32,
    /// Simulated frame delta for the headless runner
    pub frame_dt: f32,
    /// Number of frames the headless runner simulates
    pub frames: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_frame_dt: 0.25,
            frame_dt: 1.0 / 30.0,
            frames: 900,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Frames between body position reports (0 disables them)
    pub log_interval: u32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_interval: 30,
        }
    }
}

/// A body placed in the ocean at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Mass in kilograms
    pub mass: f32,
    /// Starting position [x, y, z]
    pub position: [f32; 3],
    /// Starting rotation about the z axis in degrees
    #[serde(default)]
    pub tilt: f32,
    /// Mass distribution, tagged by `shape`
    #[serde(flatten)]
    pub shape: MassDistribution,
}

impl BodyConfig {
    /// Build the rigid body this entry describes
    pub fn to_body(&self) -> RigidBody {
        let [x, y, z] = self.position;
        RigidBody::new(self.shape, self.mass)
            .with_position(Vec3::new(x, y, z))
            .with_orientation(Quat::from_axis_angle(Vec3::Z, self.tilt.to_radians()))
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
