//! Swell - rigid bodies floating on a spectral ocean
//!
//! Wires the `swell_spectral` height field and the `swell_physics` world
//! together behind a layered configuration.

pub mod config;
pub mod systems;

pub use config::{AppConfig, ConfigError};
pub use systems::{OceanSimulation, SimulationError};
