//! Application systems
//!
//! Simulation systems kept out of main.rs so they can be driven from tests.

mod simulation;

pub use simulation::{
    equivalent_radius, submerged_volume, BuoyancyModel, BuoyancyParams, OceanSimulation,
    SimulationError,
};
