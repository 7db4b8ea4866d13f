//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use swell::config::AppConfig;
use swell_physics::{IntegratorKind, MassDistribution};
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("SWELL_OCEAN__WIND_SPEED", "17.5");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.ocean.wind_speed, 17.5);
    std::env::remove_var("SWELL_OCEAN__WIND_SPEED");
}

#[test]
#[serial]
fn test_env_selects_integrator() {
    std::env::set_var("SWELL_PHYSICS__INTEGRATOR", "euler");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.physics.integrator, IntegratorKind::Euler);
    std::env::remove_var("SWELL_PHYSICS__INTEGRATOR");
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("SWELL_OCEAN__WIND_SPEED");
    std::env::remove_var("SWELL_PHYSICS__INTEGRATOR");

    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let config = AppConfig::load().unwrap();
    assert_eq!(config.ocean.grid_size, 64);
    assert_eq!(config.debug.log_interval, 30);
    assert_eq!(config.bodies.len(), 3);
    assert!(matches!(config.bodies[1].shape, MassDistribution::Sphere { .. }));
}

#[test]
#[serial]
fn test_missing_directory_falls_back_to_defaults() {
    let config = AppConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.physics.gravity, -9.81);
    assert!(config.bodies.is_empty());
}

#[test]
#[serial]
fn test_bad_value_is_an_error() {
    std::env::set_var("SWELL_SIMULATION__FRAMES", "lots");
    let result = AppConfig::load();
    std::env::remove_var("SWELL_SIMULATION__FRAMES");

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
#[serial]
fn test_roundtrip_through_toml() {
    let mut config = AppConfig::load_from("config").unwrap_or_default();
    config.ocean.seed = 7;
    let text = toml::to_string(&config).unwrap();
    let back: AppConfig = toml::from_str(&text).unwrap();
    assert_eq!(back.ocean.seed, 7);
    assert_eq!(back.bodies, config.bodies);
}
