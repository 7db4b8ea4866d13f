//! Swell - Floating Bodies on a Spectral Ocean
//!
//! Headless runner: loads the configuration, simulates the configured bodies
//! for a fixed number of frames and logs where they are.

use swell::config::AppConfig;
use swell::systems::OceanSimulation;

fn main() {
    // Logging comes up before the config is known, so report load failures afterwards
    let loaded = AppConfig::load();
    let level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::info!("Starting Swell");

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &AppConfig) -> Result<(), swell::SimulationError> {
    let mut sim = OceanSimulation::from_config(config)?;
    let keys: Vec<_> = sim.world().body_keys().collect();
    let interval = config.debug.log_interval;

    for frame in 1..=config.simulation.frames {
        sim.update(config.simulation.frame_dt)?;

        if interval > 0 && frame % interval == 0 {
            log::info!("t = {:.2}s", sim.time());
            for (i, &key) in keys.iter().enumerate() {
                if let (Some(body), Some(freeboard)) = (sim.body(key), sim.freeboard(key)) {
                    let p = body.position;
                    log::info!(
                        "  body {}: position ({:.2}, {:.2}, {:.2}), freeboard {:.2}m, speed {:.2}m/s",
                        i,
                        p.x,
                        p.y,
                        p.z,
                        freeboard,
                        body.velocity().length()
                    );
                }
            }
        }
    }

    log::info!("Finished after {:.2}s of simulated time", sim.time());
    Ok(())
}
