use crate::domain::ran_model::config::SimulationConfig;
use crate::domain::ran_model::report::SimulationReport;
use crate::domain::ran_model::simulation::Simulation;
use crate::error::Result;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Runs one simulation of `config`.
///
/// The seed is taken from `seed`, else from the configuration, else drawn at
/// random and logged so the run can be repeated.
pub fn run_simulation(config: &SimulationConfig, seed: Option<u64>) -> Result<SimulationReport> {
    let seed = match seed.or(config.seed) {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            log::info!("No seed configured, using random seed {}.", seed);
            seed
        }
    };

    let simulation = Simulation::new(config, seed)?;
    let report = simulation.run()?;
    log::info!("Simulation finished: {} client(s), {} statistics window(s).", report.clients.len(), report.series.len());

    Ok(report)
}
