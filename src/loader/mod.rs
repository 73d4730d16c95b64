pub mod parser;
pub mod validator;

use std::path::Path;

use crate::api::config_dto::simulation_dto::SimulationConfigDto;
use crate::domain::ran_model::config::SimulationConfig;
use crate::error::Result;
use crate::loader::parser::read_json_value;
use crate::loader::validator::validate_structure;

/// Loads and validates a simulation configuration file.
pub fn load_simulation_config(path: &Path) -> Result<SimulationConfig> {
    let document = read_json_value(path)?;
    log::debug!("Configuration file '{}' parsed successfully.", path.display());

    config_from_value(document)
}

/// Validates a configuration given as JSON text.
pub fn parse_simulation_config(json: &str) -> Result<SimulationConfig> {
    config_from_value(serde_json::from_str(json)?)
}

fn config_from_value(document: serde_json::Value) -> Result<SimulationConfig> {
    validate_structure(&document)?;

    let dto: SimulationConfigDto = serde_json::from_value(document)?;
    let config = SimulationConfig::try_from(dto)?;
    log::debug!("Configuration validated: {} slice(s), {} base station(s).", config.slices.len(), config.base_stations.len());

    Ok(config)
}
