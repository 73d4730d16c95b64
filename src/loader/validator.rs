use serde_json::Value;

use crate::error::ConfigError;

/// Keys that must be present in the `settings` section.
pub const REQUIRED_SETTINGS: [&str; 5] = ["simulation_time", "num_clients", "limit_closest_base_stations", "statistics_params", "plotting_params"];

/// Top-level sections besides `settings`.
pub const REQUIRED_SECTIONS: [&str; 4] = ["slices", "clients", "base_stations", "mobility_patterns"];

/// Checks the presence of all required keys before the document is deserialized,
/// so that a missing key is reported by name.
pub fn validate_structure(document: &Value) -> Result<(), ConfigError> {
    let settings = document.get("settings").ok_or_else(|| ConfigError::MissingSection("settings".to_string()))?;

    for key in REQUIRED_SETTINGS {
        if settings.get(key).is_none() {
            return Err(ConfigError::MissingSetting(key.to_string()));
        }
    }

    for section in REQUIRED_SECTIONS {
        if document.get(section).is_none() {
            return Err(ConfigError::MissingSection(section.to_string()));
        }
    }

    Ok(())
}
