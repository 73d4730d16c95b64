#![allow(dead_code)]

use serde_json::{Value, json};
use slice_sim::domain::ran_model::config::SimulationConfig;
use slice_sim::domain::ran_model::simulation::Simulation;
use slice_sim::loader::parse_simulation_config;

/// One base station of radius 10 at the origin with a single slice of
/// capacity 100 (guaranteed 10, max 100) and one static client at (3, 4).
/// Usage ticks are far beyond the horizon unless a test changes them.
pub fn base_document() -> Value {
    json!({
        "settings": {
            "simulation_time": 10,
            "num_clients": 1,
            "limit_closest_base_stations": null,
            "seed": 1,
            "statistics_params": {
                "x": { "min": -100, "max": 100 },
                "y": { "min": -100, "max": 100 }
            },
            "plotting_params": { "plotting": false }
        },
        "slices": {
            "s": {
                "delay_tolerance": 10,
                "qos_class": 1,
                "bandwidth_guaranteed": 10,
                "bandwidth_max": 100,
                "client_weight": 1.0,
                "usage_pattern": { "distribution": "constant", "params": [50] }
            }
        },
        "mobility_patterns": {
            "fixed": { "distribution": "constant", "params": [0], "client_weight": 1.0 }
        },
        "base_stations": [
            { "x": 0, "y": 0, "coverage": 10, "capacity_bandwidth": 100, "ratios": { "s": 1.0 } }
        ],
        "clients": {
            "location": {
                "x": { "distribution": "constant", "params": [3] },
                "y": { "distribution": "constant", "params": [4] }
            },
            "usage_frequency": { "distribution": "constant", "params": [1000] }
        }
    })
}

/// A larger randomized document for whole-run properties.
pub fn random_document() -> Value {
    json!({
        "settings": {
            "simulation_time": 40,
            "num_clients": 60,
            "limit_closest_base_stations": 2,
            "statistics_params": {
                "warmup_ratio": 0.1,
                "cooldown_ratio": 0.1,
                "x": { "min": 0, "max": 200 },
                "y": { "min": 0, "max": 200 }
            },
            "plotting_params": { "plotting": false }
        },
        "slices": {
            "embb": {
                "delay_tolerance": 10, "qos_class": 2, "bandwidth_guaranteed": 2, "bandwidth_max": 40, "client_weight": 0.6,
                "usage_pattern": { "distribution": "randint", "params": [5, 120] }
            },
            "urllc": {
                "delay_tolerance": 1, "qos_class": 1, "bandwidth_guaranteed": 10, "bandwidth_max": 20, "client_weight": 0.4,
                "usage_pattern": { "distribution": "uniform", "params": [1, 30] }
            }
        },
        "mobility_patterns": {
            "walking": { "distribution": "randint", "params": [-3, 3], "client_weight": 0.5 },
            "car": { "distribution": "normal", "params": [0, 12], "client_weight": 0.3 },
            "still": { "distribution": "constant", "params": [0], "client_weight": 0.2 }
        },
        "base_stations": [
            { "x": 50, "y": 50, "coverage": 70, "capacity_bandwidth": 300, "ratios": { "embb": 0.7, "urllc": 0.3 } },
            { "x": 150, "y": 50, "coverage": 70, "capacity_bandwidth": 200, "ratios": { "embb": 0.5, "urllc": 0.5 } },
            { "x": 100, "y": 150, "coverage": 80, "capacity_bandwidth": 250, "ratios": { "embb": 0.6, "urllc": 0.4 } }
        ],
        "clients": {
            "location": {
                "x": { "distribution": "randint", "params": [0, 200] },
                "y": { "distribution": "randint", "params": [0, 200] }
            },
            "usage_frequency": { "distribution": "randint", "params": [0, 300], "divide_scale": 100 }
        }
    })
}

pub fn config(document: &Value) -> SimulationConfig {
    parse_simulation_config(&document.to_string()).expect("valid test configuration")
}

pub fn simulation(document: &Value) -> Simulation {
    Simulation::new(&config(document), 7).expect("simulation set up")
}
