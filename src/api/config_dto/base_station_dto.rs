use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct BaseStationDto {
    pub x: f64,
    pub y: f64,
    /// Coverage radius around (x, y).
    pub coverage: f64,
    pub capacity_bandwidth: f64,
    /// Share of `capacity_bandwidth` per slice name.
    pub ratios: IndexMap<String, f64>,
}
