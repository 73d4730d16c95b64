use serde::{Deserialize, Serialize};

use crate::api::config_dto::distribution_dto::DistributionDto;

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct SliceDto {
    pub delay_tolerance: f64,
    pub qos_class: u32,
    pub bandwidth_guaranteed: f64,
    pub bandwidth_max: f64,
    pub client_weight: f64,
    #[serde(default)]
    pub threshold: f64,
    pub usage_pattern: DistributionDto,
}
