use serde::{Deserialize, Serialize};

use crate::api::config_dto::distribution_dto::DistributionDto;

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct MobilityPatternDto {
    #[serde(flatten)]
    pub movement: DistributionDto,
    pub client_weight: f64,
}
