use serde::{Deserialize, Serialize};

use crate::api::config_dto::distribution_dto::DistributionDto;

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct ClientsDto {
    pub location: LocationDto,
    pub usage_frequency: DistributionDto,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct LocationDto {
    pub x: DistributionDto,
    pub y: DistributionDto,
}
