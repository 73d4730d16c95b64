use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::config_dto::{
    base_station_dto::BaseStationDto, client_dto::ClientsDto, mobility_dto::MobilityPatternDto, settings_dto::SettingsDto, slice_dto::SliceDto,
};

/// Root of the simulation configuration document.
///
/// Named sections are kept in document order: the position of a slice in
/// `slices` is its index inside every base station.
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct SimulationConfigDto {
    pub settings: SettingsDto,
    pub slices: IndexMap<String, SliceDto>,
    pub mobility_patterns: IndexMap<String, MobilityPatternDto>,
    pub base_stations: Vec<BaseStationDto>,
    pub clients: ClientsDto,
}
