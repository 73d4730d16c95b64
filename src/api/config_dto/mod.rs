pub mod base_station_dto;
pub mod client_dto;
pub mod distribution_dto;
pub mod mobility_dto;
pub mod settings_dto;
pub mod simulation_dto;
pub mod slice_dto;
