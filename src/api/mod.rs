pub mod config_dto;
