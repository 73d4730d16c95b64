pub mod bandwidth_pool;
pub mod base_station;
pub mod client;
pub mod config;
pub mod geometry;
pub mod policy;
pub mod report;
pub mod simulation;
pub mod slice;
pub mod spatial_index;
pub mod stats;
pub mod utils;
pub mod world;
