pub mod measurement_area;
pub mod stats_collector;
pub mod stats_series;
