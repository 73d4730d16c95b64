use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct SettingsDto {
    pub simulation_time: f64,
    pub num_clients: usize,
    /// `null` or `0` means "all base stations".
    pub limit_closest_base_stations: Option<usize>,
    pub statistics_params: StatisticsParamsDto,
    pub plotting_params: PlottingParamsDto,

    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub logging: bool,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub movement_interval: Option<f64>,
    #[serde(default)]
    pub stats_offset: Option<f64>,
    #[serde(default)]
    pub handover: HandoverDto,
    #[serde(default)]
    pub holding: HoldingDto,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct StatisticsParamsDto {
    #[serde(default)]
    pub warmup_ratio: f64,
    #[serde(default)]
    pub cooldown_ratio: f64,
    pub x: RangeDto,
    pub y: RangeDto,
}

#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq)]
pub struct RangeDto {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct PlottingParamsDto {
    pub plotting: bool,
    #[serde(default)]
    pub plot_save: bool,
    #[serde(default)]
    pub plot_show: bool,
    #[serde(default)]
    pub plot_file: Option<String>,
    #[serde(default)]
    pub plot_file_dpi: Option<u32>,
    #[serde(default)]
    pub scatter_size: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct HandoverDto {
    #[serde(default = "default_prefer_nearest")]
    pub prefer_nearest: bool,
}

fn default_prefer_nearest() -> bool {
    true
}

impl Default for HandoverDto {
    fn default() -> Self {
        HandoverDto { prefer_nearest: default_prefer_nearest() }
    }
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct HoldingDto {
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

fn default_time_scale() -> f64 {
    1.0
}

impl Default for HoldingDto {
    fn default() -> Self {
        HoldingDto { time_scale: default_time_scale() }
    }
}
