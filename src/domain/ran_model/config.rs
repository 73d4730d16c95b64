use std::path::PathBuf;

use crate::api::config_dto::base_station_dto::BaseStationDto;
use crate::api::config_dto::settings_dto::PlottingParamsDto;
use crate::api::config_dto::simulation_dto::SimulationConfigDto;
use crate::domain::ran_model::geometry::Point;
use crate::domain::ran_model::policy::{HandoverPolicy, HoldingPolicy, SimulationPolicy};
use crate::domain::ran_model::stats::measurement_area::MeasurementArea;
use crate::domain::ran_model::utils::distribution::DistributionSampler;
use crate::domain::ran_model::utils::id::{MobilityPatternName, SliceName};
use crate::error::ConfigError;

/// Allowed deviation of a weight table from a total of 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Slack for rounding when summing the slice ratios of a base station.
pub const RATIO_TOLERANCE: f64 = 1e-9;

pub const DEFAULT_STATS_OFFSET: f64 = 0.5;
pub const DEFAULT_LOG_FILE: &str = "slice_sim.log";

/// Static description of a slice, shared by all base stations.
#[derive(Debug, Clone)]
pub struct SliceSpec {
    pub name: SliceName,
    pub client_weight: f64,
    pub delay_tolerance: f64,
    pub qos_class: u32,
    pub bandwidth_guaranteed: f64,
    pub bandwidth_max: f64,
    pub threshold: f64,
    pub usage_pattern: DistributionSampler,
}

#[derive(Debug, Clone)]
pub struct MobilityPattern {
    pub name: MobilityPatternName,
    pub client_weight: f64,
    pub movement: DistributionSampler,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaseStationSpec {
    pub pk: usize,
    pub center: Point,
    pub coverage_radius: f64,
    pub capacity_bandwidth: f64,
    /// One ratio per slice, in slice order.
    pub ratios: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlottingParams {
    pub plotting: bool,
    pub plot_save: bool,
    pub plot_show: bool,
    pub plot_file: Option<PathBuf>,
}

/// Fully validated simulation configuration.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub simulation_time: f64,
    pub num_clients: usize,
    pub limit_closest_base_stations: Option<usize>,
    pub measurement_area: MeasurementArea,
    pub warmup_ratio: f64,
    pub cooldown_ratio: f64,
    pub stats_offset: f64,
    pub plotting: PlottingParams,
    pub seed: Option<u64>,
    /// Set only when file logging is enabled.
    pub log_file: Option<PathBuf>,
    pub policy: SimulationPolicy,
    pub slices: Vec<SliceSpec>,
    pub mobility_patterns: Vec<MobilityPattern>,
    pub base_stations: Vec<BaseStationSpec>,
    pub client_location_x: DistributionSampler,
    pub client_location_y: DistributionSampler,
    pub usage_frequency: DistributionSampler,
}

impl TryFrom<SimulationConfigDto> for SimulationConfig {
    type Error = ConfigError;

    fn try_from(dto: SimulationConfigDto) -> Result<Self, Self::Error> {
        let settings = &dto.settings;

        let simulation_time = positive("settings.simulation_time", settings.simulation_time)?;
        let movement_interval = positive("settings.movement_interval", settings.movement_interval.unwrap_or(SimulationPolicy::DEFAULT_MOVEMENT_INTERVAL))?;
        let time_scale = positive("settings.holding.time_scale", settings.holding.time_scale)?;

        let stats_offset = settings.stats_offset.unwrap_or(DEFAULT_STATS_OFFSET);
        if !stats_offset.is_finite() || stats_offset < 0.0 {
            return Err(invalid("settings.stats_offset", format!("must be a non-negative number, got {}", stats_offset)));
        }

        let statistics = &settings.statistics_params;
        for (key, range) in [("settings.statistics_params.x", statistics.x), ("settings.statistics_params.y", statistics.y)] {
            if !(range.min <= range.max) {
                return Err(invalid(key, format!("min ({}) must not exceed max ({})", range.min, range.max)));
            }
        }
        for (key, ratio) in [("settings.statistics_params.warmup_ratio", statistics.warmup_ratio), ("settings.statistics_params.cooldown_ratio", statistics.cooldown_ratio)] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(invalid(key, format!("must be within [0, 1], got {}", ratio)));
            }
        }

        let slices = dto
            .slices
            .iter()
            .map(|(name, slice)| -> Result<SliceSpec, ConfigError> {
                if !(slice.bandwidth_guaranteed >= 0.0) || !(slice.bandwidth_max >= 0.0) {
                    return Err(invalid(&format!("slices.{}", name), "bandwidth values must be non-negative".to_string()));
                }
                Ok(SliceSpec {
                    name: SliceName::new(name.clone()),
                    client_weight: slice.client_weight,
                    delay_tolerance: slice.delay_tolerance,
                    qos_class: slice.qos_class,
                    bandwidth_guaranteed: slice.bandwidth_guaranteed,
                    bandwidth_max: slice.bandwidth_max,
                    threshold: slice.threshold,
                    usage_pattern: DistributionSampler::from_dto(&slice.usage_pattern)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        check_weights("slices", slices.iter().map(|s| s.client_weight))?;

        let mobility_patterns = dto
            .mobility_patterns
            .iter()
            .map(|(name, pattern)| -> Result<MobilityPattern, ConfigError> {
                Ok(MobilityPattern {
                    name: MobilityPatternName::new(name.clone()),
                    client_weight: pattern.client_weight,
                    movement: DistributionSampler::from_dto(&pattern.movement)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        check_weights("mobility_patterns", mobility_patterns.iter().map(|m| m.client_weight))?;

        let base_stations =
            dto.base_stations.iter().enumerate().map(|(pk, bs)| base_station_spec(pk, bs, &slices)).collect::<Result<Vec<_>, ConfigError>>()?;

        let plotting = plotting_params(&settings.plotting_params);
        let log_file = settings.logging.then(|| PathBuf::from(settings.log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE)));

        Ok(SimulationConfig {
            simulation_time,
            num_clients: settings.num_clients,
            limit_closest_base_stations: settings.limit_closest_base_stations,
            measurement_area: MeasurementArea::new((statistics.x.min, statistics.x.max), (statistics.y.min, statistics.y.max)),
            warmup_ratio: statistics.warmup_ratio,
            cooldown_ratio: statistics.cooldown_ratio,
            stats_offset,
            plotting,
            seed: settings.seed,
            log_file,
            policy: SimulationPolicy {
                movement_interval,
                handover: HandoverPolicy { prefer_nearest: settings.handover.prefer_nearest },
                holding: HoldingPolicy { time_scale },
            },
            slices,
            mobility_patterns,
            base_stations,
            client_location_x: DistributionSampler::from_dto(&dto.clients.location.x)?,
            client_location_y: DistributionSampler::from_dto(&dto.clients.location.y)?,
            usage_frequency: DistributionSampler::from_dto(&dto.clients.usage_frequency)?,
        })
    }
}

fn base_station_spec(pk: usize, dto: &BaseStationDto, slices: &[SliceSpec]) -> Result<BaseStationSpec, ConfigError> {
    if let Some(unknown) = dto.ratios.keys().find(|name| !slices.iter().any(|s| s.name.as_str() == name.as_str())) {
        return Err(ConfigError::UnknownSliceRatio { base_station: pk, slice: unknown.clone() });
    }

    let ratios = slices
        .iter()
        .map(|slice| -> Result<f64, ConfigError> {
            let ratio = *dto
                .ratios
                .get(slice.name.as_str())
                .ok_or_else(|| ConfigError::MissingSliceRatio { base_station: pk, slice: slice.name.to_string() })?;
            if !(ratio >= 0.0) {
                return Err(invalid(&format!("base_stations[{}].ratios.{}", pk, slice.name), format!("must be non-negative, got {}", ratio)));
            }
            Ok(ratio)
        })
        .collect::<Result<Vec<f64>, ConfigError>>()?;

    let sum: f64 = ratios.iter().sum();
    if sum > 1.0 + RATIO_TOLERANCE {
        return Err(ConfigError::SliceRatiosExceedCapacity { base_station: pk, sum });
    }

    if !(dto.coverage >= 0.0) {
        return Err(invalid(&format!("base_stations[{}].coverage", pk), format!("must be non-negative, got {}", dto.coverage)));
    }
    if !(dto.capacity_bandwidth >= 0.0) {
        return Err(invalid(&format!("base_stations[{}].capacity_bandwidth", pk), format!("must be non-negative, got {}", dto.capacity_bandwidth)));
    }

    Ok(BaseStationSpec { pk, center: Point::new(dto.x, dto.y), coverage_radius: dto.coverage, capacity_bandwidth: dto.capacity_bandwidth, ratios })
}

fn plotting_params(dto: &PlottingParamsDto) -> PlottingParams {
    PlottingParams { plotting: dto.plotting, plot_save: dto.plot_save, plot_show: dto.plot_show, plot_file: dto.plot_file.as_ref().map(PathBuf::from) }
}

fn check_weights(section: &str, weights: impl Iterator<Item = f64>) -> Result<(), ConfigError> {
    let mut sum = 0.0;
    for weight in weights {
        if !(weight >= 0.0) {
            return Err(invalid(&format!("{}.client_weight", section), format!("must be non-negative, got {}", weight)));
        }
        sum += weight;
    }

    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ConfigError::InvalidWeights { section: section.to_string(), sum });
    }
    Ok(())
}

fn positive(key: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid(key, format!("must be a positive number, got {}", value)))
    }
}

fn invalid(key: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { key: key.to_string(), reason }
}
