use slotmap::new_key_type;
use std::fmt;

use crate::domain::ran_model::config::{BaseStationSpec, RATIO_TOLERANCE, SliceSpec};
use crate::domain::ran_model::geometry::{Coverage, Point};
use crate::domain::ran_model::slice::Slice;
use crate::domain::ran_model::utils::format::format_bps;
use crate::error::{ConfigError, Result};

new_key_type! { pub struct BaseStationKey; }

/// A radio cell: circular coverage plus a fixed set of slices that partition
/// its bandwidth. The topology never changes after construction.
#[derive(Debug, Clone)]
pub struct BaseStation {
    pub pk: usize,
    pub coverage: Coverage,
    pub capacity_bandwidth: f64,

    /// Indexed like the configured slice list.
    pub slices: Vec<Slice>,
}

impl BaseStation {
    pub fn new(spec: &BaseStationSpec, slice_specs: &[SliceSpec]) -> Result<Self> {
        if spec.ratios.len() != slice_specs.len() {
            let missing = slice_specs.get(spec.ratios.len()).map(|s| s.name.to_string()).unwrap_or_default();
            return Err(ConfigError::MissingSliceRatio { base_station: spec.pk, slice: missing }.into());
        }

        let ratio_sum: f64 = spec.ratios.iter().sum();
        if ratio_sum > 1.0 + RATIO_TOLERANCE {
            return Err(ConfigError::SliceRatiosExceedCapacity { base_station: spec.pk, sum: ratio_sum }.into());
        }

        let slices = slice_specs.iter().zip(&spec.ratios).map(|(slice_spec, ratio)| Slice::new(slice_spec, *ratio, spec.capacity_bandwidth)).collect();

        let base_station = BaseStation {
            pk: spec.pk,
            coverage: Coverage::new(spec.center, spec.coverage_radius),
            capacity_bandwidth: spec.capacity_bandwidth,
            slices,
        };

        log::info!("{}", base_station);
        for slice in &base_station.slices {
            log::debug!("  BS_{} slice {}", base_station.pk, slice);
        }

        Ok(base_station)
    }

    pub fn covers(&self, point: Point) -> bool {
        self.coverage.contains(point)
    }

    pub fn distance_to(&self, point: Point) -> f64 {
        self.coverage.distance_to(point)
    }

    pub fn slice(&self, index: usize) -> Option<&Slice> {
        self.slices.get(index)
    }

    pub fn slice_mut(&mut self, index: usize) -> Option<&mut Slice> {
        self.slices.get_mut(index)
    }

    /// Sum of the initial capacities of all slices.
    pub fn total_slice_capacity(&self) -> f64 {
        self.slices.iter().map(|s| s.init_capacity).sum()
    }

    pub fn used_bandwidth(&self) -> f64 {
        self.slices.iter().map(|s| s.used_bandwidth()).sum()
    }
}

impl fmt::Display for BaseStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BS_{:<2}\t cov:{}\t with cap {:<10}", self.pk, self.coverage, format_bps(self.capacity_bandwidth))
    }
}
