use std::fmt;

use crate::domain::ran_model::bandwidth_pool::BandwidthPool;
use crate::domain::ran_model::config::SliceSpec;
use crate::domain::ran_model::utils::distribution::DistributionSampler;
use crate::domain::ran_model::utils::format::format_bps;
use crate::domain::ran_model::utils::id::SliceName;
use crate::error::{Error, Result};

/// A bandwidth partition of one base station with its own admission policy.
#[derive(Debug, Clone)]
pub struct Slice {
    pub name: SliceName,

    /// Share of the parent base station's capacity.
    pub ratio: f64,
    pub qos_class: u32,
    pub delay_tolerance: f64,

    /// Selection weight of the slice among clients.
    pub user_share: f64,
    pub threshold: f64,

    pub bandwidth_guaranteed: f64,
    pub bandwidth_max: f64,
    pub init_capacity: f64,
    pub pool: BandwidthPool,
    pub usage_pattern: DistributionSampler,

    connected_users: u32,
}

impl Slice {
    pub fn new(spec: &SliceSpec, ratio: f64, parent_capacity: f64) -> Self {
        let init_capacity = parent_capacity * ratio;

        Slice {
            name: spec.name.clone(),
            ratio,
            qos_class: spec.qos_class,
            delay_tolerance: spec.delay_tolerance,
            user_share: spec.client_weight,
            threshold: spec.threshold,
            bandwidth_guaranteed: spec.bandwidth_guaranteed,
            bandwidth_max: spec.bandwidth_max,
            init_capacity,
            pool: BandwidthPool::new(init_capacity),
            usage_pattern: spec.usage_pattern.clone(),
            connected_users: 0,
        }
    }

    pub fn connected_users(&self) -> u32 {
        self.connected_users
    }

    /// Bandwidth each connected user may consume at once.
    pub fn consumable_share(&self) -> f64 {
        if self.connected_users == 0 {
            self.init_capacity.min(self.bandwidth_max)
        } else {
            (self.init_capacity / self.connected_users as f64).min(self.bandwidth_max)
        }
    }

    /// Checks whether one more user still gets the guaranteed bandwidth.
    pub fn is_available(&self) -> bool {
        let real_capacity = self.pool.capacity().min(self.bandwidth_max);
        let bandwidth_next = real_capacity / (self.connected_users as f64 + 1.0);

        bandwidth_next >= self.bandwidth_guaranteed
    }

    /// Call admission control: admits a user or rejects it without side effects.
    pub fn connect(&mut self) -> bool {
        if !self.is_available() {
            return false;
        }

        self.connected_users += 1;
        true
    }

    pub fn disconnect(&mut self) {
        if self.connected_users == 0 {
            log::error!("Disconnect on slice '{}' without connected users --> Signals an error in the bookkeeping.", self.name);
            return;
        }

        self.connected_users -= 1;
    }

    /// Draws `amount` from the pool. Failure means the pool is momentarily depleted.
    pub fn request(&mut self, amount: f64) -> bool {
        self.pool.acquire(amount)
    }

    /// Returns `amount` to the pool.
    ///
    /// A failed release means more bandwidth came back than was handed out,
    /// which the simulation cannot recover from.
    pub fn release(&mut self, amount: f64) -> Result<()> {
        if self.pool.release(amount) {
            return Ok(());
        }

        Err(Error::InvariantViolation(format!(
            "release of {} on slice '{}' exceeds its capacity ({})",
            amount, self.name, self.pool
        )))
    }

    pub fn used_bandwidth(&self) -> f64 {
        self.pool.used()
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} init={:<10} cap={:<10} diff={:<10} users={}",
            self.name.as_str(),
            format_bps(self.init_capacity),
            format_bps(self.pool.level()),
            format_bps(self.used_bandwidth()),
            self.connected_users
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ran_model::utils::distribution::DistributionSampler;

    fn spec(guaranteed: f64, max: f64) -> SliceSpec {
        SliceSpec {
            name: SliceName::new("x_eMBB"),
            client_weight: 1.0,
            delay_tolerance: 10.0,
            qos_class: 5,
            bandwidth_guaranteed: guaranteed,
            bandwidth_max: max,
            threshold: 0.0,
            usage_pattern: DistributionSampler::constant(10.0),
        }
    }

    #[test]
    fn test_capacity_is_ratio_of_parent() {
        let slice = Slice::new(&spec(0.0, 100.0), 0.25, 400.0);

        assert_eq!(slice.init_capacity, 100.0);
        assert_eq!(slice.pool.capacity(), 100.0);
        assert_eq!(slice.pool.level(), 100.0);
    }

    #[test]
    fn test_admission_stops_at_guaranteed_bandwidth() {
        let mut slice = Slice::new(&spec(60.0, 100.0), 1.0, 100.0);

        assert!(slice.connect());
        assert!(!slice.connect());
        assert_eq!(slice.connected_users(), 1);
    }

    #[test]
    fn test_admission_uses_bandwidth_max_as_cap() {
        // min(1000, 50) / 5 = 10 >= 10, min(1000, 50) / 6 < 10
        let mut slice = Slice::new(&spec(10.0, 50.0), 1.0, 1000.0);

        for _ in 0..5 {
            assert!(slice.connect());
        }
        assert!(!slice.connect());
        assert_eq!(slice.connected_users(), 5);
    }

    #[test]
    fn test_admitted_population_keeps_guarantee() {
        let mut slice = Slice::new(&spec(7.0, 100.0), 1.0, 100.0);

        while slice.connect() {}

        let per_user = slice.pool.capacity().min(slice.bandwidth_max) / slice.connected_users() as f64;
        assert!(per_user >= slice.bandwidth_guaranteed);
        assert_eq!(slice.connected_users(), 14);
    }

    #[test]
    fn test_disconnect_never_underflows() {
        let mut slice = Slice::new(&spec(0.0, 100.0), 1.0, 100.0);

        assert!(slice.connect());
        slice.disconnect();
        slice.disconnect();
        assert_eq!(slice.connected_users(), 0);
    }

    #[test]
    fn test_consumable_share() {
        let mut slice = Slice::new(&spec(0.0, 30.0), 1.0, 100.0);
        assert_eq!(slice.consumable_share(), 30.0);

        for _ in 0..4 {
            slice.connect();
        }
        assert_eq!(slice.consumable_share(), 25.0);
    }

    #[test]
    fn test_request_and_release() {
        let mut slice = Slice::new(&spec(0.0, 100.0), 1.0, 100.0);

        assert!(slice.request(80.0));
        assert!(!slice.request(30.0));
        assert_eq!(slice.used_bandwidth(), 80.0);

        slice.release(80.0).unwrap();
        assert_eq!(slice.used_bandwidth(), 0.0);
        assert!(matches!(slice.release(1.0), Err(Error::InvariantViolation(_))));
    }
}
