use serde::Serialize;

/// Smallest delay between two usage ticks of a client.
pub const MIN_USAGE_INTERVAL: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandoverPolicy {
    /// Also hand over when the nearest reachable base station changes, not only
    /// when the current one stops covering the client. On by default.
    pub prefer_nearest: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoldingPolicy {
    /// Multiplier on `amount / rate` when computing how long a hold lasts.
    pub time_scale: f64,
}

/// Tunable client behavior that the configuration may override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationPolicy {
    pub movement_interval: f64,
    pub handover: HandoverPolicy,
    pub holding: HoldingPolicy,
}

impl SimulationPolicy {
    pub const DEFAULT_MOVEMENT_INTERVAL: f64 = 1.0;

    /// Delay until the next usage tick for a raw sampled interval.
    pub fn usage_interval(&self, sampled: f64) -> f64 {
        if sampled.is_nan() {
            return MIN_USAGE_INTERVAL;
        }
        sampled.max(MIN_USAGE_INTERVAL)
    }

    /// # Returns
    /// The duration a hold of `amount` lasts when drawn at `rate`.
    pub fn hold_duration(&self, amount: f64, rate: f64) -> f64 {
        if rate <= 0.0 {
            return 0.0;
        }
        amount / rate * self.holding.time_scale
    }
}

impl Default for SimulationPolicy {
    fn default() -> Self {
        SimulationPolicy {
            movement_interval: Self::DEFAULT_MOVEMENT_INTERVAL,
            handover: HandoverPolicy { prefer_nearest: true },
            holding: HoldingPolicy { time_scale: 1.0 },
        }
    }
}
