use serde::Serialize;

/// One value per closed statistics window. All series have equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSeries {
    /// Simulation time at which each window was closed.
    pub window_end: Vec<f64>,
    pub connected_users_ratio: Vec<f64>,
    pub used_bandwidth: Vec<f64>,
    pub avg_slice_load_ratio: Vec<f64>,
    pub avg_slice_client_count: Vec<f64>,
    pub coverage_ratio: Vec<f64>,
    pub block_rate: Vec<f64>,
    pub handover_rate: Vec<f64>,
    pub connect_attempts: Vec<u64>,
}

/// A single window in flat form, used for CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsRow {
    pub window: usize,
    pub window_end: f64,
    pub connected_users_ratio: f64,
    pub used_bandwidth: f64,
    pub avg_slice_load_ratio: f64,
    pub avg_slice_client_count: f64,
    pub coverage_ratio: f64,
    pub block_rate: f64,
    pub handover_rate: f64,
    pub connect_attempts: u64,
}

/// Averages of every series over the steady-state part of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SteadyStateSummary {
    pub first_window: usize,
    pub windows: usize,
    pub connected_users_ratio: f64,
    pub used_bandwidth: f64,
    pub avg_slice_load_ratio: f64,
    pub avg_slice_client_count: f64,
    pub coverage_ratio: f64,
    pub block_rate: f64,
    pub handover_rate: f64,
}

impl StatsSeries {
    pub fn len(&self) -> usize {
        self.window_end.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window_end.is_empty()
    }

    pub fn push(&mut self, row: StatsRow) {
        self.window_end.push(row.window_end);
        self.connected_users_ratio.push(row.connected_users_ratio);
        self.used_bandwidth.push(row.used_bandwidth);
        self.avg_slice_load_ratio.push(row.avg_slice_load_ratio);
        self.avg_slice_client_count.push(row.avg_slice_client_count);
        self.coverage_ratio.push(row.coverage_ratio);
        self.block_rate.push(row.block_rate);
        self.handover_rate.push(row.handover_rate);
        self.connect_attempts.push(row.connect_attempts);
    }

    pub fn row(&self, window: usize) -> Option<StatsRow> {
        if window >= self.len() {
            return None;
        }

        Some(StatsRow {
            window,
            window_end: self.window_end[window],
            connected_users_ratio: self.connected_users_ratio[window],
            used_bandwidth: self.used_bandwidth[window],
            avg_slice_load_ratio: self.avg_slice_load_ratio[window],
            avg_slice_client_count: self.avg_slice_client_count[window],
            coverage_ratio: self.coverage_ratio[window],
            block_rate: self.block_rate[window],
            handover_rate: self.handover_rate[window],
            connect_attempts: self.connect_attempts[window],
        })
    }

    pub fn rows(&self) -> Vec<StatsRow> {
        (0..self.len()).filter_map(|window| self.row(window)).collect()
    }

    /// Averages the windows from `floor(T * warmup)` up to and including
    /// `floor(T * (1 - cooldown))`, where `T` is the simulation time.
    pub fn steady_state(&self, simulation_time: f64, warmup_ratio: f64, cooldown_ratio: f64) -> SteadyStateSummary {
        let first = (simulation_time * warmup_ratio).floor().max(0.0) as usize;
        let end = ((simulation_time * (1.0 - cooldown_ratio)).floor().max(0.0) as usize + 1).min(self.len());

        if first >= end {
            return SteadyStateSummary { first_window: first, ..Default::default() };
        }

        let mean = |values: &[f64]| values[first..end].iter().sum::<f64>() / (end - first) as f64;

        SteadyStateSummary {
            first_window: first,
            windows: end - first,
            connected_users_ratio: mean(&self.connected_users_ratio),
            used_bandwidth: mean(&self.used_bandwidth),
            avg_slice_load_ratio: mean(&self.avg_slice_load_ratio),
            avg_slice_client_count: mean(&self.avg_slice_client_count),
            coverage_ratio: mean(&self.coverage_ratio),
            block_rate: mean(&self.block_rate),
            handover_rate: mean(&self.handover_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(window: usize, value: f64) -> StatsRow {
        StatsRow {
            window,
            window_end: window as f64 + 0.5,
            connected_users_ratio: value,
            used_bandwidth: value * 10.0,
            avg_slice_load_ratio: value,
            avg_slice_client_count: value,
            coverage_ratio: value,
            block_rate: 0.0,
            handover_rate: 0.0,
            connect_attempts: window as u64,
        }
    }

    #[test]
    fn test_rows_round_through_series() {
        let mut series = StatsSeries::default();
        series.push(row(0, 0.25));
        series.push(row(1, 0.5));

        assert_eq!(series.len(), 2);
        assert_eq!(series.rows(), vec![row(0, 0.25), row(1, 0.5)]);
        assert_eq!(series.row(2), None);
    }

    #[test]
    fn test_steady_state_trims_warmup_and_cooldown() {
        let mut series = StatsSeries::default();
        for window in 0..10 {
            series.push(row(window, window as f64));
        }

        // T = 10, warmup 0.2, cooldown 0.25 -> windows 2..=7
        let summary = series.steady_state(10.0, 0.2, 0.25);
        assert_eq!(summary.first_window, 2);
        assert_eq!(summary.windows, 6);
        assert_eq!(summary.connected_users_ratio, 4.5);
        assert_eq!(summary.used_bandwidth, 45.0);
    }

    #[test]
    fn test_steady_state_of_empty_range() {
        let mut series = StatsSeries::default();
        series.push(row(0, 1.0));

        let summary = series.steady_state(10.0, 0.5, 0.0);
        assert_eq!(summary.windows, 0);
        assert_eq!(summary.block_rate, 0.0);
    }
}
