use slotmap::SlotMap;

use crate::domain::ran_model::base_station::{BaseStation, BaseStationKey};
use crate::domain::ran_model::client::client::{Client, ClientKey};
use crate::domain::ran_model::geometry::Point;
use crate::domain::ran_model::stats::measurement_area::MeasurementArea;
use crate::domain::ran_model::stats::stats_series::{StatsRow, StatsSeries};
use crate::domain::simulator::sim_time::SimTime;

/// Counters of the currently open window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowCounters {
    pub connect_attempts: u64,
    pub blocks: u64,
    pub handovers: u64,
}

/// Periodic aggregator of the simulation state.
///
/// Event counters are only increased for clients inside the measurement area.
#[derive(Debug, Clone)]
pub struct StatsCollector {
    area: MeasurementArea,
    offset: f64,
    interval: f64,
    window: WindowCounters,
    series: StatsSeries,
}

impl StatsCollector {
    pub const INTERVAL: f64 = 1.0;

    pub fn new(area: MeasurementArea, offset: f64) -> Self {
        StatsCollector { area, offset, interval: Self::INTERVAL, window: WindowCounters::default(), series: StatsSeries::default() }
    }

    pub fn area(&self) -> MeasurementArea {
        self.area
    }

    pub fn first_wakeup(&self) -> SimTime {
        SimTime::new(self.offset)
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn window(&self) -> WindowCounters {
        self.window
    }

    pub fn series(&self) -> &StatsSeries {
        &self.series
    }

    pub fn into_series(self) -> StatsSeries {
        self.series
    }

    pub fn record_connect_attempt(&mut self, position: Point) {
        if self.area.contains(position) {
            self.window.connect_attempts += 1;
        }
    }

    pub fn record_block(&mut self, position: Point) {
        if self.area.contains(position) {
            self.window.blocks += 1;
        }
    }

    pub fn record_handover(&mut self, position: Point) {
        if self.area.contains(position) {
            self.window.handovers += 1;
        }
    }

    /// Closes the open window, appends one snapshot to every series and opens a new window.
    pub fn collect(&mut self, now: SimTime, clients: &SlotMap<ClientKey, Client>, base_stations: &SlotMap<BaseStationKey, BaseStation>) {
        let window = std::mem::take(&mut self.window);
        let per_attempt = |count: u64| if window.connect_attempts == 0 { 0.0 } else { count as f64 / window.connect_attempts as f64 };

        let mut in_area = 0usize;
        let mut connected = 0usize;
        let mut covered = 0usize;
        for client in clients.values().filter(|c| self.area.contains(c.position)) {
            in_area += 1;
            if client.connected {
                connected += 1;
            }
            if client.base_station.and_then(|key| base_stations.get(key)).is_some_and(|bs| bs.covers(client.position)) {
                covered += 1;
            }
        }

        let mut used = 0.0;
        let mut capacity = 0.0;
        let mut users = 0u64;
        let mut slices = 0usize;
        for slice in base_stations.values().flat_map(|bs| bs.slices.iter()) {
            used += slice.used_bandwidth();
            capacity += slice.pool.capacity();
            users += slice.connected_users() as u64;
            slices += 1;
        }

        let row = StatsRow {
            window: self.series.len(),
            window_end: now.as_f64(),
            connected_users_ratio: ratio(connected as f64, in_area as f64),
            used_bandwidth: used,
            avg_slice_load_ratio: ratio(used, capacity),
            avg_slice_client_count: ratio(users as f64, slices as f64),
            coverage_ratio: ratio(covered as f64, in_area as f64),
            block_rate: per_attempt(window.blocks),
            handover_rate: per_attempt(window.handovers),
            connect_attempts: window.connect_attempts,
        };

        log::trace!(
            "Window #{} closed at t={}: connected={:.3} load={:.3} blocks={}/{} handovers={}",
            row.window,
            now,
            row.connected_users_ratio,
            row.avg_slice_load_ratio,
            window.blocks,
            window.connect_attempts,
            window.handovers
        );
        self.series.push(row);
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}
