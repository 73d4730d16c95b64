use serde::Serialize;
use slotmap::{SlotMap, new_key_type};
use std::fmt;

use crate::domain::ran_model::base_station::{BaseStation, BaseStationKey};
use crate::domain::ran_model::geometry::Point;
use crate::domain::ran_model::utils::distribution::DistributionSampler;
use crate::domain::ran_model::utils::id::MobilityPatternName;
use crate::domain::simulator::sim_time::SimTime;

new_key_type! { pub struct ClientKey; }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientState {
    Unattached,
    AttachedIdle,
    AttachedConsuming,
}

/// Bandwidth a client currently draws from one slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveHold {
    pub id: u64,
    pub base_station: BaseStationKey,
    /// Rate taken from the slice pool.
    pub bandwidth: f64,
    /// Usage amount this hold delivers when it runs to its end.
    pub usage: f64,
    pub started_at: SimTime,
    pub duration: f64,
}

impl ActiveHold {
    pub fn ends_at(&self) -> SimTime {
        self.started_at.after(self.duration)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClientCounters {
    pub total_connected_time: f64,
    pub total_unconnected_time: f64,
    pub total_request_count: u64,
    pub total_consume_time: f64,
    pub total_usage: f64,
}

#[derive(Debug, Clone)]
pub struct Client {
    pub pk: usize,
    pub position: Point,
    pub movement: DistributionSampler,
    pub usage_frequency: DistributionSampler,
    pub mobility_pattern: MobilityPatternName,

    /// Index of the client's slice inside every base station. Fixed at creation.
    pub slice_index: usize,

    /// Base station the client is attached to, connected or not.
    pub base_station: Option<BaseStationKey>,

    /// Nearest base stations as of the last spatial index run, nearest first.
    pub closest_base_stations: Vec<(f64, BaseStationKey)>,

    pub connected: bool,
    pub hold: Option<ActiveHold>,
    pub counters: ClientCounters,

    pub last_wakeup: SimTime,
    pub movement_ticks: u64,
}

impl Client {
    pub fn new(pk: usize, position: Point, movement: DistributionSampler, usage_frequency: DistributionSampler, mobility_pattern: MobilityPatternName, slice_index: usize) -> Self {
        Client {
            pk,
            position,
            movement,
            usage_frequency,
            mobility_pattern,
            slice_index,
            base_station: None,
            closest_base_stations: Vec::new(),
            connected: false,
            hold: None,
            counters: ClientCounters::default(),
            last_wakeup: SimTime::ZERO,
            movement_ticks: 0,
        }
    }

    pub fn state(&self) -> ClientState {
        match (self.connected, self.hold.is_some()) {
            (false, _) => ClientState::Unattached,
            (true, false) => ClientState::AttachedIdle,
            (true, true) => ClientState::AttachedConsuming,
        }
    }

    /// Books the time since the previous wake-up as connected or unconnected time.
    pub fn account_time(&mut self, now: SimTime) {
        let elapsed = now.since(self.last_wakeup);
        if elapsed > 0.0 {
            if self.connected {
                self.counters.total_connected_time += elapsed;
            } else {
                self.counters.total_unconnected_time += elapsed;
            }
        }
        self.last_wakeup = self.last_wakeup.max(now);
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.position = self.position.translated(dx, dy);
    }

    /// Re-ranks the recorded nearest base stations by the current position.
    ///
    /// # Returns
    /// The nearest one whose coverage contains the client, skipping `exclude`.
    pub fn find_reachable(&mut self, base_stations: &SlotMap<BaseStationKey, BaseStation>, exclude: Option<BaseStationKey>) -> Option<BaseStationKey> {
        for entry in self.closest_base_stations.iter_mut() {
            if let Some(bs) = base_stations.get(entry.1) {
                entry.0 = bs.distance_to(self.position);
            }
        }
        self.closest_base_stations.sort_by(|a, b| a.0.total_cmp(&b.0));

        self.closest_base_stations
            .iter()
            .filter(|(_, key)| Some(*key) != exclude)
            .find(|(_, key)| base_stations.get(*key).is_some_and(|bs| bs.covers(self.position)))
            .map(|(_, key)| *key)
    }

    /// A connected client must be inside the coverage of its base station.
    pub fn satisfies_invariant(&self, base_stations: &SlotMap<BaseStationKey, BaseStation>) -> bool {
        if !self.connected {
            return true;
        }

        self.base_station.and_then(|key| base_stations.get(key)).is_some_and(|bs| bs.covers(self.position))
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Client_{} @ {} [{:?}] pattern={} slice={}",
            self.pk,
            self.position,
            self.state(),
            self.mobility_pattern,
            self.slice_index
        )
    }
}
