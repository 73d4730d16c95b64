use slotmap::SlotMap;

use crate::domain::ran_model::base_station::{BaseStation, BaseStationKey};
use crate::domain::ran_model::client::client::{Client, ClientKey};
use crate::domain::ran_model::spatial_index::kd_tree::KdTree;
use crate::domain::simulator::sim_time::SimTime;

/// Nearest-base-station assignment over a k-d tree of base-station centers.
///
/// The tree is rebuilt on every effective run. Runs are memoized per
/// simulated instant: a second call with the same `as_of` does nothing.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    limit: Option<usize>,
    last_run: Option<SimTime>,
    runs: u64,
}

impl SpatialIndex {
    /// `limit` of `None` or `0` queries all base stations.
    pub fn new(limit: Option<usize>) -> Self {
        SpatialIndex { limit, last_run: None, runs: 0 }
    }

    pub fn last_run(&self) -> Option<SimTime> {
        self.last_run
    }

    /// Number of effective (not memoized) runs.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Number of neighbors queried per client for `num_base_stations` base stations.
    pub fn fan_out(&self, num_base_stations: usize) -> usize {
        match self.limit {
            None | Some(0) => num_base_stations,
            Some(limit) => limit.min(num_base_stations),
        }
    }

    /// Refreshes the nearest base-station list of every client and attaches
    /// unattached clients to the first candidate that covers them.
    ///
    /// Connected clients only get their nearest list refreshed and keep their
    /// base station, even when they have already left its coverage. Whether
    /// they detach is decided on their own movement tick, which may run after
    /// another client's call at the same instant; that tick re-ranks the list
    /// by the current position and picks the handover target.
    ///
    /// # Returns
    /// `false` if the run was skipped because it already happened at `as_of`.
    pub fn assign(&mut self, clients: &mut SlotMap<ClientKey, Client>, base_stations: &SlotMap<BaseStationKey, BaseStation>, as_of: SimTime) -> bool {
        if self.last_run == Some(as_of) {
            return false;
        }
        self.last_run = Some(as_of);
        self.runs += 1;

        let tree = KdTree::build(base_stations.iter().map(|(key, bs)| (bs.coverage.center, (bs.pk, key))));
        let k = self.fan_out(tree.len());

        for client in clients.values_mut() {
            let neighbors = tree.nearest(client.position, k);
            client.closest_base_stations = neighbors.iter().map(|n| (n.distance, n.item.1)).collect();

            if client.connected {
                continue;
            }

            let still_covered = client.base_station.and_then(|key| base_stations.get(key)).is_some_and(|bs| bs.covers(client.position));
            if still_covered {
                continue;
            }

            client.base_station = neighbors
                .iter()
                .find(|n| base_stations.get(n.item.1).is_some_and(|bs| n.distance <= bs.coverage.radius))
                .map(|n| n.item.1);
        }

        log::trace!("Spatial index run #{} at t={} for {} clients (k={}).", self.runs, as_of, clients.len(), k);
        true
    }
}
