use rand::rngs::StdRng;
use slotmap::SlotMap;

use crate::domain::ran_model::base_station::{BaseStation, BaseStationKey};
use crate::domain::ran_model::client::client::{Client, ClientKey};
use crate::domain::ran_model::policy::SimulationPolicy;
use crate::domain::ran_model::slice::Slice;
use crate::domain::ran_model::spatial_index::spatial_index::SpatialIndex;
use crate::domain::ran_model::stats::stats_collector::StatsCollector;
use crate::domain::simulator::engine::{ProcessHost, SimulationEngine, Wakeable};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientWakeup {
    Movement,
    Usage,
    HoldEnd { hold_id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    Client { key: ClientKey, reason: ClientWakeup },
    CollectStats,
}

impl Wakeup {
    pub fn client(key: ClientKey, reason: ClientWakeup) -> Self {
        Wakeup::Client { key, reason }
    }
}

impl Wakeable for Wakeup {
    // Statistics observe an instant only after every client acted in it.
    fn priority(&self) -> u8 {
        match self {
            Wakeup::Client { .. } => 0,
            Wakeup::CollectStats => 1,
        }
    }
}

/// All mutable simulation state. Clients refer to base stations by key only.
#[derive(Debug)]
pub struct World {
    pub base_stations: SlotMap<BaseStationKey, BaseStation>,
    pub clients: SlotMap<ClientKey, Client>,
    pub spatial_index: SpatialIndex,
    pub stats: StatsCollector,
    pub policy: SimulationPolicy,
    pub(crate) rng: StdRng,
    pub(crate) next_hold_id: u64,
}

impl World {
    pub fn new(
        base_stations: SlotMap<BaseStationKey, BaseStation>,
        clients: SlotMap<ClientKey, Client>,
        spatial_index: SpatialIndex,
        stats: StatsCollector,
        policy: SimulationPolicy,
        rng: StdRng,
    ) -> Self {
        World { base_stations, clients, spatial_index, stats, policy, rng, next_hold_id: 0 }
    }

    pub fn client(&self, key: ClientKey) -> Option<&Client> {
        self.clients.get(key)
    }

    pub fn base_station(&self, key: BaseStationKey) -> Option<&BaseStation> {
        self.base_stations.get(key)
    }

    /// Base station keys ordered by their configuration index.
    pub fn base_station_keys(&self) -> Vec<BaseStationKey> {
        let mut keys: Vec<(usize, BaseStationKey)> = self.base_stations.iter().map(|(key, bs)| (bs.pk, key)).collect();
        keys.sort();
        keys.into_iter().map(|(_, key)| key).collect()
    }

    /// Client keys ordered by creation.
    pub fn client_keys(&self) -> Vec<ClientKey> {
        let mut keys: Vec<(usize, ClientKey)> = self.clients.iter().map(|(key, c)| (c.pk, key)).collect();
        keys.sort();
        keys.into_iter().map(|(_, key)| key).collect()
    }
}

impl ProcessHost<Wakeup> for World {
    fn resume(&mut self, wakeup: Wakeup, engine: &mut SimulationEngine<Wakeup>) -> Result<()> {
        match wakeup {
            Wakeup::Client { key, reason } => {
                match reason {
                    ClientWakeup::Movement => self.on_movement_tick(key, engine)?,
                    ClientWakeup::Usage => self.on_usage_tick(key, engine)?,
                    ClientWakeup::HoldEnd { hold_id } => self.on_hold_end(key, hold_id, engine.now())?,
                }

                let client = client_mut(&mut self.clients, key)?;
                if !client.satisfies_invariant(&self.base_stations) {
                    return Err(Error::InvariantViolation(format!("{} is connected outside the coverage of its base station", client)));
                }
            }
            Wakeup::CollectStats => {
                self.stats.collect(engine.now(), &self.clients, &self.base_stations);
                engine.schedule_in(self.stats.interval(), Wakeup::CollectStats);
            }
        }

        Ok(())
    }
}

pub(crate) fn client_mut(clients: &mut SlotMap<ClientKey, Client>, key: ClientKey) -> Result<&mut Client> {
    clients.get_mut(key).ok_or_else(|| Error::InvariantViolation(format!("unknown client {:?}", key)))
}

pub(crate) fn slice_mut(base_stations: &mut SlotMap<BaseStationKey, BaseStation>, key: BaseStationKey, slice_index: usize) -> Result<&mut Slice> {
    let bs = base_stations.get_mut(key).ok_or_else(|| Error::InvariantViolation(format!("unknown base station {:?}", key)))?;
    let pk = bs.pk;
    bs.slice_mut(slice_index).ok_or_else(|| Error::InvariantViolation(format!("BS_{} has no slice #{}", pk, slice_index)))
}
