use crate::domain::ran_model::base_station::BaseStationKey;
use crate::domain::ran_model::client::client::{ActiveHold, ClientKey, ClientState};
use crate::domain::ran_model::utils::format::format_bps;
use crate::domain::ran_model::world::{ClientWakeup, Wakeup, World, client_mut, slice_mut};
use crate::domain::simulator::engine::SimulationEngine;
use crate::domain::simulator::sim_time::SimTime;
use crate::error::{Error, Result};

/// Result of one connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Connected(BaseStationKey),
    /// Reachable, but the slice refused the connection.
    Blocked(BaseStationKey),
    Unreachable,
}

impl World {
    /// Movement tick: move, then keep or find a connection.
    ///
    /// The very first tick only attaches the client at its initial position.
    pub(crate) fn on_movement_tick(&mut self, key: ClientKey, engine: &mut SimulationEngine<Wakeup>) -> Result<()> {
        let now = engine.now();

        let client = client_mut(&mut self.clients, key)?;
        client.account_time(now);
        if client.movement_ticks > 0 {
            let (dx, dy) = client.movement.sample_movement(&mut self.rng);
            client.move_by(dx, dy);
        }
        client.movement_ticks += 1;

        let position = client.position;
        let current = client.base_station;

        if client.connected {
            let covered = current.and_then(|bs| self.base_stations.get(bs)).is_some_and(|bs| bs.covers(position));
            if !covered {
                log::debug!("Client_{} left the coverage of its base station at t={}.", client.pk, now);
                self.handover(key, now)?;
            } else if self.policy.handover.prefer_nearest {
                self.spatial_index.assign(&mut self.clients, &self.base_stations, now);
                let nearest = client_mut(&mut self.clients, key)?.find_reachable(&self.base_stations, None);
                if nearest.is_some() && nearest != current {
                    self.handover(key, now)?;
                }
            }
        } else {
            self.attempt_attach(key, now, None)?;
        }

        engine.schedule_in(self.policy.movement_interval, Wakeup::client(key, ClientWakeup::Movement));
        Ok(())
    }

    /// Locates a reachable base station and asks the client's slice for admission.
    ///
    /// Candidates are, in order: the current base station if it still covers the
    /// client, the recorded nearest list re-ranked by the current position, and
    /// the result of a fresh spatial index run at `now`.
    pub(crate) fn attempt_attach(&mut self, key: ClientKey, now: SimTime, exclude: Option<BaseStationKey>) -> Result<AttachOutcome> {
        let client = client_mut(&mut self.clients, key)?;
        let position = client.position;

        let mut target = client.base_station.filter(|bs| Some(*bs) != exclude && self.base_stations.get(*bs).is_some_and(|b| b.covers(position)));
        if target.is_none() {
            target = client.find_reachable(&self.base_stations, exclude);
        }
        if target.is_none() {
            self.spatial_index.assign(&mut self.clients, &self.base_stations, now);
            target = client_mut(&mut self.clients, key)?.find_reachable(&self.base_stations, exclude);
        }

        self.stats.record_connect_attempt(position);
        let client = client_mut(&mut self.clients, key)?;
        let Some(bs_key) = target else {
            client.base_station = None;
            log::trace!("Client_{} is out of reach of every base station at t={}.", client.pk, now);
            return Ok(AttachOutcome::Unreachable);
        };

        client.base_station = Some(bs_key);

        let slice = slice_mut(&mut self.base_stations, bs_key, client.slice_index)?;
        if slice.connect() {
            client.connected = true;
            log::debug!("Client_{} connected to slice '{}' at t={} (users: {}).", client.pk, slice.name, now, slice.connected_users());
            Ok(AttachOutcome::Connected(bs_key))
        } else {
            self.stats.record_block(position);
            log::debug!("Client_{} blocked by slice '{}' at t={}.", client.pk, slice.name, now);
            Ok(AttachOutcome::Blocked(bs_key))
        }
    }

    /// Leaves the current base station and connects to the nearest other reachable one.
    pub(crate) fn handover(&mut self, key: ClientKey, now: SimTime) -> Result<AttachOutcome> {
        self.settle_hold(key, now)?;

        let client = client_mut(&mut self.clients, key)?;
        let old = client.base_station;
        if client.connected {
            if let Some(old) = old {
                slice_mut(&mut self.base_stations, old, client.slice_index)?.disconnect();
            }
            client.connected = false;
        }

        let outcome = self.attempt_attach(key, now, old)?;
        let client = client_mut(&mut self.clients, key)?;
        match outcome {
            AttachOutcome::Connected(_) => {
                self.stats.record_handover(client.position);
                log::debug!("Client_{} handed over at t={}.", client.pk, now);
            }
            AttachOutcome::Blocked(_) => {}
            AttachOutcome::Unreachable => log::debug!("Client_{} lost its connection at t={}.", client.pk, now),
        }

        Ok(outcome)
    }

    /// Ends the active hold early, crediting only the elapsed part.
    pub(crate) fn settle_hold(&mut self, key: ClientKey, now: SimTime) -> Result<()> {
        let client = client_mut(&mut self.clients, key)?;
        let Some(hold) = client.hold.take() else {
            return Ok(());
        };

        let elapsed = now.since(hold.started_at).clamp(0.0, hold.duration);
        let fraction = if hold.duration > 0.0 { elapsed / hold.duration } else { 1.0 };
        client.counters.total_consume_time += elapsed;
        client.counters.total_usage += hold.usage * fraction;

        slice_mut(&mut self.base_stations, hold.base_station, client.slice_index)?.release(hold.bandwidth)
    }

    /// Usage tick: a connected idle client requests bandwidth from its slice.
    pub(crate) fn on_usage_tick(&mut self, key: ClientKey, engine: &mut SimulationEngine<Wakeup>) -> Result<()> {
        let now = engine.now();

        let client = client_mut(&mut self.clients, key)?;
        client.account_time(now);
        let interval = self.policy.usage_interval(client.usage_frequency.sample_scaled(&mut self.rng));

        if client.state() == ClientState::AttachedIdle {
            let bs_key = client.base_station.ok_or_else(|| Error::InvariantViolation(format!("Client_{} is connected without a base station", client.pk)))?;
            let slice = slice_mut(&mut self.base_stations, bs_key, client.slice_index)?;

            let amount = slice.usage_pattern.sample_scaled(&mut self.rng);
            client.counters.total_request_count += 1;
            let rate = slice.consumable_share().min(amount);

            if !(rate > 0.0) {
                log::trace!("Client_{} has nothing to request at t={}.", client.pk, now);
            } else if slice.request(rate) {
                let duration = self.policy.hold_duration(amount, rate);
                let id = self.next_hold_id;
                self.next_hold_id += 1;

                client.hold = Some(ActiveHold { id, base_station: bs_key, bandwidth: rate, usage: amount, started_at: now, duration });
                engine.schedule_in(duration, Wakeup::client(key, ClientWakeup::HoldEnd { hold_id: id }));
                log::trace!("Client_{} holds {} on '{}' for {:.3}.", client.pk, format_bps(rate), slice.name, duration);
            } else {
                self.stats.record_block(client.position);
                log::debug!("Client_{} request of {} rejected by '{}' at t={}.", client.pk, format_bps(rate), slice.name, now);
            }
        }

        engine.schedule_in(interval, Wakeup::client(key, ClientWakeup::Usage));
        Ok(())
    }

    /// Returns the bandwidth of a hold that ran to its end. Holds already settled by a handover are ignored.
    pub(crate) fn on_hold_end(&mut self, key: ClientKey, hold_id: u64, now: SimTime) -> Result<()> {
        let client = client_mut(&mut self.clients, key)?;
        client.account_time(now);

        let hold = match client.hold {
            Some(hold) if hold.id == hold_id => hold,
            _ => return Ok(()),
        };
        client.hold = None;
        client.counters.total_consume_time += hold.duration;
        client.counters.total_usage += hold.usage;

        slice_mut(&mut self.base_stations, hold.base_station, client.slice_index)?.release(hold.bandwidth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ran_model::base_station::BaseStation;
    use crate::domain::ran_model::client::client::Client;
    use crate::domain::ran_model::config::{BaseStationSpec, SliceSpec};
    use crate::domain::ran_model::geometry::Point;
    use crate::domain::ran_model::policy::SimulationPolicy;
    use crate::domain::ran_model::spatial_index::spatial_index::SpatialIndex;
    use crate::domain::ran_model::stats::measurement_area::MeasurementArea;
    use crate::domain::ran_model::stats::stats_collector::StatsCollector;
    use crate::domain::ran_model::utils::distribution::DistributionSampler;
    use crate::domain::ran_model::utils::id::{MobilityPatternName, SliceName};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use slotmap::SlotMap;

    fn world(guaranteed: f64) -> (World, BaseStationKey, ClientKey) {
        let slice = SliceSpec {
            name: SliceName::new("s"),
            client_weight: 1.0,
            delay_tolerance: 1.0,
            qos_class: 1,
            bandwidth_guaranteed: guaranteed,
            bandwidth_max: 100.0,
            threshold: 0.0,
            usage_pattern: DistributionSampler::constant(50.0),
        };
        let spec = BaseStationSpec { pk: 0, center: Point::new(0.0, 0.0), coverage_radius: 10.0, capacity_bandwidth: 100.0, ratios: vec![1.0] };

        let mut base_stations = SlotMap::with_key();
        let bs = base_stations.insert(BaseStation::new(&spec, &[slice]).unwrap());
        let mut clients = SlotMap::with_key();
        let client = clients.insert(Client::new(
            0,
            Point::new(1.0, 1.0),
            DistributionSampler::constant(0.0),
            DistributionSampler::constant(1.0),
            MobilityPatternName::new("static"),
            0,
        ));

        let mut spatial_index = SpatialIndex::new(None);
        spatial_index.assign(&mut clients, &base_stations, SimTime::ZERO);
        let stats = StatsCollector::new(MeasurementArea::new((-50.0, 50.0), (-50.0, 50.0)), 0.5);

        let world = World::new(base_stations, clients, spatial_index, stats, SimulationPolicy::default(), StdRng::seed_from_u64(1));
        (world, bs, client)
    }

    #[test]
    fn test_attach_records_attempt() {
        let (mut world, bs, client) = world(0.0);

        assert_eq!(world.attempt_attach(client, SimTime::ZERO, None).unwrap(), AttachOutcome::Connected(bs));
        assert_eq!(world.stats.window().connect_attempts, 1);
        assert_eq!(world.clients[client].state(), ClientState::AttachedIdle);
    }

    #[test]
    fn test_attach_to_excluded_only_station_is_unreachable() {
        let (mut world, bs, client) = world(0.0);

        assert_eq!(world.attempt_attach(client, SimTime::ZERO, Some(bs)).unwrap(), AttachOutcome::Unreachable);
        assert_eq!(world.clients[client].base_station, None);
        assert_eq!(world.stats.window().connect_attempts, 1);
        assert_eq!(world.stats.window().blocks, 0);
    }

    #[test]
    fn test_request_on_depleted_pool_is_blocked() {
        let (mut world, bs, client) = world(0.0);
        let mut engine = SimulationEngine::new(SimTime::new(10.0));
        world.attempt_attach(client, SimTime::ZERO, None).unwrap();
        assert!(world.base_stations[bs].slices[0].request(90.0));

        world.on_usage_tick(client, &mut engine).unwrap();

        assert_eq!(world.clients[client].state(), ClientState::AttachedIdle);
        assert_eq!(world.clients[client].counters.total_request_count, 1);
        assert_eq!(world.stats.window().blocks, 1);
        assert_eq!(engine.pending(), 1);
    }

    #[test]
    fn test_stale_hold_end_is_ignored() {
        let (mut world, bs, client) = world(0.0);
        let mut engine = SimulationEngine::new(SimTime::new(10.0));
        world.attempt_attach(client, SimTime::ZERO, None).unwrap();
        world.on_usage_tick(client, &mut engine).unwrap();
        let hold = world.clients[client].hold.unwrap();

        world.on_hold_end(client, hold.id + 1, SimTime::new(0.5)).unwrap();
        assert_eq!(world.clients[client].hold, Some(hold));

        world.on_hold_end(client, hold.id, SimTime::new(1.0)).unwrap();
        assert_eq!(world.clients[client].hold, None);
        assert_eq!(world.base_stations[bs].used_bandwidth(), 0.0);
        assert_eq!(world.clients[client].counters.total_usage, 50.0);
    }

    #[test]
    fn test_handover_without_alternative_disconnects() {
        let (mut world, bs, client) = world(0.0);
        world.attempt_attach(client, SimTime::ZERO, None).unwrap();

        assert_eq!(world.handover(client, SimTime::new(1.0)).unwrap(), AttachOutcome::Unreachable);
        assert!(!world.clients[client].connected);
        assert_eq!(world.base_stations[bs].slices[0].connected_users(), 0);
        assert_eq!(world.stats.window().handovers, 0);
    }
}
