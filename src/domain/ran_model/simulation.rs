use rand::SeedableRng;
use rand::rngs::StdRng;
use slotmap::SlotMap;

use crate::domain::ran_model::base_station::BaseStation;
use crate::domain::ran_model::client::client::Client;
use crate::domain::ran_model::config::SimulationConfig;
use crate::domain::ran_model::geometry::Point;
use crate::domain::ran_model::report::{ClientSummary, SimulationReport};
use crate::domain::ran_model::spatial_index::spatial_index::SpatialIndex;
use crate::domain::ran_model::stats::stats_collector::StatsCollector;
use crate::domain::ran_model::utils::id::SliceName;
use crate::domain::ran_model::utils::weighted_selector::WeightedSelector;
use crate::domain::ran_model::world::{ClientWakeup, Wakeup, World};
use crate::domain::simulator::engine::SimulationEngine;
use crate::domain::simulator::sim_time::SimTime;
use crate::error::{ConfigError, Result};

/// A fully set up simulation run: the world plus its scheduler.
#[derive(Debug)]
pub struct Simulation {
    seed: u64,
    simulation_time: f64,
    warmup_ratio: f64,
    cooldown_ratio: f64,
    slice_names: Vec<SliceName>,
    engine: SimulationEngine<Wakeup>,
    world: World,
}

impl Simulation {
    /// Builds base stations and clients, runs the initial spatial assignment
    /// and schedules the first wake-up of every process.
    pub fn new(config: &SimulationConfig, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut base_stations = SlotMap::with_key();
        for spec in &config.base_stations {
            base_stations.insert(BaseStation::new(spec, &config.slices)?);
        }

        let slice_selector = WeightedSelector::new(config.slices.iter().enumerate().map(|(index, slice)| (index, slice.client_weight)));
        let mobility_selector = WeightedSelector::new(config.mobility_patterns.iter().map(|pattern| (pattern, pattern.client_weight)));

        let mut clients = SlotMap::with_key();
        let mut client_keys = Vec::with_capacity(config.num_clients);
        for pk in 0..config.num_clients {
            let x = config.client_location_x.sample_scaled(&mut rng);
            let y = config.client_location_y.sample_scaled(&mut rng);
            let pattern = mobility_selector.select(&mut rng).ok_or_else(|| ConfigError::MissingSection("mobility_patterns".to_string()))?;
            let slice_index = slice_selector.select(&mut rng).copied().ok_or_else(|| ConfigError::MissingSection("slices".to_string()))?;

            let client = Client::new(pk, Point::new(x, y), pattern.movement.clone(), config.usage_frequency.clone(), pattern.name.clone(), slice_index);
            log::debug!("{}", client);
            client_keys.push(clients.insert(client));
        }

        let mut spatial_index = SpatialIndex::new(config.limit_closest_base_stations);
        spatial_index.assign(&mut clients, &base_stations, SimTime::ZERO);

        let stats = StatsCollector::new(config.measurement_area, config.stats_offset);
        let mut engine = SimulationEngine::new(SimTime::new(config.simulation_time));

        for key in &client_keys {
            engine.schedule_at(SimTime::ZERO, Wakeup::client(*key, ClientWakeup::Movement));
        }
        for key in &client_keys {
            if let Some(client) = clients.get(*key) {
                let first_usage = config.policy.usage_interval(client.usage_frequency.sample_scaled(&mut rng));
                engine.schedule_at(SimTime::new(first_usage), Wakeup::client(*key, ClientWakeup::Usage));
            }
        }
        engine.schedule_at(stats.first_wakeup(), Wakeup::CollectStats);

        log::info!(
            "Simulation set up with {} base station(s), {} client(s) and {} slice(s) (seed {}).",
            base_stations.len(),
            clients.len(),
            config.slices.len(),
            seed
        );

        Ok(Simulation {
            seed,
            simulation_time: config.simulation_time,
            warmup_ratio: config.warmup_ratio,
            cooldown_ratio: config.cooldown_ratio,
            slice_names: config.slices.iter().map(|s| s.name.clone()).collect(),
            engine,
            world: World::new(base_stations, clients, spatial_index, stats, config.policy, rng),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn engine(&self) -> &SimulationEngine<Wakeup> {
        &self.engine
    }

    /// Runs every wake-up due strictly before `until`.
    pub fn advance_to(&mut self, until: SimTime) -> Result<()> {
        self.engine.run_until(&mut self.world, until)
    }

    /// Runs to the horizon and builds the report. Holds still active at the
    /// horizon are dropped without being settled.
    pub fn run(mut self) -> Result<SimulationReport> {
        self.engine.run(&mut self.world)?;

        let horizon = self.engine.now();
        for client in self.world.clients.values_mut() {
            client.account_time(horizon);
        }

        let clients = self
            .world
            .client_keys()
            .into_iter()
            .filter_map(|key| self.world.client(key))
            .map(|client| {
                let slice_name = self.slice_names.get(client.slice_index).map(|n| n.as_str()).unwrap_or_default();
                let base_station = client.base_station.and_then(|key| self.world.base_station(key)).map(|bs| bs.pk);
                ClientSummary::new(client, slice_name, base_station)
            })
            .collect();

        let series = self.world.stats.series().clone();
        let steady_state = series.steady_state(self.simulation_time, self.warmup_ratio, self.cooldown_ratio);

        Ok(SimulationReport { seed: self.seed, simulation_time: self.simulation_time, clients, series, steady_state })
    }
}
