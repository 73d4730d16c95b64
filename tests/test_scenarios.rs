mod common;

use serde_json::json;
use slice_sim::domain::ran_model::client::client::ClientState;
use slice_sim::domain::simulator::sim_time::SimTime;

use common::{base_document, simulation};

#[test]
fn test_static_client_attaches_at_first_tick() {
    let mut sim = simulation(&base_document());

    sim.advance_to(SimTime::new(0.6)).unwrap();

    let world = sim.world();
    let key = world.client_keys()[0];
    let client = world.client(key).unwrap();
    assert!(client.connected);
    assert_eq!(client.state(), ClientState::AttachedIdle);
    assert_eq!(client.counters.total_unconnected_time, 0.0);

    let series = world.stats.series();
    assert_eq!(series.len(), 1);
    assert_eq!(series.window_end, vec![0.5]);
    assert_eq!(series.connect_attempts, vec![1]);
    assert_eq!(series.block_rate, vec![0.0]);
    assert_eq!(series.connected_users_ratio, vec![1.0]);
    assert_eq!(series.coverage_ratio, vec![1.0]);
    assert_eq!(series.avg_slice_client_count, vec![1.0]);
}

#[test]
fn test_guaranteed_bandwidth_blocks_second_client() {
    let mut document = base_document();
    document["settings"]["num_clients"] = json!(2);
    document["slices"]["s"]["bandwidth_guaranteed"] = json!(60);
    let mut sim = simulation(&document);

    sim.advance_to(SimTime::new(0.6)).unwrap();

    let world = sim.world();
    let keys = world.client_keys();
    assert!(world.client(keys[0]).unwrap().connected);
    assert!(!world.client(keys[1]).unwrap().connected);
    // Rejected clients stay attached to the base station that refused them.
    assert!(world.client(keys[1]).unwrap().base_station.is_some());

    let series = world.stats.series();
    assert_eq!(series.connect_attempts, vec![2]);
    assert_eq!(series.block_rate, vec![0.5]);
    assert_eq!(series.connected_users_ratio, vec![0.5]);

    // The blocked client retries every tick and is blocked every time.
    sim.advance_to(SimTime::new(1.6)).unwrap();
    let series = sim.world().stats.series();
    assert_eq!(series.connect_attempts[1], 1);
    assert_eq!(series.block_rate[1], 1.0);
}

#[test]
fn test_client_connects_when_moving_into_coverage() {
    let mut document = base_document();
    document["clients"]["location"]["x"]["params"] = json!([20]);
    document["clients"]["location"]["y"]["params"] = json!([20]);
    document["mobility_patterns"]["fixed"]["params"] = json!([-5]);
    let mut sim = simulation(&document);
    let key = sim.world().client_keys()[0];

    // (20, 20) -> (15, 15) -> (10, 10): all outside a radius of 10.
    sim.advance_to(SimTime::new(2.9)).unwrap();
    let client = sim.world().client(key).unwrap();
    assert!(!client.connected);
    assert_eq!(client.base_station, None);

    // (5, 5) is inside.
    sim.advance_to(SimTime::new(3.6)).unwrap();
    let client = sim.world().client(key).unwrap();
    assert!(client.connected);
    assert_eq!(client.counters.total_unconnected_time, 3.0);
    assert_eq!(client.counters.total_connected_time, 0.0);
    // Every tick is an attempt, reachable or not.
    assert_eq!(sim.world().stats.series().connect_attempts, vec![1, 1, 1, 1]);
    assert_eq!(sim.world().stats.series().block_rate, vec![0.0; 4]);
}

#[test]
fn test_usage_tick_starts_and_ends_hold() {
    let mut document = base_document();
    document["clients"]["usage_frequency"]["params"] = json!([1]);
    let mut sim = simulation(&document);
    let key = sim.world().client_keys()[0];

    // Usage at t=1: rate = min(share 100, amount 50) = 50, duration 50 / 50 = 1.
    sim.advance_to(SimTime::new(1.5)).unwrap();
    let world = sim.world();
    let client = world.client(key).unwrap();
    assert_eq!(client.state(), ClientState::AttachedConsuming);
    assert_eq!(client.counters.total_request_count, 1);
    let bs = world.base_station(client.base_station.unwrap()).unwrap();
    assert_eq!(bs.used_bandwidth(), 50.0);

    // The hold ends at t=2 before the next usage tick of the same instant starts a new one.
    sim.advance_to(SimTime::new(2.5)).unwrap();
    let client = sim.world().client(key).unwrap();
    assert_eq!(client.counters.total_consume_time, 1.0);
    assert_eq!(client.counters.total_usage, 50.0);
    assert_eq!(client.counters.total_request_count, 2);
    assert_eq!(client.state(), ClientState::AttachedConsuming);
}

#[test]
fn test_consuming_clients_share_the_pool() {
    let mut document = base_document();
    document["settings"]["num_clients"] = json!(4);
    document["slices"]["s"]["bandwidth_guaranteed"] = json!(0);
    document["slices"]["s"]["usage_pattern"]["params"] = json!([40]);
    document["clients"]["usage_frequency"]["params"] = json!([1]);
    document["settings"]["holding"] = json!({ "time_scale": 5.0 });
    let mut sim = simulation(&document);

    // Four users share 100: each draws min(25, 40) = 25 for 5 * 40 / 25 = 8.
    sim.advance_to(SimTime::new(1.2)).unwrap();
    let world = sim.world();
    assert!(world.clients.values().all(|c| c.state() == ClientState::AttachedConsuming));
    let bs = world.base_station(world.base_station_keys()[0]).unwrap();
    assert_eq!(bs.slices[0].pool.level(), 0.0);

    // Usage ticks of consuming clients only reschedule.
    sim.advance_to(SimTime::new(2.2)).unwrap();
    let requests: u64 = sim.world().clients.values().map(|c| c.counters.total_request_count).sum();
    assert_eq!(requests, 4);
}

#[test]
fn test_handover_when_leaving_coverage() {
    let mut document = base_document();
    document["base_stations"] = json!([
        { "x": 0, "y": 0, "coverage": 10, "capacity_bandwidth": 100, "ratios": { "s": 1.0 } },
        { "x": 14, "y": 14, "coverage": 10, "capacity_bandwidth": 100, "ratios": { "s": 1.0 } }
    ]);
    document["clients"]["location"]["x"]["params"] = json!([4]);
    document["clients"]["location"]["y"]["params"] = json!([4]);
    document["mobility_patterns"]["fixed"]["params"] = json!([3]);
    let mut sim = simulation(&document);
    let bs_keys = sim.world().base_station_keys();
    let key = sim.world().client_keys()[0];

    // (4, 4) and (7, 7) are covered by BS 0.
    sim.advance_to(SimTime::new(1.5)).unwrap();
    assert_eq!(sim.world().client(key).unwrap().base_station, Some(bs_keys[0]));

    // (10, 10) is only covered by BS 1.
    sim.advance_to(SimTime::new(2.6)).unwrap();
    let world = sim.world();
    let client = world.client(key).unwrap();
    assert!(client.connected);
    assert_eq!(client.base_station, Some(bs_keys[1]));
    assert_eq!(world.base_station(bs_keys[0]).unwrap().slices[0].connected_users(), 0);
    assert_eq!(world.base_station(bs_keys[1]).unwrap().slices[0].connected_users(), 1);

    let series = world.stats.series();
    assert_eq!(series.handover_rate, vec![0.0, 0.0, 1.0]);
    assert_eq!(series.connect_attempts, vec![1, 0, 1]);
}

#[test]
fn test_handover_settles_active_hold() {
    let mut document = base_document();
    document["base_stations"] = json!([
        { "x": 0, "y": 0, "coverage": 10, "capacity_bandwidth": 100, "ratios": { "s": 1.0 } },
        { "x": 14, "y": 14, "coverage": 10, "capacity_bandwidth": 100, "ratios": { "s": 1.0 } }
    ]);
    document["clients"]["location"]["x"]["params"] = json!([4]);
    document["clients"]["location"]["y"]["params"] = json!([4]);
    document["mobility_patterns"]["fixed"]["params"] = json!([3]);
    document["clients"]["usage_frequency"]["params"] = json!([1.5]);
    document["settings"]["holding"] = json!({ "time_scale": 2.0 });
    let mut sim = simulation(&document);
    let bs_keys = sim.world().base_station_keys();
    let key = sim.world().client_keys()[0];

    // Hold starts at t=1.5 on BS 0 and would last 2 * 50 / 50 = 2.
    sim.advance_to(SimTime::new(1.9)).unwrap();
    assert_eq!(sim.world().base_station(bs_keys[0]).unwrap().used_bandwidth(), 50.0);

    // Handover at t=2 settles half of it.
    sim.advance_to(SimTime::new(2.1)).unwrap();
    let world = sim.world();
    let client = world.client(key).unwrap();
    assert_eq!(client.hold, None);
    assert_eq!(client.counters.total_consume_time, 0.5);
    assert_eq!(client.counters.total_usage, 12.5);
    assert_eq!(world.base_station(bs_keys[0]).unwrap().used_bandwidth(), 0.0);
    assert_eq!(world.base_station(bs_keys[1]).unwrap().used_bandwidth(), 0.0);
}

#[test]
fn test_reassignment_hands_over_to_closer_base_station() {
    let mut document = base_document();
    document["base_stations"] = json!([
        { "x": 0, "y": 0, "coverage": 100, "capacity_bandwidth": 100, "ratios": { "s": 1.0 } },
        { "x": 14, "y": 14, "coverage": 100, "capacity_bandwidth": 100, "ratios": { "s": 1.0 } }
    ]);
    document["clients"]["location"]["x"]["params"] = json!([4]);
    document["clients"]["location"]["y"]["params"] = json!([4]);
    document["mobility_patterns"]["fixed"]["params"] = json!([4]);

    // (8, 8) is closer to BS 1 and both still cover it.
    let mut eager = simulation(&document);
    eager.advance_to(SimTime::new(1.6)).unwrap();
    let bs_keys = eager.world().base_station_keys();
    let key = eager.world().client_keys()[0];
    let client = eager.world().client(key).unwrap();
    assert!(client.connected);
    assert_eq!(client.base_station, Some(bs_keys[1]));
    assert_eq!(eager.world().stats.series().handover_rate, vec![0.0, 1.0]);
    assert_eq!(eager.world().base_station(bs_keys[0]).unwrap().slices[0].connected_users(), 0);

    document["settings"]["handover"] = json!({ "prefer_nearest": false });
    let mut sticky = simulation(&document);
    sticky.advance_to(SimTime::new(1.6)).unwrap();
    let bs_keys = sticky.world().base_station_keys();
    let key = sticky.world().client_keys()[0];
    assert_eq!(sticky.world().client(key).unwrap().base_station, Some(bs_keys[0]));
    assert_eq!(sticky.world().stats.series().handover_rate, vec![0.0, 0.0]);
}

#[test]
fn test_client_outside_all_coverage_stays_unattached() {
    let mut document = base_document();
    document["clients"]["location"]["x"]["params"] = json!([50]);

    let mut sim = simulation(&document);
    sim.advance_to(SimTime::new(0.6)).unwrap();
    assert_eq!(sim.world().stats.series().connect_attempts, vec![1]);

    let report = slice_sim::run_simulation(&common::config(&document), Some(3)).unwrap();

    let client = &report.clients[0];
    assert_eq!(client.state, ClientState::Unattached);
    assert_eq!(client.base_station, None);
    assert_eq!(client.total_unconnected_time, 10.0);
    assert_eq!(report.series.connect_attempts, vec![1; 10]);
    assert!(report.series.block_rate.iter().all(|r| *r == 0.0));
}
