use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::domain::ran_model::client::client::{Client, ClientState};
use crate::domain::ran_model::stats::stats_series::{StatsSeries, SteadyStateSummary};
use crate::domain::ran_model::utils::format::format_bps;
use crate::error::Result;

/// Final state and counters of one client. Flat so it maps onto one CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSummary {
    pub pk: usize,
    pub x: f64,
    pub y: f64,
    pub mobility_pattern: String,
    pub slice: String,
    pub state: ClientState,
    /// Configuration index of the base station the client ended up attached to.
    pub base_station: Option<usize>,
    pub total_connected_time: f64,
    pub total_unconnected_time: f64,
    pub total_request_count: u64,
    pub total_consume_time: f64,
    pub total_usage: f64,
}

impl ClientSummary {
    pub fn new(client: &Client, slice_name: &str, base_station: Option<usize>) -> Self {
        ClientSummary {
            pk: client.pk,
            x: client.position.x,
            y: client.position.y,
            mobility_pattern: client.mobility_pattern.to_string(),
            slice: slice_name.to_string(),
            state: client.state(),
            base_station,
            total_connected_time: client.counters.total_connected_time,
            total_unconnected_time: client.counters.total_unconnected_time,
            total_request_count: client.counters.total_request_count,
            total_consume_time: client.counters.total_consume_time,
            total_usage: client.counters.total_usage,
        }
    }
}

/// Everything a finished run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub simulation_time: f64,
    pub clients: Vec<ClientSummary>,
    pub series: StatsSeries,
    pub steady_state: SteadyStateSummary,
}

impl SimulationReport {
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Writes one `;`-delimited row per statistics window.
    pub fn write_series_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
        for row in self.series.rows() {
            csv_wtr.serialize(row)?;
        }
        csv_wtr.flush()?;
        Ok(())
    }

    /// Writes one `;`-delimited row per client.
    pub fn write_clients_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
        for client in &self.clients {
            csv_wtr.serialize(client)?;
        }
        csv_wtr.flush()?;
        Ok(())
    }

    pub fn write_json_file(&self, path: &Path) -> Result<()> {
        self.write_json(create_file(path)?)
    }

    pub fn write_series_csv_file(&self, path: &Path) -> Result<()> {
        self.write_series_csv(create_file(path)?)
    }

    pub fn write_clients_csv_file(&self, path: &Path) -> Result<()> {
        self.write_clients_csv(create_file(path)?)
    }

    pub fn log_summary(&self) {
        for client in &self.clients {
            log::info!(
                "Client_{} [{} / {}] {:?}: connected {:.2}, unconnected {:.2}, requests {}, consumed {:.2}, usage {}",
                client.pk,
                client.mobility_pattern,
                client.slice,
                client.state,
                client.total_connected_time,
                client.total_unconnected_time,
                client.total_request_count,
                client.total_consume_time,
                format_bps(client.total_usage)
            );
        }

        let steady = &self.steady_state;
        log::info!(
            "Steady state over {} window(s) from #{}: connected {:.3}, coverage {:.3}, load {:.3}, used {}, clients/slice {:.2}, block rate {:.3}, handover rate {:.3}",
            steady.windows,
            steady.first_window,
            steady.connected_users_ratio,
            steady.coverage_ratio,
            steady.avg_slice_load_ratio,
            format_bps(steady.used_bandwidth),
            steady.avg_slice_client_count,
            steady.block_rate,
            steady.handover_rate
        );
    }
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
