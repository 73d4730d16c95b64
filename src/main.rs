use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use slice_sim::domain::ran_model::config::SimulationConfig;
use slice_sim::domain::ran_model::report::SimulationReport;
use slice_sim::loader::load_simulation_config;
use slice_sim::{logger, run_simulation};

/// Simulates RAN slicing: mobile clients, base stations and per-slice bandwidth admission.
#[derive(Parser, Debug)]
#[command(name = "slice-sim", version, about)]
struct Cli {
    /// Path of the JSON simulation configuration.
    config: PathBuf,

    /// Random seed. Overrides `settings.seed` of the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the full report as JSON to this file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write `stats.csv` and `clients.csv` into this directory.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace). Defaults to RUST_LOG, then info.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(1);
        }
        Err(e) => e.exit(),
    };

    let level = logger::resolve_level(cli.log_level.as_deref());

    if !cli.config.is_file() {
        logger::init(level, None);
        log::error!("Config file '{}' not found.", cli.config.display());
        return ExitCode::SUCCESS;
    }

    let config = match load_simulation_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logger::init(level, None);
            log::error!("Failed to load '{}': {}", cli.config.display(), e);
            return ExitCode::from(1);
        }
    };

    logger::init(level, config.log_file.as_deref());
    log::info!("Loaded configuration '{}'.", cli.config.display());

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli, config: &SimulationConfig) -> anyhow::Result<()> {
    let report = run_simulation(config, cli.seed).context("Simulation aborted")?;

    report.log_summary();
    print_steady_state(&report);

    if let Some(path) = &cli.report {
        report.write_json_file(path).with_context(|| format!("Failed to write report to '{}'", path.display()))?;
        log::info!("Report written to '{}'.", path.display());
    }

    if let Some(dir) = &cli.csv_dir {
        write_csv(&report, dir)?;
    } else if config.plotting.plotting {
        let path = config.plotting.plot_file.clone().unwrap_or_else(|| PathBuf::from("output.png")).with_extension("csv");
        report.write_series_csv_file(&path).with_context(|| format!("Failed to export plot data to '{}'", path.display()))?;
        log::info!("Plot data exported to '{}'.", path.display());
    }

    Ok(())
}

fn write_csv(report: &SimulationReport, dir: &Path) -> anyhow::Result<()> {
    let stats_path = dir.join("stats.csv");
    let clients_path = dir.join("clients.csv");

    report.write_series_csv_file(&stats_path).with_context(|| format!("Failed to write '{}'", stats_path.display()))?;
    report.write_clients_csv_file(&clients_path).with_context(|| format!("Failed to write '{}'", clients_path.display()))?;
    log::info!("Statistics written to '{}'.", dir.display());

    Ok(())
}

fn print_steady_state(report: &SimulationReport) {
    let steady = &report.steady_state;

    println!("{}", format!("Steady state (seed {}, {} window(s))", report.seed, steady.windows).bold());
    println!("  {:<28} {}", "connected users ratio".cyan(), format!("{:.4}", steady.connected_users_ratio).green());
    println!("  {:<28} {}", "coverage ratio".cyan(), format!("{:.4}", steady.coverage_ratio).green());
    println!("  {:<28} {}", "avg slice load ratio".cyan(), format!("{:.4}", steady.avg_slice_load_ratio).green());
    println!("  {:<28} {}", "avg slice client count".cyan(), format!("{:.2}", steady.avg_slice_client_count).green());
    println!("  {:<28} {}", "block rate".cyan(), format!("{:.4}", steady.block_rate).yellow());
    println!("  {:<28} {}", "handover rate".cyan(), format!("{:.4}", steady.handover_rate).yellow());
}
