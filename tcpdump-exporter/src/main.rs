mod aggregator;
mod args;
mod capture;
mod classifier;
mod domain;
mod flow_event;
mod metrics_server;
mod output;
mod parsers;
mod pump;
mod services;
mod tests;

use std::sync::Arc;
use std::time::Instant;

use aggregator::Aggregator;
use anyhow::Context as _;
use args::{Cli, Commands, ConfigFile, ExporterConfig};
use clap::Parser;
use log::{debug, error, info, warn};
use parsers::tcpdump_parser::TcpdumpParser;
use pump::{pump, Pipeline, PumpStats};
use services::ServiceTable;
use tokio::{fs::File, io::BufReader, signal};

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    // A config file replaces the shared flags entirely
    let config = if let Some(config_path) = cli.config_file {
        match confy::load_path::<ConfigFile>(&config_path) {
            Ok(cfg_file) => cfg_file.config,
            Err(e) => {
                error!("Error loading configuration file: {:?}", e);
                std::process::exit(1);
            }
        }
    } else {
        cli.config
    };

    if let Err(e) = run(cli.command, config).await {
        error!("Error: {:?}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: ExporterConfig) -> Result<(), anyhow::Error> {
    debug!("Starting with {:?}", config);

    let services = ServiceTable::load(&config.services_file);
    if services.is_empty() {
        warn!("No service entries loaded, flows will carry an empty service label");
    }
    let services = Arc::new(services);
    let aggregator = Arc::new(Aggregator::new());

    let listener = metrics_server::bind(config.port).await?;
    let server_aggregator = Arc::clone(&aggregator);
    let server_task = tokio::spawn(async move {
        if let Err(e) = metrics_server::serve(listener, server_aggregator).await {
            error!("{:?}", e);
        }
    });

    let pipeline = Pipeline::new(
        TcpdumpParser::new(),
        services,
        Arc::clone(&aggregator),
        config.fqdn,
    );

    let start = Instant::now();
    let result = match command {
        Commands::Capture {
            interface,
            filter,
            tcpdump,
        } => capture_live(&tcpdump, &interface, &filter, pipeline).await,
        Commands::Replay { path } => replay(&path, pipeline).await,
    };
    info!(
        "Duration: {:.4} seconds, {} label sets tracked",
        start.elapsed().as_secs_f64(),
        aggregator.len()
    );

    server_task.abort();
    result
}

async fn capture_live(
    binary: &str,
    interface: &str,
    filter: &str,
    pipeline: Pipeline<TcpdumpParser>,
) -> Result<(), anyhow::Error> {
    let mut child = capture::spawn_tcpdump(binary, interface, filter)?;
    let stdout = child
        .stdout
        .take()
        .context("tcpdump stdout was not piped")?;

    let pump_task = tokio::spawn(async move { pump(BufReader::new(stdout), &pipeline).await });

    info!("Waiting for Ctrl-C...");
    let exit_status = tokio::select! {
        res = signal::ctrl_c() => {
            res?;
            None
        }
        status = child.wait() => Some(status),
    };

    // Killing tcpdump closes its stdout, the pump then stops at its next read
    if exit_status.is_none() {
        debug!("Stopping {}", binary);
        if let Err(e) = child.kill().await {
            warn!("Failed to stop {}: {}", binary, e);
        }
    }

    let stats = pump_task.await.context("Pump task failed")?;
    log_stats(&stats);

    // tcpdump shares our process group, so a terminal Ctrl-C may reach it first
    match exit_status {
        Some(Ok(status)) => {
            warn!("{} exited with {}", binary, status);
            Ok(())
        }
        Some(Err(e)) => Err(anyhow::Error::new(e).context(format!("Failed to wait for {}", binary))),
        None => Ok(()),
    }
}

async fn replay(path: &str, pipeline: Pipeline<TcpdumpParser>) -> Result<(), anyhow::Error> {
    let stats = if path == "-" {
        pump(BufReader::new(tokio::io::stdin()), &pipeline).await
    } else {
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open capture transcript {}", path))?;
        pump(BufReader::new(file), &pipeline).await
    };
    log_stats(&stats);

    info!("Replay finished, serving metrics until Ctrl-C...");
    signal::ctrl_c().await?;
    Ok(())
}

fn log_stats(stats: &PumpStats) {
    info!(
        "Processed {} records: {} counted, {} skipped",
        stats.records, stats.flows, stats.skipped
    );
}
