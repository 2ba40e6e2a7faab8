mod api;
mod health;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use advisor_agent::AdvisorRuntime;
use advisor_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use advisor_core::CaseAnalysis;
use anyhow::Result;
use axum::Router;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "advisor-server", version, about = "HTTP API for the automation advisor")]
struct ServerArgs {
    /// Config file to load; it must exist when given.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bind_address: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    log_level: Option<String>,
    #[arg(long, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

impl ServerArgs {
    fn load_options(self) -> LoadOptions {
        LoadOptions {
            require_file: self.config.is_some(),
            config_path: self.config,
            overrides: ConfigOverrides {
                log_level: self.log_level,
                log_format: self.log_format,
                bind_address: self.bind_address,
                port: self.port,
            },
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse().map_err(|error: advisor_core::config::ConfigError| error.to_string())
}

fn init_logging(config: &AppConfig) {
    use advisor_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run(ServerArgs::parse().load_options()).await
}

async fn run(options: LoadOptions) -> Result<()> {
    let config = AppConfig::load(options)?;
    init_logging(&config);

    let analysis = CaseAnalysis::default();
    analysis.case.validate()?;

    let limits = api::SessionLimits::from_config(&config.server);
    let app = app(api::ApiState::new(AdvisorRuntime::for_case(analysis)).with_limits(limits));
    let address = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        max_sessions = limits.max_sessions,
        "advisor-server started"
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    wait_for_shutdown().await?;
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = config.server.graceful_shutdown_secs,
        "advisor-server stopping"
    );
    let _ = shutdown_tx.send(());

    let grace = Duration::from_secs(config.server.graceful_shutdown_secs);
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined??,
        Err(_) => tracing::warn!(
            event_name = "system.server.shutdown_timeout",
            correlation_id = "shutdown",
            "in-flight requests did not finish within the grace period"
        ),
    }

    Ok(())
}

fn app(state: api::ApiState) -> Router {
    health::router(Arc::new(state.analysis().clone())).merge(api::router(state))
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
