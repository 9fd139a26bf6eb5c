use nbsim::{bench_step, serve, AppConfig, AppState, Parameters};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML configuration file; built-in defaults when omitted
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,

    /// Time the integration step across body counts and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.file {
        Some(path) => AppConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nbsim=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let params = Parameters::from(config.parameters.clone());

    if args.bench {
        bench_step(&params);
        return Ok(());
    }

    info!(
        tick_ms = params.h0 * 1e3,
        max_bodies = params.max_bodies,
        baseline_g = params.G,
        "simulation ready"
    );
    let state = AppState::new(params, config.server.broadcast_capacity);
    serve(&config.server, state).await.context("server failed")?;

    Ok(())
}
