use anyhow::{Context, Result};
use clap::Parser;
use hr_forecast::ArtifactFile;
use hr_service::api::run_api_server;
use hr_service::config::{deployment_root, Config, DEFAULT_CONFIG_FILE};
use hr_service::{ForecastHandler, ModelCache};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "heartcast-serve")]
#[command(about = "Serve heart-rate forecasts over HTTP")]
struct Cli {
    /// Config file; defaults to heartcast.toml in the deployment root
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the listen address
    #[arg(long)]
    host: Option<String>,
    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(cli: &Cli, root: &Path) -> Result<Config> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| root.join(DEFAULT_CONFIG_FILE));

    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(host) = &cli.host {
        config.api.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.api.port = port;
    }
    Ok(config)
}

async fn run(config: Config, root: PathBuf) -> Result<()> {
    let artifact = ArtifactFile::new(config.model_path(&root));
    info!(
        root = %root.display(),
        model = %artifact.path().display(),
        "Starting forecast service"
    );

    let cache = Arc::new(ModelCache::new(artifact));
    let handler = Arc::new(ForecastHandler::new(cache));

    run_api_server(&config.api, handler)
        .await
        .context("running API server")?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let root = deployment_root();

    let config = match load_config(&cli, &root) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config);

    if let Err(e) = run(config, root).await {
        error!(error = ?e, "Service failed");
        std::process::exit(1);
    }
}
