//! HTTP service exposing the article, listing, detail and comment pipelines.

use std::path::PathBuf;

use clap::Parser;
use rs_fragments::{server, ServiceConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fragments-serve", version, about)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, env = "FRAGMENTS_CONFIG")]
    config: Option<PathBuf>,

    /// Socket address to bind, overriding the configuration.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match cli.config {
        Some(path) => ServiceConfig::from_toml_file(&path),
        None => Ok(ServiceConfig::default()),
    };
    let mut config = match config {
        Ok(config) => config.with_env_overrides(),
        Err(err) => {
            error!(error = %err, "failed to load configuration");
            std::process::exit(2);
        }
    };
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    if let Err(err) = server::serve(config).await {
        error!(error = %err, "server stopped");
        std::process::exit(1);
    }
}
