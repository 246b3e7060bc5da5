mod cli;
mod error;
mod server;

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use uapx_core::{Catalogue, Collector, SshFetcher};

use crate::cli::Cli;
use crate::error::CliError;
use crate::server::AppState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(&cli);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = uapx_config::load(&cli.config).map_err(|source| {
        error!(path = %cli.config.display(), error = %source, "cannot read config file");
        CliError::Config {
            path: cli.config.display().to_string(),
            source,
        }
    })?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        devices = config.devices.len(),
        timeout_secs = config.timeout.as_secs(),
        "starting unifi-ap-exporter"
    );

    let port = config.listen_port;
    let fetcher = SshFetcher::new(config.timeout);
    let state = AppState {
        collector: Collector::new(Arc::new(config), fetcher),
        catalogue: Arc::new(Catalogue::new()?),
    };

    server::serve(port, state).await
}
