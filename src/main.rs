use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use iptv_aggregator::{
    config::Config,
    inputs::validate_source_configs,
    services::{AggregationService, RunCoordinator},
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "iptv-aggregator")]
#[command(version)]
#[command(about = "Aggregates IPTV subscriptions into canonical M3U and TXT playlists")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Log level
    #[arg(short = 'v', long, default_value = "info", global = true)]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Run one aggregation and exit (default)
    Run,
    /// Serve the playlists over HTTP and accept update triggers
    Serve {
        /// Listening IP address
        #[arg(short = 'H', long, value_name = "IP")]
        host: Option<String>,

        /// Listening port
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,
    },
    /// Check the input files and exit
    Validate,
    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing(level: &str, format: LogFormat) {
    let log_filter = if level == "trace" {
        format!("iptv_aggregator={level},tower_http=trace")
    } else {
        format!("iptv_aggregator={level}")
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    info!("Starting IPTV aggregator v{}", env!("CARGO_PKG_VERSION"));
    let mut config = Config::load(Some(&cli.config))?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let service = AggregationService::from_config(&config)?;
            let report = service.run().await?;
            if report.outputs_written {
                info!(
                    "Done: {} channels, {} streams",
                    report.channel_count, report.stream_count
                );
            } else {
                warn!("Done: no channels aggregated, no files written");
            }
        }
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.web.host = host;
            }
            if let Some(port) = port {
                config.web.port = port;
            }
            serve(config).await?;
        }
        Command::Validate => {
            let summary = validate_source_configs(&config.sources);
            println!("{}", serde_json::to_string_pretty(&summary)?);
            if summary.has_errors {
                anyhow::bail!("{} input file error(s)", summary.errors.len());
            }
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let aggregation = Arc::new(AggregationService::from_config(&config)?);
    let coordinator = RunCoordinator::new();

    if config.web.update_on_start {
        let guard = coordinator.try_begin()?;
        let service = aggregation.clone();
        tokio::spawn(async move {
            let result = service.run().await;
            if let Err(e) = &result {
                error!("Startup aggregation failed: {}", e);
            }
            guard.finish(&result);
        });
    }

    let web_server = WebServer::new(AppState {
        config: Arc::new(config),
        aggregation,
        coordinator,
    })?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;
    Ok(())
}
