use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

use arena_gate::config::{Config, LoggingConfig};
use arena_gate::services::LocaleGate;
use arena_gate::{AppState, build_router};

/// Locale & access gate for the arena web app
#[derive(Debug, Parser)]
#[command(name = "arena-gate", version, about)]
struct Args {
    /// Path to config.toml (default: conf/config.toml or ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = load_config(args.config.as_deref(), std::io::stderr)?;
    let _guard = init_logging(&config.logging)?;

    let gate = LocaleGate::from_config(&config)?;
    if !gate.identity_enabled() {
        tracing::warn!(
            "Running without an identity provider: protected paths {:?} are open",
            config.gate.protected_paths
        );
        tracing::warn!("Set APP_IDENTITY_URL and APP_IDENTITY_ANON_KEY for production use");
    }
    let app = build_router(Arc::new(AppState::new(gate)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("arena-gate listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

/// Load the configuration under a plain bootstrap subscriber.
///
/// The configured subscriber depends on the config itself, so defaults and
/// env override notices go to `writer` at info level instead.
fn load_config<W>(path: Option<&Path>, writer: W) -> anyhow::Result<Config>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let bootstrap = fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(bootstrap, || Config::load(path))
}

fn init_logging(logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&logging.level)
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let (file_layer, guard) = match &logging.file {
        Some(file) => {
            let path = std::path::Path::new(file);
            let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(std::path::Path::new("."));
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("arena-gate.log");
            let appender = tracing_appender::rolling::daily(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
