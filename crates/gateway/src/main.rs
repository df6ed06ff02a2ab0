use std::sync::Arc;

use anyhow::Context;
use axum::http::Method;
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use sp_crm::RestCrmClient;
use sp_domain::config::Config;
use sp_gateway::api;
use sp_gateway::state::AppState;
use sp_providers::GoogleClient;

#[derive(Parser)]
#[command(name = "salespilot", about = "CRM sales-assistant gateway", version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "salespilot.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the gateway server (default).
    Serve,
    /// Inspect or validate the configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print the version and exit.
    Version,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as TOML.
    Show,
    /// Check that the configuration file parses and exit non-zero if not.
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Default to serve when no subcommand is given.
        None | Some(Command::Serve) => {
            init_tracing();
            let config = load_config(&cli.config)?;
            run_server(Arc::new(config)).await
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let config = load_config(&cli.config)?;
            let rendered = toml::to_string_pretty(&config).context("rendering configuration")?;
            println!("{rendered}");
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            match load_config(&cli.config) {
                Ok(_) => {
                    println!("{}: OK", cli.config);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("{}: {e:#}", cli.config);
                    std::process::exit(1);
                }
            }
        }
        Some(Command::Version) => {
            println!("salespilot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize structured JSON tracing for the serve command.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sp_gateway=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Load the configuration file, falling back to built-in defaults when
/// the file does not exist.  A file that exists but fails to parse is an
/// error, never a silent fallback.
fn load_config(path: &str) -> anyhow::Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(raw) => toml::from_str(&raw).with_context(|| format!("parsing {path}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e).with_context(|| format!("reading {path}")),
    }
}

/// Start the gateway server with the given configuration.
async fn run_server(config: Arc<Config>) -> anyhow::Result<()> {
    tracing::info!("SalesPilot starting");

    let crm = RestCrmClient::new(&config.crm).context("building CRM client")?;
    let llm = GoogleClient::from_config(&config.llm).context("building model client")?;

    let state = AppState {
        config: config.clone(),
        crm: Arc::new(crm),
        llm: Arc::new(llm),
    };

    // The gateway sits behind the CRM frontend, which may live on any
    // local dev port, so CORS stays permissive.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    tracing::info!(addr = %addr, model = %config.llm.model, "SalesPilot listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum server error")?;

    tracing::info!("shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM, then return to trigger graceful shutdown
/// of the Axum server.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        tracing::info!("received SIGINT, shutting down");
    }
}
