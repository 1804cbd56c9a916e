pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod domain;
pub mod models;
pub mod services;

use anyhow::Context;
use clap::CommandFactory;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn init_metrics(config: &Config) -> anyhow::Result<Option<PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    use metrics_exporter_prometheus::PrometheusBuilder;
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics recorder initialized");
    Ok(Some(handle))
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if matches!(command, Commands::InitConfig) {
        if Config::create_default_if_missing()? {
            println!("Created config.toml with default settings");
        } else {
            println!("config.toml already exists");
        }
        return Ok(());
    }

    config.validate()?;
    let prometheus_handle = match command {
        Commands::Serve => init_metrics(&config)?,
        _ => None,
    };

    let default_language = config.site.default_language.clone();
    let state = api::create_app_state_from_config(config, prometheus_handle)?;

    match command {
        Commands::Serve => run_server(state).await,
        Commands::Search { query, lang } => {
            let lang = lang.unwrap_or(default_language);
            cli::cmd_search(&state, &query.join(" "), &lang).await
        }
        Commands::Breadcrumb { id, lang } => {
            let lang = lang.unwrap_or(default_language);
            cli::cmd_breadcrumb(&state, &id, &lang).await
        }
        Commands::Sitemap { output } => cli::cmd_sitemap(&state, output.as_deref()).await,
        Commands::Check => cli::cmd_check(&state).await,
        Commands::InitConfig => Ok(()),
    }
}

async fn run_server(state: std::sync::Arc<api::AppState>) -> anyhow::Result<()> {
    info!("Belpaese v{} starting...", env!("CARGO_PKG_VERSION"));

    if !state.config().server.enabled {
        anyhow::bail!("The HTTP server is disabled in the config");
    }

    let port = state.config().server.port;
    let app = api::router(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
