mod auth;
mod config;
mod logging;

use anyhow::{bail, Context, Result};
use axum::{middleware, Router};
use clap::Parser;
use sea_orm::{ConnectOptions, Database};
use server_settings::domain::RuntimeConfig;
use server_settings::ServerSettingsModule;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::auth::AdminCredentials;
use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "config/appsettings.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;
    let settings_config = config.modules.server_settings.clone();

    let (level_switch, _log_guard) =
        logging::init(&config.logging, &settings_config.log_directory)?;
    info!(config = %args.config.display(), "Starting shelfspot server");

    let mut options = ConnectOptions::new(config.database.url.clone());
    options.sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to {}", config.database.url))?;

    let module = Arc::new(ServerSettingsModule::new(settings_config.clone()));
    module.migrate(&db).await?;
    module.init(Arc::new(db), Arc::new(level_switch)).await?;

    let runtime = module.config_store()?.snapshot();
    let app = build_router(&module, &config, &runtime)?;

    let cancel = CancellationToken::new();
    let background = tokio::spawn(module.clone().serve(cancel.clone()));

    let addresses = bind_addresses(&runtime, settings_config.containerized, config.server.listen);
    let listeners = bind_all(&addresses).await?;

    let mut servers = JoinSet::new();
    for listener in listeners {
        let app = app.clone();
        let cancel = cancel.clone();
        servers.spawn(async move {
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(cancel.cancelled_owned())
                .await
        });
    }

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for shutdown signal")?;
            info!("Shutdown requested");
        }
        Some(result) = servers.join_next() => {
            if let Ok(Err(e)) = result {
                error!(error = %e, "Listener stopped unexpectedly");
            }
        }
    }

    cancel.cancel();
    while servers.join_next().await.is_some() {}
    match background.await {
        Ok(Err(e)) => error!(error = %e, "Server settings module failed"),
        Err(e) => error!(error = %e, "Server settings task panicked"),
        Ok(Ok(())) => {}
    }

    info!("Shelfspot server stopped");
    Ok(())
}

fn build_router(
    module: &ServerSettingsModule,
    config: &AppConfig,
    runtime: &RuntimeConfig,
) -> Result<Router> {
    let admin = Arc::new(AdminCredentials {
        token: config.server.admin_token.clone(),
        email: config.server.admin_email.clone(),
    });
    if admin.token.trim().is_empty() {
        warn!("No admin token configured, administrative endpoints are unreachable");
    }

    let api = module
        .register_rest(Router::new())?
        .layer(middleware::from_fn_with_state(admin, auth::identify_caller));

    let base = runtime.base_url.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        info!(base_url = %runtime.base_url, "Serving under base url");
        Router::new().nest(base, api)
    };
    Ok(router.layer(TraceLayer::new_for_http()))
}

/// Socket addresses to listen on. Inside a container the bind settings are
/// owned by the environment and the configured listen address wins.
fn bind_addresses(runtime: &RuntimeConfig, containerized: bool, listen: SocketAddr) -> Vec<SocketAddr> {
    if containerized {
        return vec![listen];
    }

    runtime
        .ip_addresses
        .split(',')
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .filter_map(|ip| match ip.parse::<IpAddr>() {
            Ok(ip) => Some(SocketAddr::new(ip, runtime.port)),
            Err(_) => {
                warn!(%ip, "Ignoring invalid bind address");
                None
            }
        })
        .collect()
}

/// Bind every address, skipping the ones that fail. `::` and `0.0.0.0` on
/// the same port collide on dual-stack hosts, so a single failure is not
/// fatal.
async fn bind_all(addresses: &[SocketAddr]) -> Result<Vec<TcpListener>> {
    let mut listeners = Vec::with_capacity(addresses.len());
    for addr in addresses {
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                info!(%addr, "Listening");
                listeners.push(listener);
            }
            Err(e) => warn!(%addr, error = %e, "Failed to bind address"),
        }
    }

    if listeners.is_empty() {
        bail!("no listen address could be bound: {:?}", addresses);
    }
    Ok(listeners)
}
