#![forbid(unsafe_code)]

mod auth;
mod config;
mod export;
mod match_service;
mod models;
mod repository;
mod web;

use std::{process::exit, sync::Arc};

use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::AppConfig;
use match_service::MatchService;
use repository::{setup_database, SubmissionRepository, VisibilityRepository};
use web::AppState;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        warn!("Could not load config from .env file: {err}");
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(
                    "crush_match=info"
                        .parse()
                        .expect("Hard-coded default directive should be correct"),
                )
                .from_env_lossy(),
        )
        .init();

    let app_config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load app config: {err}");
            exit(255);
        }
    };

    let db_pool = match setup_database(&app_config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Could not setup database: {err}");
            exit(255);
        }
    };

    let submission_repository = Arc::new(SubmissionRepository::new(db_pool.clone()));
    let visibility_repository = Arc::new(VisibilityRepository::new(db_pool.clone()));

    let app_state = AppState {
        match_service: Arc::new(MatchService::new(
            submission_repository.clone(),
            visibility_repository.clone(),
        )),
        submission_repository,
        visibility_repository,
        admin_policy: Arc::new(app_config.admin_policy()),
    };

    let address = app_config.bind_address();
    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Could not bind to {address}: {err}");
            exit(255);
        }
    };

    info!("Listening on {address}");

    if let Err(err) = axum::serve(listener, web::router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server failed: {err}");
    }

    db_pool.close().await;
    info!("Shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Could not listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Could not listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl-C received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}
