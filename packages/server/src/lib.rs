#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the city-pulse dashboard.
//!
//! Serves the REST API the dashboard frontend polls: live synthesized
//! metrics, 1-hour and 6-hour forecasts, the 24-hour trend, and threshold
//! alerts, per city. Samples, predictions, and alerts are handed to the
//! dashboard store as they are produced; a store failure never affects a
//! response.

mod handlers;
pub mod storage;

use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use city_pulse_ai::orchestrator::PredictionOrchestrator;
use city_pulse_ai::providers;
use city_pulse_simulation::SimulationEngine;

use crate::storage::{DashboardStore, InMemoryStore};

/// Shared application state.
pub struct AppState {
    /// Metric synthesizer. The noise source needs `&mut`, so handlers
    /// take a brief lock for the synchronous synthesis step.
    pub engine: Mutex<SimulationEngine>,
    /// Prediction pipeline: LLM when configured, rule-based fallback
    /// always.
    pub orchestrator: PredictionOrchestrator,
    /// Persistence collaborator for finished entities.
    pub store: Arc<dyn DashboardStore>,
}

/// Starts the city-pulse API server.
///
/// Builds the LLM provider from the environment (a missing or
/// misconfigured provider degrades predictions to the rule-based
/// fallback rather than aborting), then starts the Actix-Web HTTP
/// server. This is a regular async function — the caller is responsible
/// for providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let provider = match providers::create_provider_from_env() {
        Ok(provider) => Some(provider),
        Err(e) => {
            log::warn!("No usable AI provider ({e}); predictions will use the rule-based fallback");
            None
        }
    };

    let state = web::Data::new(AppState {
        engine: Mutex::new(SimulationEngine::new()),
        orchestrator: PredictionOrchestrator::new(provider),
        store: Arc::new(InMemoryStore::new()),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/locations", web::get().to(handlers::locations))
                    .route(
                        "/dashboard/{state}/{city}",
                        web::get().to(handlers::dashboard),
                    )
                    .route(
                        "/metrics/{state}/{city}",
                        web::get().to(handlers::recent_metrics),
                    )
                    .route(
                        "/alerts/{state}/{city}",
                        web::get().to(handlers::active_alerts),
                    ),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
