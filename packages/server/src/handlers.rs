//! HTTP handler functions for the city-pulse API.

use actix_web::{HttpResponse, web};
use city_pulse_ai::Timeframe;
use city_pulse_server_models::{
    ApiAlert, ApiHealth, DashboardPredictions, DashboardResponse, HistoricalEntry,
    MetricsQueryParams, PredictionSnapshot, RealTimeMetrics,
};
use city_pulse_simulation::alerts::evaluate_alerts;
use city_pulse_simulation::catalog;
use city_pulse_simulation::clock::ist_now;
use city_pulse_simulation::engine::DEFAULT_HISTORY_HOURS;

use crate::AppState;
use crate::storage::StoredPrediction;

/// Default number of samples returned by the recent-metrics endpoint.
const DEFAULT_METRICS_LIMIT: usize = 24;

/// Most active alerts ever returned in one response.
const MAX_ACTIVE_ALERTS: usize = 50;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/locations`
///
/// Returns the state → cities catalog the dashboard can request.
pub async fn locations() -> HttpResponse {
    let map: std::collections::BTreeMap<&str, Vec<&str>> = catalog::states_and_cities()
        .iter()
        .map(|(state, cities)| (*state, cities.to_vec()))
        .collect();
    HttpResponse::Ok().json(map)
}

/// `GET /api/dashboard/{state}/{city}`
///
/// The full dashboard payload: live sample, both forecasts, the 24-hour
/// trend, and any alerts the live sample raised.
pub async fn dashboard(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (state_name, city) = path.into_inner();

    if !catalog::is_known_city(&state_name, &city) {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("City {city} not found in state {state_name}")
        }));
    }

    let now = ist_now();

    // Synthesis is synchronous and CPU-bound; keep the engine lock away
    // from the await points below.
    let (sample, history) = {
        let mut engine = state
            .engine
            .lock()
            .expect("simulation engine mutex poisoned");
        let sample = engine.generate_current_at(&city, &state_name, now);
        let history = engine.generate_historical_at(&city, DEFAULT_HISTORY_HOURS, now);
        (sample, history)
    };

    // Both horizons run concurrently; latency is bounded by the slower
    // round-trip, not the sum.
    let (one_hour, six_hours) = tokio::join!(
        state
            .orchestrator
            .predict(&sample, &history, Timeframe::OneHour, now),
        state
            .orchestrator
            .predict(&sample, &history, Timeframe::SixHours, now),
    );

    let alerts = evaluate_alerts(&sample);

    // Store writes are fire-and-forget: a failed write is logged and the
    // dashboard is served regardless.
    if let Err(e) = state.store.record_sample(sample.clone()).await {
        log::warn!("Failed to store metrics for {city}: {e}");
    }
    for (timeframe, prediction) in [
        (Timeframe::OneHour, &one_hour),
        (Timeframe::SixHours, &six_hours),
    ] {
        let record = StoredPrediction {
            state: state_name.clone(),
            city: city.clone(),
            timeframe,
            prediction: prediction.clone(),
        };
        if let Err(e) = state.store.record_prediction(record).await {
            log::warn!("Failed to store {timeframe} prediction for {city}: {e}");
        }
    }

    let mut api_alerts = Vec::with_capacity(alerts.len());
    for alert in alerts {
        match state.store.record_alert(alert.clone()).await {
            Ok(stored) => api_alerts.push(ApiAlert::new(stored.id, &stored.alert)),
            Err(e) => {
                log::warn!("Failed to store alert for {city}: {e}");
                api_alerts.push(ApiAlert::new(uuid::Uuid::new_v4().to_string(), &alert));
            }
        }
    }

    HttpResponse::Ok().json(DashboardResponse {
        real_time: RealTimeMetrics::from(&sample),
        predictions: DashboardPredictions {
            one_hour: PredictionSnapshot::from(&one_hour),
            six_hours: PredictionSnapshot::from(&six_hours),
        },
        historical: history.iter().map(HistoricalEntry::from).collect(),
        alerts: api_alerts,
    })
}

/// `GET /api/metrics/{state}/{city}`
///
/// Recent stored samples for a city, newest first.
pub async fn recent_metrics(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    query: web::Query<MetricsQueryParams>,
) -> HttpResponse {
    let (state_name, city) = path.into_inner();
    let limit = query.limit.unwrap_or(DEFAULT_METRICS_LIMIT);

    match state.store.recent_samples(&state_name, &city, limit).await {
        Ok(samples) => HttpResponse::Ok().json(samples),
        Err(e) => {
            log::error!("Failed to query metrics for {city}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to get metrics"
            }))
        }
    }
}

/// `GET /api/alerts/{state}/{city}`
///
/// Active stored alerts for a city, newest first.
pub async fn active_alerts(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (state_name, city) = path.into_inner();

    match state.store.active_alerts(&state_name, &city).await {
        Ok(alerts) => {
            let api: Vec<ApiAlert> = alerts
                .into_iter()
                .take(MAX_ACTIVE_ALERTS)
                .map(|stored| ApiAlert::new(stored.id, &stored.alert))
                .collect();
            HttpResponse::Ok().json(api)
        }
        Err(e) => {
            log::error!("Failed to query alerts for {city}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to get alerts"
            }))
        }
    }
}
