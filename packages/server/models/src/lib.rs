#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the city-pulse server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the engine's entity types so the wire contract can evolve
//! independently; metric values are rounded to whole numbers here, as the
//! dashboard displays them.

use chrono::{DateTime, FixedOffset};
use city_pulse_ai::PredictionResult;
use city_pulse_simulation_models::{
    Alert, AlertCategory, AlertSeverity, AlertType, HistoricalPoint, MetricSample,
};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Live metric values for the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeMetrics {
    /// Traffic congestion percentage.
    pub traffic: i64,
    /// Air quality index.
    pub aqi: i64,
    /// Energy consumption percentage.
    pub energy: i64,
    /// When the sample was taken (ISO 8601, IST offset).
    pub timestamp: DateTime<FixedOffset>,
}

impl From<&MetricSample> for RealTimeMetrics {
    fn from(sample: &MetricSample) -> Self {
        Self {
            traffic: round(sample.traffic),
            aqi: round(sample.aqi),
            energy: round(sample.energy),
            timestamp: sample.timestamp,
        }
    }
}

/// Rounded predicted values for one timeframe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionSnapshot {
    /// Predicted traffic congestion percentage.
    pub traffic: i64,
    /// Predicted air quality index.
    pub aqi: i64,
    /// Predicted energy consumption percentage.
    pub energy: i64,
}

impl From<&PredictionResult> for PredictionSnapshot {
    fn from(result: &PredictionResult) -> Self {
        Self {
            traffic: round(result.predictions.traffic),
            aqi: round(result.predictions.aqi),
            energy: round(result.predictions.energy),
        }
    }
}

/// The 1-hour and 6-hour forecasts side by side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPredictions {
    /// Forecast one hour out.
    pub one_hour: PredictionSnapshot,
    /// Forecast six hours out.
    pub six_hours: PredictionSnapshot,
}

/// One historical chart entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalEntry {
    /// Local `HH:MM` label.
    pub time: String,
    /// Traffic congestion percentage.
    pub traffic: i64,
    /// Air quality index.
    pub aqi: i64,
    /// Energy consumption percentage.
    pub energy: i64,
}

impl From<&HistoricalPoint> for HistoricalEntry {
    fn from(point: &HistoricalPoint) -> Self {
        Self {
            time: point.time.clone(),
            traffic: round(point.traffic),
            aqi: round(point.aqi),
            energy: round(point.energy),
        }
    }
}

/// An alert as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAlert {
    /// Store-assigned alert id.
    pub id: String,
    /// Urgency tier.
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Metric family.
    pub category: AlertCategory,
    /// Human-readable description.
    pub message: String,
    /// Severity tier.
    pub severity: AlertSeverity,
    /// Local `HH:MM:SS` creation time.
    pub timestamp: String,
}

impl ApiAlert {
    /// Shapes an engine alert for the wire under the given identity.
    #[must_use]
    pub fn new(id: String, alert: &Alert) -> Self {
        Self {
            id,
            alert_type: alert.alert_type,
            category: alert.category,
            message: alert.message.clone(),
            severity: alert.severity,
            timestamp: alert.created_at.format("%H:%M:%S").to_string(),
        }
    }
}

/// Complete dashboard payload for one city.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Live metric values.
    pub real_time: RealTimeMetrics,
    /// The two forecasts.
    pub predictions: DashboardPredictions,
    /// Past 24 hours, oldest first.
    pub historical: Vec<HistoricalEntry>,
    /// Alerts raised from the live sample.
    pub alerts: Vec<ApiAlert>,
}

/// Query parameters for the recent-metrics endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsQueryParams {
    /// Maximum number of samples to return.
    pub limit: Option<usize>,
}

/// Values here are bounded well inside `i64` before rounding.
#[allow(clippy::cast_possible_truncation)]
fn round(value: f64) -> i64 {
    value.round() as i64
}
