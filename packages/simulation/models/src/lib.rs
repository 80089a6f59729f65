#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Metric sample, alert, and baseline data types for the city-pulse system.
//!
//! This crate defines the canonical entity types shared by the simulation
//! engine, the prediction pipeline, and the API server. Metric values are
//! always kept within their documented bounds: traffic and energy
//! percentages in `[0, 100]`, AQI at or above the regional background
//! floor. The clamping helpers here are the single place those bounds are
//! enforced.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lowest AQI value the system ever reports. Indian metros hold a regional
/// background level even on the cleanest days.
pub const AQI_FLOOR: f64 = 50.0;

/// Clamps a percentage metric into `[0, 100]`.
#[must_use]
pub fn clamp_percentage(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Clamps an AQI value to the background floor.
#[must_use]
pub fn clamp_aqi(value: f64) -> f64 {
    value.max(AQI_FLOOR)
}

/// Steady-state reference values for a city before temporal adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CityBaseline {
    /// Typical traffic congestion percentage.
    pub traffic: f64,
    /// Typical air quality index.
    pub aqi: f64,
    /// Typical energy consumption percentage.
    pub energy: f64,
}

/// Where a metric sample came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MetricSource {
    /// Synthesized live sensor reading.
    Sensor,
    /// Produced by the prediction pipeline.
    Predicted,
    /// Entered by an operator.
    Manual,
}

/// A single synthesized sensor reading for one city.
///
/// Immutable once produced; the bounds invariants hold for every instance
/// the engine emits regardless of baseline or noise draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// State the city belongs to.
    pub state: String,
    /// City name.
    pub city: String,
    /// Traffic congestion percentage, `[0, 100]`.
    pub traffic: f64,
    /// Air quality index, at least [`AQI_FLOOR`].
    pub aqi: f64,
    /// Energy consumption percentage, `[0, 100]`.
    pub energy: f64,
    /// When the sample was taken (IST wall clock).
    pub timestamp: DateTime<FixedOffset>,
    /// Provenance of the reading.
    pub source: MetricSource,
}

/// One point in a synthesized historical series.
///
/// A series spans N hours with strictly increasing timestamps exactly one
/// hour apart, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// Local wall-clock label, `HH:MM`.
    pub time: String,
    /// Traffic congestion percentage, `[0, 100]`.
    pub traffic: f64,
    /// Air quality index, at least [`AQI_FLOOR`].
    pub aqi: f64,
    /// Energy consumption percentage, `[0, 100]`.
    pub energy: f64,
    /// Full timestamp of the point.
    pub timestamp: DateTime<FixedOffset>,
}

/// Urgency tier of an alert.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertType {
    /// Conditions worth acting on.
    Warning,
    /// Hazardous conditions.
    Danger,
    /// Advisory only.
    Info,
}

/// Which metric family an alert belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertCategory {
    /// Traffic congestion.
    Traffic,
    /// Air quality.
    Pollution,
    /// Energy demand.
    Energy,
}

/// Severity of an alert.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertSeverity {
    /// Minor deviation.
    Low,
    /// Elevated readings.
    Medium,
    /// Threshold well exceeded.
    High,
}

/// A threshold alert raised from a metric sample.
///
/// The engine only creates alerts; identity assignment, deactivation, and
/// resolution belong to the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// State the city belongs to.
    pub state: String,
    /// City the alert applies to.
    pub city: String,
    /// Urgency tier.
    pub alert_type: AlertType,
    /// Metric family.
    pub category: AlertCategory,
    /// Human-readable description, parameterized only by city.
    pub message: String,
    /// Severity tier.
    pub severity: AlertSeverity,
    /// Whether the alert is still active. Always `true` at creation.
    pub is_active: bool,
    /// When the alert was raised (the evaluated sample's timestamp).
    pub created_at: DateTime<FixedOffset>,
    /// When the alert was resolved, if ever. Always `None` at creation.
    pub resolved_at: Option<DateTime<FixedOffset>>,
}
