//! Threshold alert evaluation.
//!
//! A stateless pass over a finished sample: each metric family is checked
//! against its thresholds high-to-low, so at most one alert per category
//! is raised and the highest tier wins. Message text is fixed per
//! category, parameterized only by city.

use city_pulse_simulation_models::{Alert, AlertCategory, AlertSeverity, AlertType, MetricSample};

/// Traffic congestion above this raises a warning.
const TRAFFIC_WARN: f64 = 80.0;
/// Traffic congestion above this is high severity.
const TRAFFIC_HIGH: f64 = 90.0;
/// AQI above this is unhealthy.
const AQI_WARN: f64 = 150.0;
/// AQI above this is hazardous.
const AQI_DANGER: f64 = 200.0;
/// Energy demand above this is elevated.
const ENERGY_INFO: f64 = 70.0;
/// Energy demand above this is peak load.
const ENERGY_HIGH: f64 = 85.0;

/// Evaluates a sample against the alert thresholds.
///
/// Pure and deterministic: identical samples produce identical alerts.
/// Returns at most one alert per category.
#[must_use]
pub fn evaluate_alerts(sample: &MetricSample) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if sample.traffic > TRAFFIC_WARN {
        let severity = if sample.traffic > TRAFFIC_HIGH {
            AlertSeverity::High
        } else {
            AlertSeverity::Medium
        };
        alerts.push(alert(
            sample,
            AlertType::Warning,
            AlertCategory::Traffic,
            severity,
            format!(
                "Heavy traffic congestion detected in {}. Consider alternate routes.",
                sample.city
            ),
        ));
    }

    if sample.aqi > AQI_DANGER {
        alerts.push(alert(
            sample,
            AlertType::Danger,
            AlertCategory::Pollution,
            AlertSeverity::High,
            format!(
                "Air quality very poor in {}. Avoid outdoor activities.",
                sample.city
            ),
        ));
    } else if sample.aqi > AQI_WARN {
        alerts.push(alert(
            sample,
            AlertType::Warning,
            AlertCategory::Pollution,
            AlertSeverity::Medium,
            format!(
                "Air quality unhealthy in {}. Limit outdoor exposure.",
                sample.city
            ),
        ));
    }

    if sample.energy > ENERGY_HIGH {
        alerts.push(alert(
            sample,
            AlertType::Warning,
            AlertCategory::Energy,
            AlertSeverity::High,
            format!(
                "Very high energy demand in {}. Peak load conditions.",
                sample.city
            ),
        ));
    } else if sample.energy > ENERGY_INFO {
        alerts.push(alert(
            sample,
            AlertType::Info,
            AlertCategory::Energy,
            AlertSeverity::Medium,
            format!(
                "High energy demand in {}. Consider energy conservation.",
                sample.city
            ),
        ));
    }

    alerts
}

fn alert(
    sample: &MetricSample,
    alert_type: AlertType,
    category: AlertCategory,
    severity: AlertSeverity,
    message: String,
) -> Alert {
    Alert {
        state: sample.state.clone(),
        city: sample.city.clone(),
        alert_type,
        category,
        message,
        severity,
        is_active: true,
        created_at: sample.timestamp,
        resolved_at: None,
    }
}
