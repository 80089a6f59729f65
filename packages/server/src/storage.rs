//! Hosting-layer persistence collaborator.
//!
//! The engine and the orchestrator never store anything themselves; the
//! handlers hand finished samples, predictions, and alerts to a
//! [`DashboardStore`] and discard any failure. Production deployments put
//! a document store behind this trait; the built-in implementation keeps
//! a bounded in-memory window, which is enough for the recent-metrics and
//! active-alerts endpoints.

use city_pulse_ai::{PredictionResult, Timeframe};
use city_pulse_simulation_models::{Alert, MetricSample};
use thiserror::Error;
use tokio::sync::RwLock;

/// Records kept per entity kind before the oldest are dropped.
const MAX_RECORDS: usize = 1000;

/// Errors from a dashboard store backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend rejected or lost the write.
    #[error("Storage backend error: {message}")]
    Backend {
        /// Description of what went wrong.
        message: String,
    },
}

/// A stored alert with its assigned identity.
#[derive(Debug, Clone)]
pub struct StoredAlert {
    /// Store-assigned id.
    pub id: String,
    /// The alert as raised by the engine.
    pub alert: Alert,
}

/// A stored prediction with the request context it answered.
#[derive(Debug, Clone)]
pub struct StoredPrediction {
    /// State the prediction was requested for.
    pub state: String,
    /// City the prediction was requested for.
    pub city: String,
    /// Forecast horizon.
    pub timeframe: Timeframe,
    /// The prediction itself.
    pub prediction: PredictionResult,
}

/// Persistence seam for dashboard entities.
#[async_trait::async_trait]
pub trait DashboardStore: Send + Sync {
    /// Records a synthesized sample.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    async fn record_sample(&self, sample: MetricSample) -> Result<(), StorageError>;

    /// Records a finished prediction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    async fn record_prediction(&self, prediction: StoredPrediction) -> Result<(), StorageError>;

    /// Records an alert and assigns it an identity.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    async fn record_alert(&self, alert: Alert) -> Result<StoredAlert, StorageError>;

    /// Returns up to `limit` recent samples for a city, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    async fn recent_samples(
        &self,
        state: &str,
        city: &str,
        limit: usize,
    ) -> Result<Vec<MetricSample>, StorageError>;

    /// Returns the active alerts for a city, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    async fn active_alerts(&self, state: &str, city: &str)
    -> Result<Vec<StoredAlert>, StorageError>;
}

/// In-memory store with bounded retention per entity kind.
#[derive(Default)]
pub struct InMemoryStore {
    samples: RwLock<Vec<MetricSample>>,
    predictions: RwLock<Vec<StoredPrediction>>,
    alerts: RwLock<Vec<StoredAlert>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn push_bounded<T>(records: &mut Vec<T>, record: T) {
    records.push(record);
    if records.len() > MAX_RECORDS {
        let excess = records.len() - MAX_RECORDS;
        records.drain(..excess);
    }
}

#[async_trait::async_trait]
impl DashboardStore for InMemoryStore {
    async fn record_sample(&self, sample: MetricSample) -> Result<(), StorageError> {
        push_bounded(&mut *self.samples.write().await, sample);
        Ok(())
    }

    async fn record_prediction(&self, prediction: StoredPrediction) -> Result<(), StorageError> {
        push_bounded(&mut *self.predictions.write().await, prediction);
        Ok(())
    }

    async fn record_alert(&self, alert: Alert) -> Result<StoredAlert, StorageError> {
        let stored = StoredAlert {
            id: uuid::Uuid::new_v4().to_string(),
            alert,
        };
        push_bounded(&mut *self.alerts.write().await, stored.clone());
        Ok(stored)
    }

    async fn recent_samples(
        &self,
        state: &str,
        city: &str,
        limit: usize,
    ) -> Result<Vec<MetricSample>, StorageError> {
        let samples = self.samples.read().await;
        Ok(samples
            .iter()
            .rev()
            .filter(|s| s.state == state && s.city == city)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn active_alerts(
        &self,
        state: &str,
        city: &str,
    ) -> Result<Vec<StoredAlert>, StorageError> {
        let alerts = self.alerts.read().await;
        Ok(alerts
            .iter()
            .rev()
            .filter(|s| s.alert.state == state && s.alert.city == city && s.alert.is_active)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone, Timelike};
    use city_pulse_simulation_models::{AlertCategory, AlertSeverity, AlertType, MetricSource};

    fn sample_at(city: &str, hour: u32) -> MetricSample {
        MetricSample {
            state: "Maharashtra".to_string(),
            city: city.to_string(),
            traffic: 50.0,
            aqi: 150.0,
            energy: 50.0,
            timestamp: FixedOffset::east_opt(19800)
                .unwrap()
                .with_ymd_and_hms(2025, 8, 7, hour, 0, 0)
                .unwrap(),
            source: MetricSource::Sensor,
        }
    }

    #[tokio::test]
    async fn recent_samples_are_newest_first_and_limited() {
        let store = InMemoryStore::new();
        for hour in 8..12 {
            store.record_sample(sample_at("Mumbai", hour)).await.unwrap();
        }
        store.record_sample(sample_at("Pune", 12)).await.unwrap();

        let recent = store.recent_samples("Maharashtra", "Mumbai", 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].timestamp.hour(), 11);
        assert_eq!(recent[1].timestamp.hour(), 10);
        assert!(recent[1].timestamp + Duration::hours(1) == recent[0].timestamp);
    }

    #[tokio::test]
    async fn alerts_get_unique_ids_and_filter_by_city() {
        let store = InMemoryStore::new();
        let alert = Alert {
            state: "Maharashtra".to_string(),
            city: "Mumbai".to_string(),
            alert_type: AlertType::Warning,
            category: AlertCategory::Traffic,
            message: "Heavy traffic congestion detected in Mumbai.".to_string(),
            severity: AlertSeverity::High,
            is_active: true,
            created_at: sample_at("Mumbai", 9).timestamp,
            resolved_at: None,
        };

        let first = store.record_alert(alert.clone()).await.unwrap();
        let second = store.record_alert(alert).await.unwrap();
        assert_ne!(first.id, second.id);

        let active = store.active_alerts("Maharashtra", "Mumbai").await.unwrap();
        assert_eq!(active.len(), 2);
        assert!(store.active_alerts("Karnataka", "Bangalore").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn retention_is_bounded() {
        let store = InMemoryStore::new();
        for _ in 0..(MAX_RECORDS + 10) {
            store.record_sample(sample_at("Mumbai", 9)).await.unwrap();
        }
        let all = store
            .recent_samples("Maharashtra", "Mumbai", MAX_RECORDS + 10)
            .await
            .unwrap();
        assert_eq!(all.len(), MAX_RECORDS);
    }
}
