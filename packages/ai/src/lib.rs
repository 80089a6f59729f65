#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Metric prediction via an external LLM with a deterministic fallback.
//!
//! The orchestrator builds a domain prompt from the current sample and the
//! recent trend, sends it through an [`providers::LlmProvider`] backend,
//! and validates the JSON answer into a [`PredictionResult`]. Any failure
//! along that path — transport, auth, malformed output — is absorbed and
//! answered by the rule-based predictor instead, so prediction itself
//! never fails.

pub mod orchestrator;
pub mod providers;
pub mod rules;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to an LLM backend.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to the LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// Horizon of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// One hour ahead.
    #[serde(rename = "1hour")]
    OneHour,
    /// Six hours ahead.
    #[serde(rename = "6hours")]
    SixHours,
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneHour => write!(f, "1hour"),
            Self::SixHours => write!(f, "6hours"),
        }
    }
}

/// Which pipeline produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    /// The external LLM answered and validated.
    Ai,
    /// The deterministic rule-based predictor answered.
    Fallback,
}

/// Predicted metric values.
///
/// Always within the documented bounds, regardless of what the upstream
/// model answered: traffic and energy in `[0, 100]`, AQI at least the
/// background floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionValues {
    /// Predicted traffic congestion percentage.
    pub traffic: f64,
    /// Predicted air quality index.
    pub aqi: f64,
    /// Predicted energy consumption percentage.
    pub energy: f64,
}

/// The outcome of a prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted values, clamped to their bounds.
    pub predictions: PredictionValues,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Short natural-language justification.
    pub reasoning: String,
    /// Which pipeline produced the result.
    pub source: PredictionSource,
}
