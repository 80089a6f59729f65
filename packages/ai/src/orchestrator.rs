//! Prediction orchestration: prompt building, LLM invocation, validation.
//!
//! The orchestrator is the only component that talks to the external
//! predictor. Its public contract is infallible: whatever the provider
//! does — refuse, time out, answer prose instead of JSON — the caller
//! gets a usable, in-bounds [`PredictionResult`].

use chrono::{DateTime, FixedOffset, Timelike};
use city_pulse_simulation_models::{HistoricalPoint, MetricSample, clamp_aqi, clamp_percentage};

use crate::providers::LlmProvider;
use crate::rules::RuleBasedPredictor;
use crate::{AiError, PredictionResult, PredictionSource, PredictionValues, Timeframe};

/// How many of the most recent historical points are quoted in the prompt.
const TREND_POINTS: usize = 6;

/// Confidence assumed when the model omits one.
const DEFAULT_CONFIDENCE: f64 = 0.75;

/// Analyst persona sent as the system prompt on every request.
const SYSTEM_PERSONA: &str = r#"You are an expert smart city data analyst specializing in Indian urban environments.
You analyze real-time traffic, air quality (AQI), and energy consumption patterns to provide accurate predictions.

Your expertise includes:
- Indian traffic patterns (rush hours 8-10 AM, 6-9 PM)
- Seasonal AQI variations (winter pollution spikes, monsoon improvements)
- Energy consumption patterns (evening peaks, cooling load in summer)
- City-specific characteristics (Mumbai traffic, Delhi pollution, Bangalore tech hubs)

Always respond with valid JSON containing predictions and confidence scores.
Consider factors like:
- Time of day and day of week
- Historical trends
- Seasonal patterns
- City-specific behaviors

Response format:
{
    "predictions": {
        "traffic": <0-100>,
        "aqi": <positive number>,
        "energy": <0-100>
    },
    "confidence": <0.0-1.0>,
    "reasoning": "<brief explanation>"
}"#;

/// Drives predictions through an LLM backend with a rule-based fallback.
///
/// Holds the provider handle (if one is configured) and the fallback
/// predictor. Without a provider every prediction is answered by the
/// rules directly.
pub struct PredictionOrchestrator {
    provider: Option<Box<dyn LlmProvider>>,
    rules: RuleBasedPredictor,
}

impl PredictionOrchestrator {
    /// Creates an orchestrator around an optional provider handle.
    #[must_use]
    pub fn new(provider: Option<Box<dyn LlmProvider>>) -> Self {
        Self {
            provider,
            rules: RuleBasedPredictor,
        }
    }

    /// Predicts metrics for the sample's city over `timeframe`.
    ///
    /// `now` is the IST wall-clock time the prediction is anchored to;
    /// it drives the prompt context, the session identity, and the
    /// fallback's hour bands. Never fails: any provider or parsing
    /// failure is answered by the rule-based predictor instead.
    pub async fn predict(
        &self,
        current: &MetricSample,
        history: &[HistoricalPoint],
        timeframe: Timeframe,
        now: DateTime<FixedOffset>,
    ) -> PredictionResult {
        let Some(provider) = self.provider.as_deref() else {
            return self.rules.predict(current, timeframe, now.hour());
        };

        match ask_model(provider, current, history, timeframe, now).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!(
                    "AI prediction failed for {} ({timeframe}): {e}",
                    current.city
                );
                self.rules.predict(current, timeframe, now.hour())
            }
        }
    }
}

async fn ask_model(
    provider: &dyn LlmProvider,
    current: &MetricSample,
    history: &[HistoricalPoint],
    timeframe: Timeframe,
    now: DateTime<FixedOffset>,
) -> Result<PredictionResult, AiError> {
    let session_id = session_id(&current.city, now);
    let prompt = build_prompt(current, history, timeframe, now);
    let response = provider
        .send_message(SYSTEM_PERSONA, &session_id, &prompt)
        .await?;
    parse_response(&response, current, timeframe)
}

/// Derives the opaque session identity from the city and current hour.
///
/// Predictions for the same city within the same hour share a session so
/// the provider can reuse context; nothing downstream depends on it.
fn session_id(city: &str, now: DateTime<FixedOffset>) -> String {
    format!("citypulse_{city}_{}", now.format("%Y%m%d_%H"))
}

/// Builds the user prompt: current values, the recent trend, and the
/// civil-time context the model should reason from.
fn build_prompt(
    current: &MetricSample,
    history: &[HistoricalPoint],
    timeframe: Timeframe,
    now: DateTime<FixedOffset>,
) -> String {
    let mut prompt = format!(
        "Predict {timeframe} metrics for {city}, {state} at {time}.\n\n\
         Current Metrics:\n\
         - Traffic Congestion: {traffic:.1}%\n\
         - Air Quality Index: {aqi:.1} AQI\n\
         - Energy Consumption: {energy:.1}%\n\n\
         Recent 6-hour trend (latest first):\n",
        city = current.city,
        state = current.state,
        time = now.format("%H:%M IST on %A, %B %d, %Y"),
        traffic = current.traffic,
        aqi = current.aqi,
        energy = current.energy,
    );

    for point in history.iter().rev().take(TREND_POINTS) {
        prompt.push_str(&format!(
            "- {}: Traffic {:.0}%, AQI {:.0}, Energy {:.0}%\n",
            point.time, point.traffic, point.aqi, point.energy,
        ));
    }

    prompt.push_str(&format!(
        "\nContext:\n\
         - City: {city} ({state})\n\
         - Current time: {hhmm} IST\n\
         - Prediction timeframe: {timeframe}\n\
         - Day: {weekday}\n\n\
         Consider these factors:\n\
         1. Time-based patterns (rush hours, evening energy peaks)\n\
         2. City-specific trends ({city} characteristics)\n\
         3. Day of week effects\n\
         4. Seasonal considerations\n\
         5. Logical progression from current values\n\n\
         Provide predictions for {timeframe} from now with a confidence score.\n\
         Respond with valid JSON only.",
        city = current.city,
        state = current.state,
        hhmm = now.format("%H:%M"),
        weekday = now.format("%A"),
    ));

    prompt
}

/// Validates a raw model answer into an in-bounds result.
///
/// Missing prediction fields default to the current sample's values;
/// everything numeric is clamped. Only unparseable text or a non-object
/// payload is an error.
fn parse_response(
    response: &str,
    current: &MetricSample,
    timeframe: Timeframe,
) -> Result<PredictionResult, AiError> {
    let payload: serde_json::Value = serde_json::from_str(extract_json(response))?;
    let Some(fields) = payload.as_object() else {
        return Err(AiError::Provider {
            message: "prediction response is not a JSON object".to_string(),
        });
    };

    let predictions = fields
        .get("predictions")
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    Ok(PredictionResult {
        predictions: PredictionValues {
            traffic: clamp_percentage(
                predictions["traffic"].as_f64().unwrap_or(current.traffic),
            ),
            aqi: clamp_aqi(predictions["aqi"].as_f64().unwrap_or(current.aqi)),
            energy: clamp_percentage(predictions["energy"].as_f64().unwrap_or(current.energy)),
        },
        confidence: fields
            .get("confidence")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(DEFAULT_CONFIDENCE)
            .clamp(0.0, 1.0),
        reasoning: fields
            .get("reasoning")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| format!("AI prediction for {timeframe}"), String::from),
        source: PredictionSource::Ai,
    })
}

/// Pulls the JSON payload out of a model answer: a ```json fenced block
/// if present, else the first fenced block, else the whole text.
fn extract_json(response: &str) -> &str {
    let text = response.trim();
    if let Some((_, rest)) = text.split_once("```json") {
        rest.split("```").next().unwrap_or(rest).trim()
    } else if text.contains("```") {
        let mut fences = text.split("```");
        fences.next();
        fences.next().map_or(text, str::trim)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use city_pulse_simulation_models::MetricSource;

    struct CannedProvider {
        body: &'static str,
    }

    #[async_trait::async_trait]
    impl LlmProvider for CannedProvider {
        async fn send_message(
            &self,
            _system_prompt: &str,
            _session_id: &str,
            _prompt: &str,
        ) -> Result<String, AiError> {
            Ok(self.body.to_string())
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl LlmProvider for FailingProvider {
        async fn send_message(
            &self,
            _system_prompt: &str,
            _session_id: &str,
            _prompt: &str,
        ) -> Result<String, AiError> {
            Err(AiError::Provider {
                message: "connection refused".to_string(),
            })
        }
    }

    fn fixed_now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(19800)
            .unwrap()
            .with_ymd_and_hms(2025, 8, 7, 14, 0, 0)
            .unwrap()
    }

    fn sample() -> MetricSample {
        MetricSample {
            state: "Maharashtra".to_string(),
            city: "Mumbai".to_string(),
            traffic: 50.0,
            aqi: 150.0,
            energy: 50.0,
            timestamp: fixed_now(),
            source: MetricSource::Sensor,
        }
    }

    fn canned(body: &'static str) -> PredictionOrchestrator {
        PredictionOrchestrator::new(Some(Box::new(CannedProvider { body })))
    }

    #[tokio::test]
    async fn failing_provider_falls_back() {
        let orchestrator = PredictionOrchestrator::new(Some(Box::new(FailingProvider)));
        let result = orchestrator
            .predict(&sample(), &[], Timeframe::OneHour, fixed_now())
            .await;
        assert_eq!(result.source, PredictionSource::Fallback);
        assert!((result.confidence - 0.65).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn missing_provider_falls_back() {
        let orchestrator = PredictionOrchestrator::new(None);
        let result = orchestrator
            .predict(&sample(), &[], Timeframe::SixHours, fixed_now())
            .await;
        assert_eq!(result.source, PredictionSource::Fallback);
    }

    #[tokio::test]
    async fn out_of_range_answer_is_clamped() {
        let orchestrator = canned(
            "```json\n{\"predictions\":{\"traffic\":150,\"aqi\":40,\"energy\":-5},\
             \"confidence\":2,\"reasoning\":\"x\"}\n```",
        );
        let result = orchestrator
            .predict(&sample(), &[], Timeframe::OneHour, fixed_now())
            .await;
        assert_eq!(result.source, PredictionSource::Ai);
        assert!((result.predictions.traffic - 100.0).abs() < f64::EPSILON);
        assert!((result.predictions.aqi - 50.0).abs() < f64::EPSILON);
        assert!((result.predictions.energy).abs() < f64::EPSILON);
        assert!((result.confidence - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.reasoning, "x");
    }

    #[tokio::test]
    async fn missing_fields_default_to_current_values() {
        let orchestrator = canned("{}");
        let current = sample();
        let result = orchestrator
            .predict(&current, &[], Timeframe::OneHour, fixed_now())
            .await;
        assert_eq!(result.source, PredictionSource::Ai);
        assert!((result.predictions.traffic - current.traffic).abs() < f64::EPSILON);
        assert!((result.predictions.aqi - current.aqi).abs() < f64::EPSILON);
        assert!((result.predictions.energy - current.energy).abs() < f64::EPSILON);
        assert!((result.confidence - 0.75).abs() < f64::EPSILON);
        assert_eq!(result.reasoning, "AI prediction for 1hour");
    }

    #[tokio::test]
    async fn prose_answer_falls_back() {
        let orchestrator = canned("Traffic should ease up over the next hour.");
        let result = orchestrator
            .predict(&sample(), &[], Timeframe::OneHour, fixed_now())
            .await;
        assert_eq!(result.source, PredictionSource::Fallback);
    }

    #[tokio::test]
    async fn json_array_answer_falls_back() {
        let orchestrator = canned("[1, 2, 3]");
        let result = orchestrator
            .predict(&sample(), &[], Timeframe::OneHour, fixed_now())
            .await;
        assert_eq!(result.source, PredictionSource::Fallback);
    }

    #[tokio::test]
    async fn unfenced_json_is_accepted() {
        let orchestrator =
            canned("{\"predictions\":{\"traffic\":62,\"aqi\":140,\"energy\":55},\"confidence\":0.9}");
        let result = orchestrator
            .predict(&sample(), &[], Timeframe::SixHours, fixed_now())
            .await;
        assert_eq!(result.source, PredictionSource::Ai);
        assert!((result.predictions.traffic - 62.0).abs() < f64::EPSILON);
        assert_eq!(result.reasoning, "AI prediction for 6hours");
    }

    #[test]
    fn extracts_json_from_plain_fence() {
        assert_eq!(extract_json("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(extract_json("```json\n{\"a\":1}\n``` trailing"), "{\"a\":1}");
        assert_eq!(extract_json("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn session_identity_is_city_and_hour() {
        assert_eq!(session_id("Mumbai", fixed_now()), "citypulse_Mumbai_20250807_14");
    }

    #[test]
    fn prompt_quotes_latest_trend_first() {
        let history = vec![
            HistoricalPoint {
                time: "12:00".to_string(),
                traffic: 40.0,
                aqi: 120.0,
                energy: 45.0,
                timestamp: fixed_now(),
            },
            HistoricalPoint {
                time: "13:00".to_string(),
                traffic: 45.0,
                aqi: 125.0,
                energy: 50.0,
                timestamp: fixed_now(),
            },
        ];
        let prompt = build_prompt(&sample(), &history, Timeframe::OneHour, fixed_now());
        let pos_13 = prompt.find("- 13:00").unwrap();
        let pos_12 = prompt.find("- 12:00").unwrap();
        assert!(pos_13 < pos_12);
        assert!(prompt.contains("Predict 1hour metrics for Mumbai, Maharashtra"));
    }
}
