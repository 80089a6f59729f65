//! Deterministic rule-based fallback predictor.

use city_pulse_simulation_models::{MetricSample, clamp_aqi, clamp_percentage};

use crate::{PredictionResult, PredictionSource, PredictionValues, Timeframe};

/// Confidence reported for rule-based predictions.
const RULE_CONFIDENCE: f64 = 0.65;

/// Morning and evening rush bands.
const fn is_rush_hour(hour: u32) -> bool {
    matches!(hour, 8..=10 | 17..=20)
}

/// Heuristic predictor used when the LLM is unavailable or returns
/// unusable output, and usable stand-alone. Deterministic: no randomness,
/// no external calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedPredictor;

impl RuleBasedPredictor {
    /// Predicts `timeframe` metrics from the current sample and IST hour.
    ///
    /// Hour bands can overlap; their deltas add up rather than replace
    /// each other (hour 22 is both late-night and evening-peak for
    /// energy). Results are clamped like any synthesized sample.
    #[must_use]
    pub fn predict(self, current: &MetricSample, timeframe: Timeframe, hour: u32) -> PredictionResult {
        let mut traffic_delta = 0.0;
        let mut aqi_delta = 0.0;
        let mut energy_delta = 0.0;

        match timeframe {
            Timeframe::OneHour => {
                if is_rush_hour(hour) {
                    traffic_delta += 10.0;
                }
                if matches!(hour, 22 | 23 | 0..=6) {
                    traffic_delta -= 15.0;
                    energy_delta -= 10.0;
                }
                if matches!(hour, 18..=22) {
                    energy_delta += 8.0;
                }
            }
            Timeframe::SixHours => {
                let future_hour = (hour + 6) % 24;
                if is_rush_hour(future_hour) {
                    traffic_delta += 5.0;
                }
                // Mild improvement assumption over a six-hour horizon.
                aqi_delta -= 5.0;
            }
        }

        PredictionResult {
            predictions: PredictionValues {
                traffic: clamp_percentage(current.traffic + traffic_delta),
                aqi: clamp_aqi(current.aqi + aqi_delta),
                energy: clamp_percentage(current.energy + energy_delta),
            },
            confidence: RULE_CONFIDENCE,
            reasoning: format!("Rule-based {timeframe} prediction for {}", current.city),
            source: PredictionSource::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use city_pulse_simulation_models::MetricSource;

    fn sample(traffic: f64, aqi: f64, energy: f64) -> MetricSample {
        MetricSample {
            state: "Maharashtra".to_string(),
            city: "Mumbai".to_string(),
            traffic,
            aqi,
            energy,
            timestamp: FixedOffset::east_opt(19800)
                .unwrap()
                .with_ymd_and_hms(2025, 8, 7, 9, 0, 0)
                .unwrap(),
            source: MetricSource::Sensor,
        }
    }

    #[test]
    fn rush_hour_raises_traffic() {
        let result = RuleBasedPredictor.predict(&sample(50.0, 150.0, 50.0), Timeframe::OneHour, 9);
        assert!((result.predictions.traffic - 60.0).abs() < f64::EPSILON);
        assert!((result.confidence - 0.65).abs() < f64::EPSILON);
        assert_eq!(result.source, PredictionSource::Fallback);
    }

    #[test]
    fn night_lowers_traffic_and_energy() {
        let result = RuleBasedPredictor.predict(&sample(50.0, 150.0, 50.0), Timeframe::OneHour, 2);
        assert!((result.predictions.traffic - 35.0).abs() < f64::EPSILON);
        assert!((result.predictions.energy - 40.0).abs() < f64::EPSILON);
        assert!((result.predictions.aqi - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hour_22_applies_both_night_and_evening_deltas() {
        // Night band: traffic −15, energy −10; evening peak: energy +8.
        let result = RuleBasedPredictor.predict(&sample(50.0, 150.0, 50.0), Timeframe::OneHour, 22);
        assert!((result.predictions.traffic - 35.0).abs() < f64::EPSILON);
        assert!((result.predictions.energy - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quiet_midday_changes_nothing_for_one_hour() {
        let result = RuleBasedPredictor.predict(&sample(50.0, 150.0, 50.0), Timeframe::OneHour, 13);
        assert!((result.predictions.traffic - 50.0).abs() < f64::EPSILON);
        assert!((result.predictions.energy - 50.0).abs() < f64::EPSILON);
        assert!((result.predictions.aqi - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn six_hour_horizon_anticipates_the_rush() {
        // 03:00 + 6h = 09:00, inside the morning rush.
        let result = RuleBasedPredictor.predict(&sample(50.0, 150.0, 50.0), Timeframe::SixHours, 3);
        assert!((result.predictions.traffic - 55.0).abs() < f64::EPSILON);
        assert!((result.predictions.aqi - 145.0).abs() < f64::EPSILON);

        // 05:00 + 6h = 11:00, outside it.
        let result = RuleBasedPredictor.predict(&sample(50.0, 150.0, 50.0), Timeframe::SixHours, 5);
        assert!((result.predictions.traffic - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn six_hour_aqi_never_drops_below_floor() {
        let result = RuleBasedPredictor.predict(&sample(50.0, 52.0, 50.0), Timeframe::SixHours, 13);
        assert!((result.predictions.aqi - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn deltas_clamp_at_the_edges() {
        let result = RuleBasedPredictor.predict(&sample(95.0, 150.0, 5.0), Timeframe::OneHour, 9);
        assert!((result.predictions.traffic - 100.0).abs() < f64::EPSILON);

        let result = RuleBasedPredictor.predict(&sample(10.0, 150.0, 5.0), Timeframe::OneHour, 2);
        assert!((result.predictions.energy).abs() < f64::EPSILON);
    }
}
