//! Metric sample synthesis.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike};
use city_pulse_simulation_models::{
    HistoricalPoint, MetricSample, MetricSource, clamp_aqi, clamp_percentage,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::BaselineCatalog;
use crate::clock::ist_now;
use crate::multipliers::{aqi_multiplier, energy_multiplier, traffic_multiplier};

/// Noise spread for live samples: traffic ±15%, AQI ±10%, energy ±12%.
const CURRENT_NOISE: (f64, f64, f64) = (0.15, 0.10, 0.12);

/// Historical points vary less than live readings.
const HISTORICAL_NOISE: (f64, f64, f64) = (0.10, 0.08, 0.10);

/// Default depth of a historical series, in hours.
pub const DEFAULT_HISTORY_HOURS: u32 = 24;

/// Synthesizes current and historical metric samples.
///
/// Owns the baseline catalog and the noise source. The noise source is
/// seedable so tests can reproduce exact outputs; production engines are
/// entropy-seeded.
#[derive(Debug)]
pub struct SimulationEngine {
    baselines: BaselineCatalog,
    rng: StdRng,
}

impl SimulationEngine {
    /// Creates an engine with an entropy-seeded noise source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            baselines: BaselineCatalog::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates an engine with a fixed seed for reproducible output.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            baselines: BaselineCatalog::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Synthesizes a live sample for `city` at the current IST time.
    pub fn generate_current(&mut self, city: &str, state: &str) -> MetricSample {
        self.generate_current_at(city, state, ist_now())
    }

    /// Synthesizes a live sample for `city` at an explicit time.
    ///
    /// Value = baseline × multiplier(now) × (1 + U(−v, v)), with an
    /// independent noise draw per metric, clamped to the documented
    /// bounds.
    pub fn generate_current_at(
        &mut self,
        city: &str,
        state: &str,
        now: DateTime<FixedOffset>,
    ) -> MetricSample {
        let baseline = self.baselines.baseline(city);
        let (hour, weekday, month) = time_parts(now);
        let (traffic_v, aqi_v, energy_v) = CURRENT_NOISE;

        let traffic = baseline.traffic * traffic_multiplier(hour, weekday) * self.noise(traffic_v);
        let aqi = baseline.aqi * aqi_multiplier(hour, month) * self.noise(aqi_v);
        let energy = baseline.energy * energy_multiplier(hour, month) * self.noise(energy_v);

        MetricSample {
            state: state.to_string(),
            city: city.to_string(),
            traffic: clamp_percentage(traffic),
            aqi: clamp_aqi(aqi),
            energy: clamp_percentage(energy),
            timestamp: now,
            source: MetricSource::Sensor,
        }
    }

    /// Synthesizes the past `hours` hourly points, ending one hour before
    /// the current IST time.
    pub fn generate_historical(&mut self, city: &str, hours: u32) -> Vec<HistoricalPoint> {
        self.generate_historical_at(city, hours, ist_now())
    }

    /// As [`Self::generate_historical`] with an explicit reference time.
    ///
    /// Points are oldest first, exactly one hour apart, each evaluated
    /// with the multiplier model of its own hour, weekday, and month.
    pub fn generate_historical_at(
        &mut self,
        city: &str,
        hours: u32,
        now: DateTime<FixedOffset>,
    ) -> Vec<HistoricalPoint> {
        let baseline = self.baselines.baseline(city);
        let (traffic_v, aqi_v, energy_v) = HISTORICAL_NOISE;
        let mut points = Vec::with_capacity(hours as usize);

        for back in (1..=i64::from(hours)).rev() {
            let point_time = now - Duration::hours(back);
            let (hour, weekday, month) = time_parts(point_time);

            let traffic =
                baseline.traffic * traffic_multiplier(hour, weekday) * self.noise(traffic_v);
            let aqi = baseline.aqi * aqi_multiplier(hour, month) * self.noise(aqi_v);
            let energy = baseline.energy * energy_multiplier(hour, month) * self.noise(energy_v);

            points.push(HistoricalPoint {
                time: point_time.format("%H:%M").to_string(),
                traffic: clamp_percentage(traffic),
                aqi: clamp_aqi(aqi),
                energy: clamp_percentage(energy),
                timestamp: point_time,
            });
        }

        points
    }

    /// Draws a `1 + U(−spread, spread)` noise factor.
    fn noise(&mut self, spread: f64) -> f64 {
        1.0 + self.rng.gen_range(-spread..=spread)
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn time_parts(at: DateTime<FixedOffset>) -> (u32, u32, u32) {
    (at.hour(), at.weekday().num_days_from_monday(), at.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ist(y: i32, mo: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(5 * 3600 + 30 * 60)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, 0, 0)
            .unwrap()
    }

    #[test]
    fn same_seed_reproduces_samples() {
        let now = ist(2025, 8, 7, 9);
        let mut a = SimulationEngine::with_seed(42);
        let mut b = SimulationEngine::with_seed(42);

        let sample_a = a.generate_current_at("Mumbai", "Maharashtra", now);
        let sample_b = b.generate_current_at("Mumbai", "Maharashtra", now);
        assert_eq!(sample_a, sample_b);

        let hist_a = a.generate_historical_at("Mumbai", 24, now);
        let hist_b = b.generate_historical_at("Mumbai", 24, now);
        assert_eq!(hist_a, hist_b);
    }

    #[test]
    fn current_sample_respects_bounds() {
        let mut engine = SimulationEngine::with_seed(7);
        // Winter evening in New Delhi pushes every metric toward its
        // ceiling; a December Sunday night pushes traffic to the floor.
        for now in [ist(2025, 12, 15, 19), ist(2025, 12, 14, 3)] {
            for city in ["New Delhi", "Mumbai", "Atlantis"] {
                for _ in 0..50 {
                    let sample = engine.generate_current_at(city, "Delhi", now);
                    assert!((0.0..=100.0).contains(&sample.traffic));
                    assert!(sample.aqi >= 50.0);
                    assert!((0.0..=100.0).contains(&sample.energy));
                    assert_eq!(sample.source, MetricSource::Sensor);
                    assert_eq!(sample.timestamp, now);
                }
            }
        }
    }

    #[test]
    fn historical_series_is_hourly_and_oldest_first() {
        let now = ist(2025, 8, 7, 14);
        let mut engine = SimulationEngine::with_seed(3);
        let series = engine.generate_historical_at("Pune", 24, now);

        assert_eq!(series.len(), 24);
        assert_eq!(series[0].timestamp, now - Duration::hours(24));
        assert_eq!(series[23].timestamp, now - Duration::hours(1));
        for pair in series.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }
    }

    #[test]
    fn historical_labels_match_point_times() {
        let now = ist(2025, 8, 7, 14);
        let mut engine = SimulationEngine::with_seed(3);
        let series = engine.generate_historical_at("Pune", 3, now);

        assert_eq!(series[0].time, "11:00");
        assert_eq!(series[1].time, "12:00");
        assert_eq!(series[2].time, "13:00");
    }

    #[test]
    fn historical_points_respect_bounds() {
        let mut engine = SimulationEngine::with_seed(11);
        let series = engine.generate_historical_at("New Delhi", 48, ist(2025, 12, 15, 20));
        for point in &series {
            assert!((0.0..=100.0).contains(&point.traffic));
            assert!(point.aqi >= 50.0);
            assert!((0.0..=100.0).contains(&point.energy));
        }
    }

    #[test]
    fn historical_crosses_midnight_with_local_hours() {
        let now = ist(2025, 8, 7, 2);
        let mut engine = SimulationEngine::with_seed(5);
        let series = engine.generate_historical_at("Chennai", 4, now);
        let labels: Vec<&str> = series.iter().map(|p| p.time.as_str()).collect();
        assert_eq!(labels, ["22:00", "23:00", "00:00", "01:00"]);
    }
}
