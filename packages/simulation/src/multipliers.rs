//! Deterministic time-of-day and seasonal scaling factors.
//!
//! Each function maps a civil-time context to a strictly positive factor
//! applied to a city baseline. Hours are `0-23`, weekdays `0-6` with
//! `0 = Monday`, months `1-12`. Pure functions, no I/O.

/// Traffic factor for an hour of day and day of week.
///
/// Weekends cut the whole day by 30% before the hour band applies; the
/// bands peak during the morning and evening rush.
#[must_use]
pub fn traffic_multiplier(hour: u32, weekday: u32) -> f64 {
    let base = if weekday >= 5 { 0.7 } else { 1.0 };

    let band = match hour {
        8..=10 => 1.4,  // morning rush
        17..=20 => 1.5, // evening rush
        11..=16 => 1.1, // daytime
        21..=23 => 0.8, // late evening
        _ => 0.4,       // night
    };

    base * band
}

/// Energy factor for an hour of day and month.
///
/// Summer months carry the cooling load, winter a smaller heating load;
/// the hour bands track household demand with an evening peak.
#[must_use]
pub fn energy_multiplier(hour: u32, month: u32) -> f64 {
    let seasonal = match month {
        4..=8 => 1.2,      // summer cooling
        12 | 1 | 2 => 1.1, // winter heating
        _ => 1.0,
    };

    let band = match hour {
        18..=22 => 1.3,  // evening peak
        14..=17 => 1.15, // afternoon AC
        6..=8 => 1.1,    // morning
        23 | 0..=5 => 0.7,
        _ => 1.0,
    };

    seasonal * band
}

/// AQI factor for an hour of day and month.
///
/// Winter inversion layers trap pollution; the monsoon washes it out.
/// Daily peaks follow traffic buildup and the evening temperature
/// inversion, with the cleanest air in the early morning hours.
#[must_use]
pub fn aqi_multiplier(hour: u32, month: u32) -> f64 {
    let seasonal = match month {
        11 | 12 | 1 | 2 => 1.4, // winter
        6..=9 => 0.7,           // monsoon
        _ => 1.0,
    };

    let band = match hour {
        6..=9 => 1.2,
        18..=21 => 1.3,
        2..=5 => 0.8,
        _ => 1.0,
    };

    seasonal * band
}
