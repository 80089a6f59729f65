//! Static per-city reference data.
//!
//! Baselines represent typical steady-state conditions for each covered
//! metro; the location table drives request validation and the locations
//! endpoint. Both are fixed at compile time.

use city_pulse_simulation_models::CityBaseline;

/// Baseline used for cities without a catalog entry.
const DEFAULT_BASELINE: CityBaseline = CityBaseline {
    traffic: 60.0,
    aqi: 150.0,
    energy: 50.0,
};

const fn baseline(traffic: f64, aqi: f64, energy: f64) -> CityBaseline {
    CityBaseline {
        traffic,
        aqi,
        energy,
    }
}

/// Typical conditions per covered metro: Delhi leads on congestion and
/// pollution, the Tier-2 cities run well below the metros.
const CITY_BASELINES: &[(&str, CityBaseline)] = &[
    ("Mumbai", baseline(75.0, 185.0, 68.0)),
    ("Pune", baseline(55.0, 145.0, 45.0)),
    ("Bangalore", baseline(80.0, 120.0, 52.0)),
    ("Chennai", baseline(70.0, 165.0, 58.0)),
    ("New Delhi", baseline(85.0, 220.0, 75.0)),
    ("East Delhi", baseline(80.0, 210.0, 70.0)),
    ("West Delhi", baseline(78.0, 200.0, 68.0)),
    ("North Delhi", baseline(82.0, 215.0, 72.0)),
    ("South Delhi", baseline(75.0, 190.0, 65.0)),
    ("Kolkata", baseline(65.0, 190.0, 48.0)),
    ("Ahmedabad", baseline(60.0, 155.0, 42.0)),
    ("Jaipur", baseline(50.0, 140.0, 38.0)),
    ("Surat", baseline(45.0, 130.0, 35.0)),
    ("Lucknow", baseline(55.0, 175.0, 40.0)),
    ("Nagpur", baseline(40.0, 125.0, 35.0)),
    ("Coimbatore", baseline(50.0, 110.0, 40.0)),
    ("Vadodara", baseline(45.0, 120.0, 38.0)),
];

/// States and their covered cities, as exposed by the locations API.
const STATES_AND_CITIES: &[(&str, &[&str])] = &[
    (
        "Maharashtra",
        &["Mumbai", "Pune", "Nagpur", "Nashik", "Aurangabad"],
    ),
    (
        "Karnataka",
        &["Bangalore", "Mysore", "Hubli", "Mangalore", "Belgaum"],
    ),
    (
        "Tamil Nadu",
        &["Chennai", "Coimbatore", "Madurai", "Trichy", "Salem"],
    ),
    (
        "Gujarat",
        &["Ahmedabad", "Surat", "Vadodara", "Rajkot", "Bhavnagar"],
    ),
    (
        "Rajasthan",
        &["Jaipur", "Jodhpur", "Udaipur", "Kota", "Bikaner"],
    ),
    (
        "West Bengal",
        &["Kolkata", "Durgapur", "Asansol", "Siliguri", "Howrah"],
    ),
    (
        "Delhi",
        &[
            "New Delhi",
            "East Delhi",
            "West Delhi",
            "North Delhi",
            "South Delhi",
        ],
    ),
    (
        "Uttar Pradesh",
        &["Lucknow", "Kanpur", "Agra", "Varanasi", "Allahabad"],
    ),
];

/// Static lookup of per-city steady-state reference values.
#[derive(Debug, Clone, Copy)]
pub struct BaselineCatalog {
    entries: &'static [(&'static str, CityBaseline)],
}

impl Default for BaselineCatalog {
    fn default() -> Self {
        Self {
            entries: CITY_BASELINES,
        }
    }
}

impl BaselineCatalog {
    /// Returns the baseline for `city`, or the default baseline for cities
    /// without a catalog entry. Never fails.
    #[must_use]
    pub fn baseline(&self, city: &str) -> CityBaseline {
        self.entries
            .iter()
            .find(|(name, _)| *name == city)
            .map_or(DEFAULT_BASELINE, |(_, baseline)| *baseline)
    }
}

/// Returns the state → cities location catalog.
#[must_use]
pub const fn states_and_cities() -> &'static [(&'static str, &'static [&'static str])] {
    STATES_AND_CITIES
}

/// Returns whether `city` is a covered city of `state`.
#[must_use]
pub fn is_known_city(state: &str, city: &str) -> bool {
    STATES_AND_CITIES
        .iter()
        .find(|(name, _)| *name == state)
        .is_some_and(|(_, cities)| cities.contains(&city))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_city_has_catalog_baseline() {
        let mumbai = BaselineCatalog::default().baseline("Mumbai");
        assert!((mumbai.traffic - 75.0).abs() < f64::EPSILON);
        assert!((mumbai.aqi - 185.0).abs() < f64::EPSILON);
        assert!((mumbai.energy - 68.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_city_gets_default_baseline() {
        let other = BaselineCatalog::default().baseline("Atlantis");
        assert!((other.traffic - 60.0).abs() < f64::EPSILON);
        assert!((other.aqi - 150.0).abs() < f64::EPSILON);
        assert!((other.energy - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validates_state_city_pairs() {
        assert!(is_known_city("Maharashtra", "Mumbai"));
        assert!(is_known_city("Delhi", "South Delhi"));
        // Right city, wrong state.
        assert!(!is_known_city("Karnataka", "Mumbai"));
        assert!(!is_known_city("Oz", "Emerald City"));
    }

    #[test]
    fn location_catalog_covers_eight_states() {
        assert_eq!(states_and_cities().len(), 8);
        for (_, cities) in states_and_cities() {
            assert_eq!(cities.len(), 5);
        }
    }
}
