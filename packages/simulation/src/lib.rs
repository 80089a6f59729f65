#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Synthetic urban sensor metrics for Indian cities.
//!
//! The simulation follows a baseline × multiplier × noise model: every city
//! has steady-state reference values, deterministic multipliers scale them
//! by time of day, day of week, and season, and a bounded random draw adds
//! sample-to-sample variation. The alert engine turns finished samples into
//! threshold alerts. All wall-clock reads go through the IST clock in
//! [`clock`]; every operation also has an explicit-time variant so callers
//! and tests can pin the evaluation instant.

pub mod alerts;
pub mod catalog;
pub mod clock;
pub mod engine;
pub mod multipliers;

pub use catalog::BaselineCatalog;
pub use engine::SimulationEngine;
