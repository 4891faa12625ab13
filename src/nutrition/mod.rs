//! Energy extraction and serving-size handling
//!
//! Pulls a usable kcal figure out of heterogeneous USDA record shapes.

pub mod energy;

pub use energy::{find_energy_kcal, serving_grams, EnergyBasis, KJ_PER_KCAL};
