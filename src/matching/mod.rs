//! Dish matching core
//!
//! Pure computation: text normalization, fuzzy similarity scoring, and
//! candidate selection. No I/O, safe to call concurrently.

pub mod engine;
pub mod normalize;
pub mod similarity;

pub use engine::{EstimateError, MatchEngine, MatchResult, ScoreWeights, ScoredCandidate};
pub use normalize::{Normalizer, DEFAULT_ALIASES};
