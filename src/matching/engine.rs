//! Match & estimate engine
//!
//! Scores every candidate record against the normalized dish name, selects
//! the best one behind a confidence threshold, and derives per-serving and
//! total calorie figures from whatever energy shape the record carries.

use std::collections::HashSet;

use thiserror::Error;

use crate::matching::normalize::Normalizer;
use crate::matching::similarity;
use crate::models::{CalorieEstimate, FoodRecord, SOURCE_USDA};
use crate::nutrition::energy::{self, EnergyBasis};
use crate::provider::ProviderError;

/// Maximum ingredients exposed on an estimate
const MAX_INGREDIENTS: usize = 20;

/// Ways an estimate can fail. All are terminal for the request.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("no matching foods found")]
    NotFound,

    #[error("best match score {score:.1} is below threshold {threshold:.1}")]
    LowConfidence { score: f64, threshold: f64 },

    #[error("no usable energy value on the matched record")]
    EnergyMissing,

    /// Upstream search failure, propagated unchanged
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Composite score weights. Static configuration, passed in rather than read
/// from global state.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub holistic: f64,
    pub token_set: f64,
    pub partial: f64,
    /// Multiplier on query-token coverage (0..1) added on top of the base
    pub coverage_bonus: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            holistic: 0.5,
            token_set: 0.3,
            partial: 0.2,
            coverage_bonus: 10.0,
        }
    }
}

/// A candidate with its final composite score
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub record: &'a FoodRecord,
    pub score: f64,
}

/// The accepted match: record, score, and its extracted energy figure
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub record: &'a FoodRecord,
    pub score: f64,
    /// Extracted energy in kcal, before per-serving derivation
    pub kcal: f64,
    pub basis: EnergyBasis,
}

/// Scores candidates and derives calorie estimates
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    normalizer: Normalizer,
    weights: ScoreWeights,
}

impl MatchEngine {
    pub fn new(normalizer: Normalizer, weights: ScoreWeights) -> Self {
        Self {
            normalizer,
            weights,
        }
    }

    /// Composite base score between a normalized description and query
    fn composite_score(&self, desc_norm: &str, query_norm: &str) -> f64 {
        self.weights.holistic * similarity::weighted_ratio(desc_norm, query_norm)
            + self.weights.token_set * similarity::token_set_ratio(desc_norm, query_norm)
            + self.weights.partial * similarity::partial_ratio(desc_norm, query_norm)
    }

    /// Score every candidate against the dish name.
    ///
    /// Final score = composite base + coverage bonus; uncapped, so it can
    /// exceed 100. Order of the input is preserved.
    pub fn score_candidates<'a>(
        &self,
        dish_name: &str,
        candidates: &'a [FoodRecord],
    ) -> Vec<ScoredCandidate<'a>> {
        let query_norm = self.normalizer.normalize(dish_name);
        let query_tokens: HashSet<&str> = query_norm.split_whitespace().collect();

        candidates
            .iter()
            .map(|record| {
                let desc_norm = self.normalizer.normalize(&record.description);
                let base = self.composite_score(&desc_norm, &query_norm);

                let coverage = if query_tokens.is_empty() {
                    0.0
                } else {
                    let desc_tokens: HashSet<&str> = desc_norm.split_whitespace().collect();
                    let overlap = query_tokens.intersection(&desc_tokens).count();
                    overlap as f64 / query_tokens.len() as f64
                };

                ScoredCandidate {
                    record,
                    score: base + self.weights.coverage_bonus * coverage,
                }
            })
            .collect()
    }

    /// Pick the best-scoring candidate and extract its energy figure.
    ///
    /// Ties go to the earliest candidate. Fails with NotFound on an empty
    /// list, LowConfidence below the threshold, and EnergyMissing when the
    /// winner has no usable energy value.
    pub fn select_match<'a>(
        &self,
        dish_name: &str,
        candidates: &'a [FoodRecord],
        threshold: f64,
    ) -> Result<MatchResult<'a>, EstimateError> {
        if candidates.is_empty() {
            return Err(EstimateError::NotFound);
        }

        let scored = self.score_candidates(dish_name, candidates);
        let mut best = &scored[0];
        for candidate in &scored[1..] {
            if candidate.score > best.score {
                best = candidate;
            }
        }

        if best.score < threshold {
            return Err(EstimateError::LowConfidence {
                score: best.score,
                threshold,
            });
        }

        let (kcal, basis) =
            energy::find_energy_kcal(best.record).ok_or(EstimateError::EnergyMissing)?;

        Ok(MatchResult {
            record: best.record,
            score: best.score,
            kcal,
            basis,
        })
    }

    /// Derive the per-serving and total calorie figures from a match.
    ///
    /// Per-100 g figures are scaled by the declared serving grams when known,
    /// otherwise used as-is. Declared grams are trusted even when implausibly
    /// large or zero; no sanity bound is applied.
    pub fn build_estimate(
        &self,
        dish_name: &str,
        servings: f64,
        matched: &MatchResult<'_>,
    ) -> CalorieEstimate {
        let (per_serving, basis) = if matched.basis.is_per_serving() {
            (matched.kcal, matched.basis)
        } else if let Some(grams) = energy::serving_grams(matched.record) {
            (
                matched.kcal * (grams / 100.0),
                EnergyBasis::PerServingDerived,
            )
        } else {
            // No serving information at all; treat the figure as per-serving
            (matched.kcal, matched.basis)
        };

        // Round per-serving first, then multiply, then round the total
        let calories_per_serving = round2(per_serving);
        let total_calories = round2(calories_per_serving * servings);

        CalorieEstimate {
            dish_name: dish_name.to_string(),
            servings,
            calories_per_serving,
            total_calories,
            source: SOURCE_USDA.to_string(),
            basis: basis.to_string(),
            ingredients: ingredient_list(matched.record),
        }
    }

    /// Full pipeline: select the best candidate and build the estimate.
    ///
    /// Servings are assumed already validated (> 0) by the boundary layer.
    pub fn estimate(
        &self,
        dish_name: &str,
        servings: f64,
        candidates: &[FoodRecord],
        threshold: f64,
    ) -> Result<CalorieEstimate, EstimateError> {
        let matched = self.select_match(dish_name, candidates, threshold)?;
        Ok(self.build_estimate(dish_name, servings, &matched))
    }
}

/// Comma-split ingredient statement: trimmed, empties dropped, capped at 20
fn ingredient_list(record: &FoodRecord) -> Option<Vec<String>> {
    let raw = record.ingredients.as_deref()?;
    if raw.trim().is_empty() {
        return None;
    }
    let parts: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .take(MAX_INGREDIENTS)
        .map(str::to_string)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

/// Round to 2 decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodNutrient, LabelNutrients, LabelValue};

    fn engine() -> MatchEngine {
        MatchEngine::default()
    }

    fn with_label(description: &str, calories: f64) -> FoodRecord {
        FoodRecord {
            description: description.to_string(),
            label_nutrients: Some(LabelNutrients {
                calories: Some(LabelValue {
                    value: Some(calories),
                }),
            }),
            ..FoodRecord::default()
        }
    }

    fn with_kcal_per_100g(description: &str, kcal: f64) -> FoodRecord {
        FoodRecord {
            description: description.to_string(),
            food_nutrients: vec![FoodNutrient {
                nutrient_name: Some("Energy".to_string()),
                unit_name: Some("kcal".to_string()),
                value: Some(kcal),
            }],
            ..FoodRecord::default()
        }
    }

    #[test]
    fn test_empty_candidates_not_found() {
        let err = engine().estimate("chicken", 1.0, &[], 55.0).unwrap_err();
        assert!(matches!(err, EstimateError::NotFound));
    }

    #[test]
    fn test_low_confidence() {
        let candidates = vec![with_label("zzz", 100.0)];
        let err = engine()
            .estimate("chicken", 1.0, &candidates, 55.0)
            .unwrap_err();
        assert!(matches!(err, EstimateError::LowConfidence { .. }));
    }

    #[test]
    fn test_energy_missing_on_selected() {
        let candidates = vec![FoodRecord {
            description: "Grilled Chicken".to_string(),
            ..FoodRecord::default()
        }];
        let err = engine()
            .estimate("grilled chicken", 1.0, &candidates, 55.0)
            .unwrap_err();
        assert!(matches!(err, EstimateError::EnergyMissing));
    }

    #[test]
    fn test_label_estimate_end_to_end() {
        let candidates = vec![with_label("Macaroni and Cheese", 270.0)];
        let est = engine()
            .estimate("macaroni and cheese", 2.0, &candidates, 55.0)
            .unwrap();

        assert_eq!(est.calories_per_serving, 270.0);
        assert_eq!(est.total_calories, 540.0);
        assert_eq!(est.basis, "per serving (label)");
        assert_eq!(est.source, "USDA FoodData Central");
        assert!(est.ingredients.is_none());
    }

    #[test]
    fn test_derivation_from_per_100g_with_grams() {
        let mut record = with_kcal_per_100g("Beef Stew", 233.0);
        record.serving_size = Some(100.0);
        record.serving_size_unit = Some("g".to_string());

        let est = engine()
            .estimate("beef stew", 1.0, &[record], 55.0)
            .unwrap();
        assert_eq!(est.calories_per_serving, 233.0);
        assert_eq!(est.basis, "per serving (derived from per 100 g)");
    }

    #[test]
    fn test_per_100g_without_grams_used_as_is() {
        let mut record = with_kcal_per_100g("Beef Stew", 233.0);
        record.serving_size = Some(1.0);
        record.serving_size_unit = Some("cup".to_string());

        let est = engine()
            .estimate("beef stew", 1.0, &[record], 55.0)
            .unwrap();
        assert_eq!(est.calories_per_serving, 233.0);
        assert_eq!(est.basis, "per 100 g");
    }

    #[test]
    fn test_zero_gram_serving_taken_literally() {
        // A declared 0 g serving scales to 0 kcal; it is not treated as unknown
        let mut record = with_kcal_per_100g("Diet Gelatin", 233.0);
        record.serving_size = Some(0.0);
        record.serving_size_unit = Some("g".to_string());

        let est = engine()
            .estimate("diet gelatin", 1.0, &[record], 55.0)
            .unwrap();
        assert_eq!(est.calories_per_serving, 0.0);
        assert_eq!(est.total_calories, 0.0);
        assert_eq!(est.basis, "per serving (derived from per 100 g)");
    }

    #[test]
    fn test_composite_ordering() {
        let candidates = vec![
            with_label("Chicken Tikka Masala", 300.0),
            with_label("Grilled Chicken Salad", 180.0),
        ];
        let scored = engine().score_candidates("grilled chicken salad", &candidates);
        assert!(
            scored[1].score > scored[0].score,
            "exact description must outrank the paraphrase: {:?}",
            scored.iter().map(|s| s.score).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_picks_exact_match_among_paraphrases() {
        let mut salmon = with_kcal_per_100g("Grilled Salmon", 123.0);
        salmon.serving_size = Some(100.0);
        salmon.serving_size_unit = Some("g".to_string());

        let candidates = vec![
            with_kcal_per_100g("Salmon, Atlantic, farmed, cooked with butter", 208.0),
            salmon,
            with_kcal_per_100g("Smoked salmon spread", 170.0),
        ];

        let est = engine()
            .estimate("grilled salmon", 1.0, &candidates, 55.0)
            .unwrap();
        assert!(
            (120.0..=126.0).contains(&est.calories_per_serving),
            "got {}",
            est.calories_per_serving
        );
        assert_eq!(est.basis, "per serving (derived from per 100 g)");
    }

    #[test]
    fn test_tie_breaks_to_first_candidate() {
        let candidates = vec![
            with_label("Grilled Chicken", 150.0),
            with_label("Grilled Chicken", 999.0),
        ];
        let matched = engine()
            .select_match("grilled chicken", &candidates, 55.0)
            .unwrap();
        assert_eq!(matched.kcal, 150.0);
    }

    #[test]
    fn test_score_uncapped_above_100() {
        let candidates = vec![with_label("Grilled Chicken", 150.0)];
        let scored = engine().score_candidates("grilled chicken", &candidates);
        assert!(scored[0].score > 100.0);
    }

    #[test]
    fn test_rounding_per_serving_then_total() {
        // 1.005 kcal/g style values exercise the two independent roundings
        let mut record = with_kcal_per_100g("Soup", 33.333);
        record.serving_size = Some(150.0);
        record.serving_size_unit = Some("g".to_string());

        let est = engine().estimate("soup", 3.0, &[record], 0.0).unwrap();
        // 33.333 * 1.5 = 49.9995 -> 50.0 per serving; 50.0 * 3 = 150.0
        assert_eq!(est.calories_per_serving, 50.0);
        assert_eq!(est.total_calories, 150.0);
    }

    #[test]
    fn test_ingredients_parsed_trimmed_capped() {
        let many: String = (0..30)
            .map(|i| format!("ingredient {i}"))
            .collect::<Vec<_>>()
            .join(" , ");
        let mut record = with_label("Frozen Dinner", 400.0);
        record.ingredients = Some(format!("{many},, "));

        let est = engine()
            .estimate("frozen dinner", 1.0, &[record], 55.0)
            .unwrap();
        let ingredients = est.ingredients.unwrap();
        assert_eq!(ingredients.len(), 20);
        assert_eq!(ingredients[0], "ingredient 0");
    }

    #[test]
    fn test_alias_in_query_still_matches() {
        let candidates = vec![with_label("Chicken Biryani", 350.0)];
        let est = engine()
            .estimate("chiken biriyani", 1.0, &candidates, 55.0)
            .unwrap();
        assert_eq!(est.calories_per_serving, 350.0);
    }
}
