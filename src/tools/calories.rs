//! Calorie estimation tools
//!
//! Orchestrates the provider fetch and the matching core, and writes the
//! optional query log. Input validation (non-empty dish, servings > 0)
//! happens at the MCP boundary, not here.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::matching::{EstimateError, MatchEngine};
use crate::models::{CalorieEstimate, QueryLogEntry, QueryLogNew};
use crate::nutrition::energy;
use crate::provider::{FoodSearch, ProviderError};

/// One scored candidate in a search_foods response
#[derive(Debug, Serialize)]
pub struct ScoredFoodSummary {
    pub description: String,
    /// Composite score plus coverage bonus (uncapped)
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kcal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size_unit: Option<String>,
}

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub query: String,
    pub results: Vec<ScoredFoodSummary>,
    pub total_candidates: usize,
}

/// Estimate calories for a dish: fetch candidates, match, derive, log.
///
/// A query log failure is logged and swallowed; it never fails the estimate.
pub async fn estimate_calories(
    provider: &dyn FoodSearch,
    engine: &MatchEngine,
    query_log: Option<&Database>,
    dish_name: &str,
    servings: f64,
    threshold: f64,
) -> Result<CalorieEstimate, EstimateError> {
    let candidates = provider.search(dish_name, None).await?;

    let matched = engine.select_match(dish_name, &candidates, threshold)?;
    let estimate = engine.build_estimate(dish_name, servings, &matched);

    info!(
        dish_name,
        score = matched.score,
        basis = %matched.basis,
        calories_per_serving = estimate.calories_per_serving,
        "estimate accepted"
    );

    if let Some(db) = query_log {
        let entry = QueryLogNew {
            dish_name,
            servings,
            calories_per_serving: estimate.calories_per_serving,
            total_calories: estimate.total_calories,
            match_score: matched.score,
            basis: &estimate.basis,
        };
        let logged = db.with_conn(|conn| QueryLogEntry::create(conn, &entry));
        if let Err(err) = logged {
            warn!(dish_name, error = %err, "failed to write query log");
        }
    }

    Ok(estimate)
}

/// Fetch candidates for a query and return them scored, best first.
///
/// Exposes what the engine sees so a low-confidence rejection can be
/// inspected.
pub async fn search_foods(
    provider: &dyn FoodSearch,
    engine: &MatchEngine,
    query: &str,
    limit: usize,
) -> Result<SearchFoodsResponse, ProviderError> {
    let candidates = provider.search(query, None).await?;
    let total_candidates = candidates.len();

    let mut scored = engine.score_candidates(query, &candidates);
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let results = scored
        .into_iter()
        .take(limit)
        .map(|candidate| {
            let energy = energy::find_energy_kcal(candidate.record);
            ScoredFoodSummary {
                description: candidate.record.description.clone(),
                score: candidate.score,
                kcal: energy.map(|(kcal, _)| kcal),
                basis: energy.map(|(_, basis)| basis.to_string()),
                serving_size: candidate.record.serving_size,
                serving_size_unit: candidate.record.serving_size_unit.clone(),
            }
        })
        .collect();

    Ok(SearchFoodsResponse {
        query: query.to_string(),
        results,
        total_candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::models::{FoodRecord, LabelNutrients, LabelValue};
    use async_trait::async_trait;

    struct FixedProvider {
        foods: Vec<FoodRecord>,
    }

    #[async_trait]
    impl FoodSearch for FixedProvider {
        async fn search(
            &self,
            _query: &str,
            _page_size: Option<u32>,
        ) -> Result<Vec<FoodRecord>, ProviderError> {
            Ok(self.foods.clone())
        }
    }

    fn labeled(description: &str, calories: f64) -> FoodRecord {
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

    #[tokio::test]
    async fn test_estimate_happy_path_without_log() {
        let provider = FixedProvider {
            foods: vec![labeled("Macaroni and Cheese", 270.0)],
        };
        let engine = MatchEngine::default();

        let est = estimate_calories(&provider, &engine, None, "macaroni and cheese", 2.0, 55.0)
            .await
            .unwrap();
        assert_eq!(est.total_calories, 540.0);
    }

    #[tokio::test]
    async fn test_estimate_writes_query_log() {
        // Shared-cache in-memory database, kept alive by the pool
        let db = Database::new("file:calories_log_test?mode=memory&cache=shared").unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn))
            .unwrap();

        let provider = FixedProvider {
            foods: vec![labeled("Macaroni and Cheese", 270.0)],
        };
        let engine = MatchEngine::default();

        let est = estimate_calories(
            &provider,
            &engine,
            Some(&db),
            "macaroni and cheese",
            2.0,
            55.0,
        )
        .await
        .unwrap();

        let entries = db
            .with_conn(|conn| QueryLogEntry::list_recent(conn, 10))
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].dish_name, "macaroni and cheese");
        assert_eq!(entries[0].servings, 2.0);
        assert_eq!(entries[0].calories_per_serving, est.calories_per_serving);
        assert_eq!(entries[0].total_calories, 540.0);
        assert_eq!(entries[0].basis, "per serving (label)");
    }

    #[tokio::test]
    async fn test_estimate_survives_query_log_failure() {
        // Migrations never ran, so the insert fails; the estimate must not
        let db = Database::new("file:calories_nolog_test?mode=memory&cache=shared").unwrap();

        let provider = FixedProvider {
            foods: vec![labeled("Macaroni and Cheese", 270.0)],
        };
        let engine = MatchEngine::default();

        let est = estimate_calories(
            &provider,
            &engine,
            Some(&db),
            "macaroni and cheese",
            1.0,
            55.0,
        )
        .await
        .unwrap();
        assert_eq!(est.calories_per_serving, 270.0);
    }

    #[tokio::test]
    async fn test_estimate_not_found() {
        let provider = FixedProvider { foods: vec![] };
        let engine = MatchEngine::default();

        let err = estimate_calories(&provider, &engine, None, "chicken", 1.0, 55.0)
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::NotFound));
    }

    #[tokio::test]
    async fn test_search_foods_sorted_and_limited() {
        let provider = FixedProvider {
            foods: vec![
                labeled("Chicken Tikka Masala", 300.0),
                labeled("Grilled Chicken Salad", 180.0),
                labeled("Grilled Chicken", 150.0),
            ],
        };
        let engine = MatchEngine::default();

        let response = search_foods(&provider, &engine, "grilled chicken salad", 2)
            .await
            .unwrap();
        assert_eq!(response.total_candidates, 3);
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].description, "Grilled Chicken Salad");
        assert!(response.results[0].score >= response.results[1].score);
        assert_eq!(response.results[0].kcal, Some(180.0));
    }
}
