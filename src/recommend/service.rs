use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::classify;
use super::domain::{
    CriteriaPath, DevelopmentStatus, EthicalBucket, Horizon, MatchMode, PriorityError,
    PriorityRanking, Region, ScorePair, Sector,
};
use super::index::CategoryIndex;
use super::resolver;
use super::scoring::{self, ScoringError};
use crate::dataset::CountryDataset;

/// A single user query: four criterion tokens plus the ethical priority
/// ranking. The engine always enters the tree at the good ethical bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub region: Region,
    pub development: DevelopmentStatus,
    pub horizon: Horizon,
    pub sector: Sector,
    pub priority: PriorityRanking,
}

/// One row of the ranked recommendation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCountry {
    pub rank: usize,
    pub country: String,
    pub average_score: f64,
    pub economic_score: f64,
    pub ethical_score: f64,
}

/// The full answer handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub mode: MatchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    pub countries: Vec<RankedCountry>,
}

/// Error raised while answering a recommendation query.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error(transparent)]
    Priority(#[from] PriorityError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Facade composing the scorer, classifier, category index, and resolver
/// over a shared dataset. Stateless between queries; the index is rebuilt
/// per query from the same immutable bundle.
pub struct RecommendationService {
    dataset: Arc<CountryDataset>,
}

impl RecommendationService {
    pub fn new(dataset: Arc<CountryDataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &CountryDataset {
        &self.dataset
    }

    pub fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationReport, RecommendError> {
        let priority = request.priority.ordered()?;
        let scores = scoring::score_cohort(&self.dataset, priority)?;
        let classifications = classify::classify_cohort(&self.dataset, &scores);
        let index = CategoryIndex::build(&classifications);

        let path = CriteriaPath {
            region: request.region,
            development: request.development,
            horizon: request.horizon,
            sector: request.sector,
            bucket: EthicalBucket::Good,
        };

        let resolution = resolver::resolve(&index, &path, &scores);
        info!(
            mode = resolution.mode.code(),
            matched = resolution.scores.len(),
            "resolved recommendation query"
        );

        Ok(RecommendationReport {
            mode: resolution.mode,
            disclaimer: resolution.mode.disclaimer().map(str::to_string),
            countries: rank(resolution.scores),
        })
    }
}

/// Rank by the average of the two scores descending; ties break by country
/// name descending. Both halves of that ordering are part of the output
/// contract and must stay reproducible.
fn rank(scores: BTreeMap<String, ScorePair>) -> Vec<RankedCountry> {
    let mut rows: Vec<(String, ScorePair)> = scores.into_iter().collect();
    rows.sort_by(|left, right| {
        right
            .1
            .average()
            .partial_cmp(&left.1.average())
            .unwrap_or(Ordering::Equal)
            .then_with(|| right.0.cmp(&left.0))
    });

    rows.into_iter()
        .enumerate()
        .map(|(position, (country, score))| RankedCountry {
            rank: position + 1,
            country,
            average_score: score.average(),
            economic_score: score.economic,
            ethical_score: score.ethical,
        })
        .collect()
}
