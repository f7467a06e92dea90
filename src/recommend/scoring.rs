use std::collections::BTreeMap;

use tracing::debug;

use super::domain::{EthicalArea, ScorePair};
use super::normalize::min_max_rescale;
use crate::dataset::{AnnualObservation, CountryDataset, SdgRecord};

/// Historical window the indicator means are taken over.
pub(crate) const WINDOW_START: i32 = 1980;
pub(crate) const WINDOW_END: i32 = 2019;
/// Start of the recent window used for short-run classification.
pub(crate) const RECENT_WINDOW_START: i32 = 2014;

const GROWTH_WEIGHT: f64 = 0.4;
const INFLATION_WEIGHT: f64 = 0.2;
const INTEREST_WEIGHT: f64 = 0.2;
const SDG8_WEIGHT: f64 = 0.2;
const SDG8_GOAL: u8 = 8;

/// Weight assigned to each ethical priority rank, highest priority first.
/// Rank position, not group identity, determines the weight.
const RANK_WEIGHTS: [f64; 3] = [0.40, 0.35, 0.25];

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("{country} has no {indicator} observations inside the scoring window")]
    EmptyWindow {
        country: String,
        indicator: &'static str,
    },
}

fn window_values(series: &[AnnualObservation], start: i32, end: i32) -> Vec<f64> {
    series
        .iter()
        .filter(|observation| observation.year >= start && observation.year <= end)
        .map(|observation| observation.value)
        .collect()
}

/// Percentage change between consecutive observations. The first
/// observation has no prior-year baseline and yields no rate.
fn consecutive_rates(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0] * 100.0)
        .collect()
}

/// Mean growth rate with the undefined first difference counted as zero,
/// so short windows are not biased by the dropped baseline year. `None`
/// when the window holds no observations at all.
pub(crate) fn mean_rate_zero_filled(
    series: &[AnnualObservation],
    start: i32,
    end: i32,
) -> Option<f64> {
    let values = window_values(series, start, end);
    if values.is_empty() {
        return None;
    }
    let rates = consecutive_rates(&values);
    Some(rates.iter().sum::<f64>() / values.len() as f64)
}

/// Mean growth rate over the defined first differences only. `None` when
/// fewer than two observations fall inside the window.
pub(crate) fn mean_rate(series: &[AnnualObservation], start: i32, end: i32) -> Option<f64> {
    let values = window_values(series, start, end);
    if values.len() < 2 {
        return None;
    }
    let rates = consecutive_rates(&values);
    Some(rates.iter().sum::<f64>() / rates.len() as f64)
}

fn mean_level(series: &[AnnualObservation], start: i32, end: i32) -> Option<f64> {
    let values = window_values(series, start, end);
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Per-goal average of (score + trend) / 2 across the area's goal list.
/// Missing scores arrive as -1 and are averaged in unfiltered.
fn group_average(area: EthicalArea, sdg: &SdgRecord) -> f64 {
    let goals = area.goals();
    let total: f64 = goals.iter().map(|goal| sdg.goal(*goal).blended()).sum();
    total / goals.len() as f64
}

/// Weighted ethical score for one country under the user's priority order.
pub fn ethical_score(priority: [EthicalArea; 3], sdg: &SdgRecord) -> f64 {
    priority
        .iter()
        .zip(RANK_WEIGHTS)
        .map(|(area, weight)| group_average(*area, sdg) * weight)
        .sum()
}

/// Score every country in the dataset. Economic indicator means are
/// normalized across the cohort (not across time); a country missing
/// interest-rate data contributes zero for that term instead of an
/// imputed value.
pub fn score_cohort(
    dataset: &CountryDataset,
    priority: [EthicalArea; 3],
) -> Result<BTreeMap<String, ScorePair>, ScoringError> {
    let records: Vec<_> = dataset.countries().collect();

    let mut growth_means = Vec::with_capacity(records.len());
    let mut inflation_means = Vec::with_capacity(records.len());
    let mut interest_means = Vec::with_capacity(records.len());

    for record in &records {
        let growth = mean_rate_zero_filled(&record.gdp, WINDOW_START, WINDOW_END).ok_or_else(
            || ScoringError::EmptyWindow {
                country: record.name.clone(),
                indicator: "GDP",
            },
        )?;
        let inflation = mean_rate_zero_filled(&record.cpi, WINDOW_START, WINDOW_END).ok_or_else(
            || ScoringError::EmptyWindow {
                country: record.name.clone(),
                indicator: "CPI",
            },
        )?;

        growth_means.push(growth);
        inflation_means.push(inflation);
        interest_means.push(
            mean_level(&record.interest, WINDOW_START, WINDOW_END).unwrap_or(f64::NAN),
        );
    }

    let growth_scaled = min_max_rescale(&growth_means);
    let inflation_scaled = min_max_rescale(&inflation_means);
    let interest_scaled = min_max_rescale(&interest_means);

    let mut scores = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        let interest_term = if interest_scaled[index].is_finite() {
            100.0 - interest_scaled[index]
        } else {
            0.0
        };

        let economic = GROWTH_WEIGHT * growth_scaled[index]
            + INFLATION_WEIGHT * (100.0 - inflation_scaled[index])
            + INTEREST_WEIGHT * interest_term
            + SDG8_WEIGHT * record.sdg.goal(SDG8_GOAL).blended();

        scores.insert(
            record.name.clone(),
            ScorePair {
                economic,
                ethical: ethical_score(priority, &record.sdg),
            },
        );
    }

    debug!(countries = scores.len(), "scored cohort");
    Ok(scores)
}
