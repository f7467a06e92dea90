use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::domain::{CriteriaPath, MatchMode, ScorePair};
use super::index::CategoryIndex;

/// How many countries the last-resort ranking returns.
const FALLBACK_COUNT: usize = 5;

/// Resolver output: the surviving countries with their scores, plus how
/// the search arrived at them.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub mode: MatchMode,
    pub scores: BTreeMap<String, ScorePair>,
}

fn collect_scores(
    countries: impl IntoIterator<Item = String>,
    cohort: &BTreeMap<String, ScorePair>,
) -> BTreeMap<String, ScorePair> {
    countries
        .into_iter()
        .filter_map(|country| {
            cohort
                .get(&country)
                .map(|score| (country, *score))
        })
        .collect()
}

/// Resolve a user query against the built index.
///
/// The search degrades gracefully: an exact five-token match first; then
/// positional relaxation, substituting every other enumeration value at
/// one criterion position per round while holding the rest fixed, starting
/// from the last position (ethical bucket) and moving toward the first
/// (region); and finally, if all five rounds come up empty, the top five
/// countries of the whole cohort by raw economic score.
pub fn resolve(
    index: &CategoryIndex,
    path: &CriteriaPath,
    cohort: &BTreeMap<String, ScorePair>,
) -> Resolution {
    let exact = index.query(path);
    if !exact.is_empty() {
        return Resolution {
            mode: MatchMode::Exact,
            scores: collect_scores(exact, cohort),
        };
    }

    for round in 0..CriteriaPath::LEN {
        let position = CriteriaPath::LEN - 1 - round;
        let mut matches: BTreeSet<String> = BTreeSet::new();
        for alternative in path.alternatives(position) {
            matches.extend(index.query(&alternative));
        }
        if !matches.is_empty() {
            debug!(position, found = matches.len(), "relaxed search matched");
            return Resolution {
                mode: MatchMode::Relaxed,
                scores: collect_scores(matches, cohort),
            };
        }
    }

    debug!("relaxation exhausted, falling back to top economic performers");
    let mut ranked: Vec<(&String, &ScorePair)> = cohort.iter().collect();
    ranked.sort_by(|left, right| {
        right
            .1
            .economic
            .partial_cmp(&left.1.economic)
            .unwrap_or(Ordering::Equal)
            .then_with(|| right.0.cmp(left.0))
    });
    ranked.truncate(FALLBACK_COUNT);

    Resolution {
        mode: MatchMode::Fallback,
        scores: ranked
            .into_iter()
            .map(|(country, score)| (country.clone(), *score))
            .collect(),
    }
}
