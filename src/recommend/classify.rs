use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use super::domain::{DevelopmentStatus, EthicalBucket, Horizon, Region, ScorePair, Sector};
use super::scoring::{mean_rate, RECENT_WINDOW_START, WINDOW_END, WINDOW_START};
use crate::dataset::{CountryDataset, CountryRecord};

/// Agriculture share above which a country counts as a primary economy.
const PRIMARY_AGRICULTURE_SHARE: f64 = 3.0;
/// Industry share above which a country counts as a secondary economy.
const SECONDARY_INDUSTRY_SHARE: f64 = 25.0;
/// Services share above which a country counts as a tertiary economy.
const TERTIARY_SERVICES_SHARE: f64 = 50.0;
/// Long-run mean annual GDP growth (percent) required for that horizon.
const LONG_RUN_GROWTH_THRESHOLD: f64 = 2.0;
/// Ethical score at or above which a country lands in the good bucket.
const GOOD_BUCKET_THRESHOLD: f64 = 50.0;

/// Categorical facts derived for one country, ready for index insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryClassification {
    pub region: Region,
    pub development: DevelopmentStatus,
    pub sectors: BTreeSet<Sector>,
    pub horizons: BTreeSet<Horizon>,
    pub bucket: EthicalBucket,
}

fn sectors_of(record: &CountryRecord) -> BTreeSet<Sector> {
    let mut sectors = BTreeSet::new();
    match &record.sectors {
        Some(shares) => {
            if shares.agriculture > PRIMARY_AGRICULTURE_SHARE {
                sectors.insert(Sector::Primary);
            }
            if shares.industry > SECONDARY_INDUSTRY_SHARE {
                sectors.insert(Sector::Secondary);
            }
            if shares.services > TERTIARY_SERVICES_SHARE {
                sectors.insert(Sector::Tertiary);
            }
        }
        // No sector snapshot: keep the country queryable under every sector.
        None => sectors.extend(Sector::ordered()),
    }
    sectors
}

fn horizons_of(record: &CountryRecord) -> BTreeSet<Horizon> {
    let mut horizons = BTreeSet::new();

    if matches!(
        mean_rate(&record.gdp, WINDOW_START, WINDOW_END),
        Some(rate) if rate > LONG_RUN_GROWTH_THRESHOLD
    ) {
        horizons.insert(Horizon::LongRun);
    }

    // Short-run membership is the default, withdrawn only on demonstrable
    // recent decline.
    let recent = mean_rate(&record.gdp, RECENT_WINDOW_START, WINDOW_END);
    if !matches!(recent, Some(rate) if rate < 0.0) {
        horizons.insert(Horizon::ShortRun);
    }

    horizons
}

/// Derive the categorical facts for one country given its ethical score.
pub fn classify(record: &CountryRecord, ethical: f64) -> CountryClassification {
    let development = if record.developed {
        DevelopmentStatus::Developed
    } else {
        DevelopmentStatus::Emerging
    };

    let bucket = if ethical >= GOOD_BUCKET_THRESHOLD {
        EthicalBucket::Good
    } else {
        EthicalBucket::Bad
    };

    CountryClassification {
        region: record.region,
        development,
        sectors: sectors_of(record),
        horizons: horizons_of(record),
        bucket,
    }
}

/// Classify the whole cohort. A country qualifying for no horizon stays in
/// the result but will be unreachable through any horizon-qualified query;
/// that is expected and logged rather than treated as an error.
pub fn classify_cohort(
    dataset: &CountryDataset,
    scores: &BTreeMap<String, ScorePair>,
) -> BTreeMap<String, CountryClassification> {
    let mut classifications = BTreeMap::new();

    for record in dataset.countries() {
        let Some(score) = scores.get(&record.name) else {
            continue;
        };
        let classification = classify(record, score.ethical);
        if classification.horizons.is_empty() {
            warn!(country = %record.name, "country qualifies for no investment horizon");
        }
        classifications.insert(record.name.clone(), classification);
    }

    classifications
}
