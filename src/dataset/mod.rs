//! In-memory country data bundle assembled from CSV snapshots. The engine
//! never performs I/O itself; everything is loaded up front and passed by
//! reference.

mod loader;

pub use loader::{
    assemble, parse_annual_series, parse_interest_rates, parse_region_records, parse_sdg_records,
    parse_sector_shares, DatasetError,
};

use crate::recommend::domain::Region;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Countries the recommender covers, as (display name, ISO code) pairs.
/// Raw datasets are filtered down to this universe during assembly.
pub const UNIVERSE: [(&str, &str); 30] = [
    ("United States", "US"),
    ("Canada", "CA"),
    ("Brazil", "BR"),
    ("Mexico", "MX"),
    ("Argentina", "AR"),
    ("Uruguay", "UY"),
    ("South Africa", "ZA"),
    ("Mauritius", "MU"),
    ("Botswana", "BW"),
    ("Australia", "AU"),
    ("New Zealand", "NZ"),
    ("Singapore", "SG"),
    ("China", "CN"),
    ("India", "IN"),
    ("Japan", "JP"),
    ("Russia", "RU"),
    ("South Korea", "KR"),
    ("Indonesia", "ID"),
    ("Saudi Arabia", "SA"),
    ("Qatar", "QA"),
    ("Turkey", "TR"),
    ("Oman", "OM"),
    ("Germany", "DE"),
    ("United Kingdom", "GB"),
    ("France", "FR"),
    ("Italy", "IT"),
    ("Spain", "ES"),
    ("Netherlands", "NL"),
    ("Switzerland", "CH"),
    ("Poland", "PL"),
];

/// One annual observation of an indicator level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualObservation {
    pub year: i32,
    pub value: f64,
}

/// Sector contributions to GDP, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorShares {
    pub agriculture: f64,
    pub industry: f64,
    pub services: f64,
}

/// Score and improvement trend for a single SDG goal. The trend is already
/// mapped onto the 20/40/60/80/100 rank scale; a score of -1 marks missing
/// data and deliberately propagates into averages unfiltered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdgGoal {
    pub trend: u8,
    pub score: i32,
}

impl SdgGoal {
    /// Average of score and trend, the per-goal value every scoring formula
    /// consumes.
    pub fn blended(&self) -> f64 {
        (f64::from(self.trend) + f64::from(self.score)) / 2.0
    }
}

/// The 17-goal SDG record for one country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdgRecord {
    goals: [SdgGoal; 17],
}

impl SdgRecord {
    pub fn new(goals: [SdgGoal; 17]) -> Self {
        Self { goals }
    }

    /// Look up a goal by its 1-based number.
    pub fn goal(&self, number: u8) -> SdgGoal {
        self.goals[usize::from(number) - 1]
    }
}

/// Everything the engine knows about one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub iso_code: String,
    pub region: Region,
    pub developed: bool,
    /// Annual GDP levels, year-ascending.
    pub gdp: Vec<AnnualObservation>,
    /// Annual CPI levels, year-ascending.
    pub cpi: Vec<AnnualObservation>,
    /// Annual interest rates, year-ascending. May be empty; absence is
    /// penalized at scoring time rather than imputed.
    pub interest: Vec<AnnualObservation>,
    /// Absent when the country is missing from the sector snapshot, in
    /// which case it is treated as belonging to all three sectors.
    pub sectors: Option<SectorShares>,
    pub sdg: SdgRecord,
}

/// The assembled data bundle the engine runs against. Built once per
/// process and shared; queries never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDataset {
    countries: BTreeMap<String, CountryRecord>,
}

impl CountryDataset {
    pub fn from_records(records: Vec<CountryRecord>) -> Self {
        let countries = records
            .into_iter()
            .map(|record| (record.name.clone(), record))
            .collect();
        Self { countries }
    }

    pub fn countries(&self) -> impl Iterator<Item = &CountryRecord> {
        self.countries.values()
    }

    pub fn get(&self, name: &str) -> Option<&CountryRecord> {
        self.countries.get(name)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Load and assemble the bundle from a directory of CSV snapshots.
    pub fn load(data_dir: &std::path::Path) -> Result<Self, DatasetError> {
        loader::load_dataset(data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdg_goal_blends_score_and_trend() {
        let goal = SdgGoal {
            trend: 80,
            score: 60,
        };
        assert!((goal.blended() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_sdg_score_depresses_the_blend() {
        let goal = SdgGoal {
            trend: 40,
            score: -1,
        };
        assert!((goal.blended() - 19.5).abs() < f64::EPSILON);
    }

    #[test]
    fn sdg_record_is_one_indexed() {
        let mut goals = [SdgGoal {
            trend: 20,
            score: 0,
        }; 17];
        goals[7] = SdgGoal {
            trend: 100,
            score: 90,
        };
        let record = SdgRecord::new(goals);
        assert_eq!(record.goal(8).score, 90);
        assert_eq!(record.goal(1).trend, 20);
    }

    #[test]
    fn universe_covers_thirty_countries_with_unique_codes() {
        let mut codes: Vec<&str> = UNIVERSE.iter().map(|(_, code)| *code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), UNIVERSE.len());
    }
}
