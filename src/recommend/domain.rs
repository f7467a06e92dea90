use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographical region per the UN M49 top-level grouping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Europe,
    Asia,
    Oceania,
    Americas,
    Africa,
}

impl Region {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Europe,
            Self::Asia,
            Self::Oceania,
            Self::Americas,
            Self::Africa,
        ]
    }

    /// Index token used to address the category tree.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Europe => "europe",
            Self::Asia => "asia",
            Self::Oceania => "oceania",
            Self::Americas => "americas",
            Self::Africa => "africa",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Europe => "Europe",
            Self::Asia => "Asia",
            Self::Oceania => "Oceania",
            Self::Americas => "Americas",
            Self::Africa => "Africa",
        }
    }
}

/// Economic development status derived from the M49 developed-country flag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentStatus {
    Developed,
    Emerging,
}

impl DevelopmentStatus {
    pub const fn ordered() -> [Self; 2] {
        [Self::Developed, Self::Emerging]
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::Developed => "developed",
            Self::Emerging => "emerging",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Developed => "Developed",
            Self::Emerging => "Emerging",
        }
    }
}

/// Investment time frame, derived from GDP growth trends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    LongRun,
    ShortRun,
}

impl Horizon {
    pub const fn ordered() -> [Self; 2] {
        [Self::LongRun, Self::ShortRun]
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::LongRun => "long run",
            Self::ShortRun => "short run",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LongRun => "Long Run",
            Self::ShortRun => "Short Run",
        }
    }
}

/// Economic sector membership derived from sector shares of GDP.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Primary,
    Secondary,
    Tertiary,
}

impl Sector {
    pub const fn ordered() -> [Self; 3] {
        [Self::Primary, Self::Secondary, Self::Tertiary]
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::Tertiary => "Tertiary",
        }
    }
}

/// Coarse good/bad classification from the weighted ethical score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EthicalBucket {
    Good,
    Bad,
}

impl EthicalBucket {
    pub const fn ordered() -> [Self; 2] {
        [Self::Good, Self::Bad]
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }
}

/// Raised when a criterion string matches no enumeration value.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} '{value}'")]
pub struct UnknownCriterion {
    pub field: &'static str,
    pub value: String,
}

fn canonical(value: &str) -> String {
    value
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

macro_rules! criterion_from_str {
    ($ty:ty, $field:literal) => {
        impl FromStr for $ty {
            type Err = UnknownCriterion;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let wanted = canonical(value);
                <$ty>::ordered()
                    .into_iter()
                    .find(|candidate| candidate.token() == wanted)
                    .ok_or_else(|| UnknownCriterion {
                        field: $field,
                        value: value.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

criterion_from_str!(Region, "region");
criterion_from_str!(DevelopmentStatus, "development status");
criterion_from_str!(Horizon, "investment horizon");
criterion_from_str!(Sector, "sector");
criterion_from_str!(EthicalBucket, "ethical bucket");

/// The ordered five-token address of a category-tree leaf. Order is
/// significant: it encodes the tree's nesting, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriteriaPath {
    pub region: Region,
    pub development: DevelopmentStatus,
    pub horizon: Horizon,
    pub sector: Sector,
    pub bucket: EthicalBucket,
}

impl CriteriaPath {
    pub const LEN: usize = 5;

    pub fn tokens(&self) -> [&'static str; Self::LEN] {
        [
            self.region.token(),
            self.development.token(),
            self.horizon.token(),
            self.sector.token(),
            self.bucket.token(),
        ]
    }

    /// Every path differing from this one only at `position` (0 = region,
    /// 4 = ethical bucket), substituting each other enumeration value.
    pub fn alternatives(&self, position: usize) -> Vec<CriteriaPath> {
        match position {
            0 => Region::ordered()
                .into_iter()
                .filter(|region| *region != self.region)
                .map(|region| CriteriaPath { region, ..*self })
                .collect(),
            1 => DevelopmentStatus::ordered()
                .into_iter()
                .filter(|development| *development != self.development)
                .map(|development| CriteriaPath {
                    development,
                    ..*self
                })
                .collect(),
            2 => Horizon::ordered()
                .into_iter()
                .filter(|horizon| *horizon != self.horizon)
                .map(|horizon| CriteriaPath { horizon, ..*self })
                .collect(),
            3 => Sector::ordered()
                .into_iter()
                .filter(|sector| *sector != self.sector)
                .map(|sector| CriteriaPath { sector, ..*self })
                .collect(),
            4 => EthicalBucket::ordered()
                .into_iter()
                .filter(|bucket| *bucket != self.bucket)
                .map(|bucket| CriteriaPath { bucket, ..*self })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// One of the three ethical priority areas a user ranks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EthicalArea {
    Environment,
    Equity,
    Labour,
}

impl EthicalArea {
    /// SDG goal numbers contributing to this area's group average.
    pub const fn goals(self) -> &'static [u8] {
        match self {
            Self::Environment => &[7, 11, 12, 13, 14, 15],
            Self::Equity => &[5, 10, 16],
            Self::Labour => &[1, 2, 3, 4, 6],
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Environment => "Environment",
            Self::Equity => "Equity",
            Self::Labour => "Fair Labour Treatment",
        }
    }
}

/// User ranking of the three ethical areas, 1 being the highest priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRanking {
    pub environment: u8,
    pub equity: u8,
    pub labour: u8,
}

/// Validation errors for an ethical priority ranking.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PriorityError {
    #[error("{area} rank {rank} is out of range (expected 1-3)")]
    OutOfRange { area: &'static str, rank: u8 },
    #[error("ethical priority ranks must be distinct")]
    Repeated,
}

impl PriorityRanking {
    /// The three areas ordered by rank, highest priority first.
    pub fn ordered(&self) -> Result<[EthicalArea; 3], PriorityError> {
        let pairs = [
            (self.environment, EthicalArea::Environment),
            (self.equity, EthicalArea::Equity),
            (self.labour, EthicalArea::Labour),
        ];

        let mut slots: [Option<EthicalArea>; 3] = [None; 3];
        for (rank, area) in pairs {
            if !(1..=3).contains(&rank) {
                return Err(PriorityError::OutOfRange {
                    area: area.label(),
                    rank,
                });
            }
            let slot = &mut slots[usize::from(rank) - 1];
            if slot.is_some() {
                return Err(PriorityError::Repeated);
            }
            *slot = Some(area);
        }

        match slots {
            [Some(first), Some(second), Some(third)] => Ok([first, second, third]),
            _ => Err(PriorityError::Repeated),
        }
    }
}

/// Economic and ethical score for one country.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePair {
    pub economic: f64,
    pub ethical: f64,
}

impl ScorePair {
    pub fn average(&self) -> f64 {
        (self.economic + self.ethical) / 2.0
    }
}

/// How the resolver arrived at its result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Exact,
    Relaxed,
    Fallback,
}

impl MatchMode {
    /// Numeric flag consumed by presentation layers: 0 exact, 1 relaxed,
    /// 2 fallback.
    pub const fn code(self) -> u8 {
        match self {
            Self::Exact => 0,
            Self::Relaxed => 1,
            Self::Fallback => 2,
        }
    }

    pub const fn disclaimer(self) -> Option<&'static str> {
        match self {
            Self::Exact => None,
            Self::Relaxed => Some(
                "No country matched every criterion; showing close matches found by relaxing one criterion.",
            ),
            Self::Fallback => Some(
                "No country matched even the relaxed criteria; showing the top performers by economic score.",
            ),
        }
    }
}
