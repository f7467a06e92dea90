use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{
    AnnualObservation, CountryDataset, CountryRecord, SdgGoal, SdgRecord, SectorShares, UNIVERSE,
};
use crate::recommend::domain::Region;

pub(crate) const GDP_FILE: &str = "gdp.csv";
pub(crate) const CPI_FILE: &str = "cpi.csv";
pub(crate) const SECTOR_FILE: &str = "sector_info.csv";
pub(crate) const INTEREST_FILE: &str = "interest_info.csv";
pub(crate) const SDG_FILE: &str = "sdg_info.csv";
pub(crate) const REGION_FILE: &str = "country_info.csv";

/// Errors raised while reading or assembling the CSV snapshots.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {name}: {source}")]
    Parse {
        name: &'static str,
        source: csv::Error,
    },
    #[error("{name} is missing column '{column}'")]
    MissingColumn {
        name: &'static str,
        column: String,
    },
    #[error("{name} has no row for {country}")]
    MissingCountry {
        name: &'static str,
        country: String,
    },
    #[error("unknown region '{value}' for ISO code {iso}")]
    UnknownRegion { value: String, iso: String },
}

fn trimmed_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

#[derive(Debug, Deserialize)]
struct SeriesRow {
    country: String,
    year: i32,
    value: f64,
}

/// Parse a long-format `country,year,value` indicator snapshot. Each
/// country's observations come back year-ascending.
pub fn parse_annual_series<R: Read>(
    name: &'static str,
    reader: R,
) -> Result<BTreeMap<String, Vec<AnnualObservation>>, DatasetError> {
    let mut series: BTreeMap<String, Vec<AnnualObservation>> = BTreeMap::new();

    for row in trimmed_reader(reader).deserialize::<SeriesRow>() {
        let row = row.map_err(|source| DatasetError::Parse { name, source })?;
        series.entry(row.country).or_default().push(AnnualObservation {
            year: row.year,
            value: row.value,
        });
    }

    for observations in series.values_mut() {
        observations.sort_by_key(|observation| observation.year);
    }

    Ok(series)
}

#[derive(Debug, Deserialize)]
struct SectorRow {
    #[serde(rename = "Country/Economy")]
    country: String,
    #[serde(rename = "Agriculture % of GDP")]
    agriculture: f64,
    #[serde(rename = "Industry % of GDP")]
    industry: f64,
    #[serde(rename = "Services % of GDP")]
    services: f64,
}

/// Parse the sector-participation snapshot.
pub fn parse_sector_shares<R: Read>(
    reader: R,
) -> Result<BTreeMap<String, SectorShares>, DatasetError> {
    let mut shares = BTreeMap::new();

    for row in trimmed_reader(reader).deserialize::<SectorRow>() {
        let row = row.map_err(|source| DatasetError::Parse {
            name: SECTOR_FILE,
            source,
        })?;
        shares.insert(
            row.country,
            SectorShares {
                agriculture: row.agriculture,
                industry: row.industry,
                services: row.services,
            },
        );
    }

    Ok(shares)
}

/// Parse the wide World-Bank interest-rate layout: one row per country,
/// one column per year. Cells that are empty or non-numeric are skipped,
/// matching how gaps appear in the published data.
pub fn parse_interest_rates<R: Read>(
    reader: R,
) -> Result<BTreeMap<String, Vec<AnnualObservation>>, DatasetError> {
    let mut csv_reader = trimmed_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| DatasetError::Parse {
            name: INTEREST_FILE,
            source,
        })?
        .clone();

    let name_column = headers
        .iter()
        .position(|header| header == "Country Name")
        .ok_or_else(|| DatasetError::MissingColumn {
            name: INTEREST_FILE,
            column: "Country Name".to_string(),
        })?;

    let year_columns: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| header.parse::<i32>().ok().map(|year| (index, year)))
        .collect();

    let mut rates: BTreeMap<String, Vec<AnnualObservation>> = BTreeMap::new();

    for record in csv_reader.records() {
        let record = record.map_err(|source| DatasetError::Parse {
            name: INTEREST_FILE,
            source,
        })?;
        let country = match record.get(name_column) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => continue,
        };

        let mut observations = Vec::new();
        for (index, year) in &year_columns {
            if let Some(value) = record.get(*index).and_then(|cell| cell.parse::<f64>().ok()) {
                observations.push(AnnualObservation { year: *year, value });
            }
        }
        observations.sort_by_key(|observation| observation.year);
        rates.insert(country, observations);
    }

    Ok(rates)
}

fn trend_rank(text: &str) -> u8 {
    match text.trim() {
        "Decreasing" => 40,
        "Score stagnating or increasing at less than 50% of required rate" => 60,
        "Score moderately improving, insufficient to attain goal" => 80,
        "On track or maintaining SDG achievement" => 100,
        _ => 20,
    }
}

/// Parse the SDG snapshot: per country, a trend phrase and a score for each
/// of the 17 goals. Trend text maps onto the 20..100 rank scale; a score
/// that fails integer conversion becomes the -1 missing-data sentinel.
pub fn parse_sdg_records<R: Read>(reader: R) -> Result<BTreeMap<String, SdgRecord>, DatasetError> {
    let mut csv_reader = trimmed_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| DatasetError::Parse {
            name: SDG_FILE,
            source,
        })?
        .clone();

    let column = |label: String| -> Result<usize, DatasetError> {
        headers
            .iter()
            .position(|header| header == label)
            .ok_or(DatasetError::MissingColumn {
                name: SDG_FILE,
                column: label,
            })
    };

    let country_column = column("country_label".to_string())?;
    let mut goal_columns = Vec::with_capacity(17);
    for goal in 1..=17 {
        let trend = column(format!("Goal {goal} Trend"))?;
        let score = column(format!("Goal {goal} Score"))?;
        goal_columns.push((trend, score));
    }

    let mut records = BTreeMap::new();

    for record in csv_reader.records() {
        let record = record.map_err(|source| DatasetError::Parse {
            name: SDG_FILE,
            source,
        })?;
        let country = match record.get(country_column) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => continue,
        };

        let mut goals = [SdgGoal { trend: 20, score: -1 }; 17];
        for (slot, (trend_column, score_column)) in goals.iter_mut().zip(&goal_columns) {
            let trend = record.get(*trend_column).map(trend_rank).unwrap_or(20);
            let score = record
                .get(*score_column)
                .and_then(|cell| cell.parse::<i32>().ok())
                .unwrap_or(-1);
            *slot = SdgGoal { trend, score };
        }

        records.insert(country, SdgRecord::new(goals));
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct RegionRow {
    #[serde(rename = "ISO Code (usa-census)")]
    iso: String,
    #[serde(rename = "Region Name_en (M49)")]
    region: String,
    #[serde(rename = "Developed / Developing Countries (M49)")]
    development: String,
}

/// Parse the region/development snapshot, keyed by ISO code. The literal
/// value `Developed` marks a developed country; anything else is emerging.
pub fn parse_region_records<R: Read>(
    reader: R,
) -> Result<BTreeMap<String, (Region, bool)>, DatasetError> {
    let mut records = BTreeMap::new();

    for row in trimmed_reader(reader).deserialize::<RegionRow>() {
        let row = row.map_err(|source| DatasetError::Parse {
            name: REGION_FILE,
            source,
        })?;
        let region: Region = row
            .region
            .parse()
            .map_err(|_| DatasetError::UnknownRegion {
                value: row.region.clone(),
                iso: row.iso.clone(),
            })?;
        let developed = row.development == "Developed";
        records.insert(row.iso, (region, developed));
    }

    Ok(records)
}

/// Join the per-source maps into one bundle over the fixed universe.
/// GDP, CPI, SDG, and region coverage is mandatory; sector and interest
/// data may be absent per country.
pub fn assemble(
    mut gdp: BTreeMap<String, Vec<AnnualObservation>>,
    mut cpi: BTreeMap<String, Vec<AnnualObservation>>,
    mut interest: BTreeMap<String, Vec<AnnualObservation>>,
    mut sectors: BTreeMap<String, SectorShares>,
    mut sdg: BTreeMap<String, SdgRecord>,
    regions: BTreeMap<String, (Region, bool)>,
) -> Result<CountryDataset, DatasetError> {
    let mut records = Vec::with_capacity(UNIVERSE.len());

    for (name, iso) in UNIVERSE {
        let missing = |file: &'static str| DatasetError::MissingCountry {
            name: file,
            country: name.to_string(),
        };

        let gdp_series = gdp.remove(name).ok_or_else(|| missing(GDP_FILE))?;
        let cpi_series = cpi.remove(name).ok_or_else(|| missing(CPI_FILE))?;
        let sdg_record = sdg.remove(name).ok_or_else(|| missing(SDG_FILE))?;
        let (region, developed) = regions
            .get(iso)
            .copied()
            .ok_or_else(|| missing(REGION_FILE))?;

        records.push(CountryRecord {
            name: name.to_string(),
            iso_code: iso.to_string(),
            region,
            developed,
            gdp: gdp_series,
            cpi: cpi_series,
            interest: interest.remove(name).unwrap_or_default(),
            sectors: sectors.remove(name),
            sdg: sdg_record,
        });
    }

    Ok(CountryDataset::from_records(records))
}

pub(crate) fn load_dataset(data_dir: &Path) -> Result<CountryDataset, DatasetError> {
    let open = |name: &'static str| -> Result<File, DatasetError> {
        let path = data_dir.join(name);
        File::open(&path).map_err(|source| DatasetError::Open { path, source })
    };

    let gdp = parse_annual_series(GDP_FILE, open(GDP_FILE)?)?;
    let cpi = parse_annual_series(CPI_FILE, open(CPI_FILE)?)?;
    let interest = parse_interest_rates(open(INTEREST_FILE)?)?;
    let sectors = parse_sector_shares(open(SECTOR_FILE)?)?;
    let sdg = parse_sdg_records(open(SDG_FILE)?)?;
    let regions = parse_region_records(open(REGION_FILE)?)?;

    assemble(gdp, cpi, interest, sectors, sdg, regions)
}
