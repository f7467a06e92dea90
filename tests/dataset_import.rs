//! Contract tests for the CSV snapshot loaders and dataset assembly.

use std::collections::BTreeMap;
use std::io::Cursor;

use geoinvest::dataset::{
    assemble, parse_annual_series, parse_interest_rates, parse_region_records, parse_sdg_records,
    parse_sector_shares, AnnualObservation, DatasetError, SdgRecord, SectorShares, UNIVERSE,
};
use geoinvest::recommend::domain::Region;

fn sdg_csv(country: &str, trend: &str, score: &str) -> String {
    let mut header = String::from("country_label");
    for goal in 1..=17 {
        header.push_str(&format!(",Goal {goal} Trend,Goal {goal} Score"));
    }

    let mut row = String::from(country);
    for _ in 1..=17 {
        row.push_str(&format!(",\"{trend}\",{score}"));
    }

    format!("{header}\n{row}\n")
}

#[test]
fn sdg_rows_map_trend_text_and_score_sentinels() {
    let csv = sdg_csv(
        "Canada",
        "Score moderately improving, insufficient to attain goal",
        "78",
    );
    let records = parse_sdg_records(Cursor::new(csv)).expect("sdg parses");
    let canada = records.get("Canada").expect("canada present");
    assert_eq!(canada.goal(1).trend, 80);
    assert_eq!(canada.goal(17).score, 78);
}

#[test]
fn unparseable_sdg_score_becomes_the_missing_sentinel() {
    let csv = sdg_csv("Canada", "Decreasing", "n/a");
    let records = parse_sdg_records(Cursor::new(csv)).expect("sdg parses");
    let canada = records.get("Canada").expect("canada present");
    assert_eq!(canada.goal(5).trend, 40);
    assert_eq!(canada.goal(5).score, -1);
    // The sentinel deliberately drags the blended value down.
    assert!(canada.goal(5).blended() < 20.0);
}

#[test]
fn missing_goal_column_is_a_descriptive_error() {
    // Header stops at goal 16, so goal 17 lookups must fail.
    let mut header = String::from("country_label");
    for goal in 1..=16 {
        header.push_str(&format!(",Goal {goal} Trend,Goal {goal} Score"));
    }
    let csv = format!("{header}\nCanada\n");

    let err = parse_sdg_records(Cursor::new(csv)).expect_err("column is missing");
    match err {
        DatasetError::MissingColumn { column, .. } => {
            assert_eq!(column, "Goal 17 Trend");
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn sector_rows_parse_the_share_columns() {
    let csv = "Country/Economy,Agriculture % of GDP,Industry % of GDP,Services % of GDP\n\
               Canada,1.9,24.1,67.7\n";
    let shares = parse_sector_shares(Cursor::new(csv)).expect("sectors parse");
    let canada = shares.get("Canada").expect("canada present");
    assert!((canada.agriculture - 1.9).abs() < 1e-9);
    assert!((canada.industry - 24.1).abs() < 1e-9);
    assert!((canada.services - 67.7).abs() < 1e-9);
}

#[test]
fn region_rows_key_by_iso_code() {
    let csv = "ISO Code (usa-census),Region Name_en (M49),Developed / Developing Countries (M49)\n\
               CA,Americas,Developed\n\
               IN,Asia,Developing\n";
    let records = parse_region_records(Cursor::new(csv)).expect("regions parse");
    assert_eq!(records.get("CA"), Some(&(Region::Americas, true)));
    assert_eq!(records.get("IN"), Some(&(Region::Asia, false)));
}

fn full_inputs() -> (
    BTreeMap<String, Vec<AnnualObservation>>,
    BTreeMap<String, Vec<AnnualObservation>>,
    BTreeMap<String, Vec<AnnualObservation>>,
    BTreeMap<String, SectorShares>,
    BTreeMap<String, SdgRecord>,
    BTreeMap<String, (Region, bool)>,
) {
    let mut gdp = BTreeMap::new();
    let mut cpi = BTreeMap::new();
    let mut interest = BTreeMap::new();
    let mut sectors = BTreeMap::new();
    let mut sdg = BTreeMap::new();
    let mut regions = BTreeMap::new();

    let series = vec![
        AnnualObservation {
            year: 2000,
            value: 100.0,
        },
        AnnualObservation {
            year: 2001,
            value: 103.0,
        },
    ];
    let sdg_csv_text = sdg_csv("Anywhere", "Decreasing", "50");
    let sdg_record = parse_sdg_records(Cursor::new(sdg_csv_text)).expect("sdg parses")["Anywhere"];

    for (name, iso) in UNIVERSE {
        gdp.insert(name.to_string(), series.clone());
        cpi.insert(name.to_string(), series.clone());
        interest.insert(name.to_string(), series.clone());
        sectors.insert(
            name.to_string(),
            SectorShares {
                agriculture: 5.0,
                industry: 30.0,
                services: 55.0,
            },
        );
        sdg.insert(name.to_string(), sdg_record);
        regions.insert(iso.to_string(), (Region::Americas, true));
    }

    (gdp, cpi, interest, sectors, sdg, regions)
}

#[test]
fn assembly_joins_every_universe_country() {
    let (gdp, cpi, interest, sectors, sdg, regions) = full_inputs();
    let dataset = assemble(gdp, cpi, interest, sectors, sdg, regions).expect("assembly succeeds");

    assert_eq!(dataset.len(), UNIVERSE.len());
    let canada = dataset.get("Canada").expect("canada assembled");
    assert_eq!(canada.iso_code, "CA");
    assert_eq!(canada.gdp.len(), 2);
    assert!(canada.sectors.is_some());
}

#[test]
fn assembly_tolerates_missing_interest_and_sector_rows() {
    let (gdp, cpi, mut interest, mut sectors, sdg, regions) = full_inputs();
    interest.remove("Canada");
    sectors.remove("Canada");

    let dataset = assemble(gdp, cpi, interest, sectors, sdg, regions).expect("assembly succeeds");
    let canada = dataset.get("Canada").expect("canada assembled");
    assert!(canada.interest.is_empty());
    assert!(canada.sectors.is_none());
}

#[test]
fn assembly_fails_fast_when_gdp_coverage_is_incomplete() {
    let (mut gdp, cpi, interest, sectors, sdg, regions) = full_inputs();
    gdp.remove("Japan");

    let err = assemble(gdp, cpi, interest, sectors, sdg, regions).expect_err("japan is missing");
    match err {
        DatasetError::MissingCountry { country, .. } => assert_eq!(country, "Japan"),
        other => panic!("expected MissingCountry, got {other:?}"),
    }
}

#[test]
fn annual_series_reader_round_trips_through_assembly() {
    let csv = "country,year,value\nCanada,2001,103.0\nCanada,2000,100.0\n";
    let series = parse_annual_series("gdp.csv", Cursor::new(csv)).expect("series parses");
    assert_eq!(
        series["Canada"],
        vec![
            AnnualObservation {
                year: 2000,
                value: 100.0
            },
            AnnualObservation {
                year: 2001,
                value: 103.0
            },
        ]
    );
}

#[test]
fn interest_reader_keeps_only_numeric_year_cells() {
    let csv = "Country Name,Country Code,Indicator Name,Indicator Code,1979,1980,1981\n\
               Canada,CA,Real interest rate,FR.INR.RINR,2.0,..,5.5\n";
    let rates = parse_interest_rates(Cursor::new(csv)).expect("rates parse");
    let canada = &rates["Canada"];
    assert_eq!(
        canada.as_slice(),
        &[
            AnnualObservation {
                year: 1979,
                value: 2.0
            },
            AnnualObservation {
                year: 1981,
                value: 5.5
            },
        ]
    );
}
