//! GeoInvest: recommends countries for investment by combining economic
//! indicators (GDP growth, inflation, interest rates) with UN SDG scores,
//! filtered by user criteria and ranked by a user-weighted ethical priority.

pub mod config;
pub mod dataset;
pub mod error;
pub mod recommend;
pub mod telemetry;
