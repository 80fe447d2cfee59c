//! Input row types.
//!
//! Both tables arrive pre-loaded; the serde names match the source
//! dataset's column headers exactly, non-snake-case ones included.

use serde::{Deserialize, Serialize};

/// One row of the simple migration-steps table: a single from/to hop with
/// both endpoints' coordinates. Input to the aggregated builders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub from_code: String,
    pub to_code: String,
    pub from_lon: f64,
    pub from_lat: f64,
    pub to_lon: f64,
    pub to_lat: f64,
}

impl StepRecord {
    pub fn new(from_code: impl Into<String>, to_code: impl Into<String>) -> Self {
        Self {
            from_code: from_code.into(),
            to_code: to_code.into(),
            ..Self::default()
        }
    }
}

/// One full migration trajectory: hometown, first relocation, and current
/// residence, with timing and socioeconomic attributes.
///
/// `gender` and `edu_level` stay as raw survey codes here; they are
/// validated against the closed enumerations when edges are built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    // Full-resolution location codes.
    pub hometown_code: String,
    pub first_flow_code: String,
    pub current_code: String,

    // Code hierarchy per stage.
    pub hometown_province_code: String,
    pub hometown_city_code: String,
    pub hometown_county_code: String,
    pub first_flow_province_code: String,
    pub first_flow_city_code: String,
    pub first_flow_county_code: String,
    pub current_province_code: String,
    pub current_city_code: String,
    pub current_county_code: String,

    // Coordinates per stage.
    pub hometown_lon: f64,
    pub hometown_lat: f64,
    pub first_lon: f64,
    pub first_lat: f64,
    pub current_lon: f64,
    pub current_lat: f64,

    // Display names used as node ids by the temporal builders.
    #[serde(rename = "hometown_Name_Prefecture")]
    pub hometown_name_prefecture: String,
    #[serde(rename = "first_Name_Prefecture")]
    pub first_name_prefecture: String,
    pub current_city: String,

    // Timing of each flow.
    pub year_first_flow: i32,
    pub month_first_flow: u8,
    pub year_current_flow: i32,
    pub month_current_flow: u8,

    // Demographics, raw survey codes.
    pub gender: u8,
    pub edu_level: u8,

    // Socioeconomics.
    pub average_family_cost_per_month: f64,
    pub average_family_income_per_month: f64,

    // Trajectory-level attributes.
    pub num_flows_total: u32,
    pub if_stay: bool,
    pub if_change_household_local: bool,
    pub how_long_to_stay: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefecture_name_columns_deserialize() {
        let json = r#"{
            "hometown_code": "110101", "first_flow_code": "310101", "current_code": "310101",
            "hometown_province_code": "11", "hometown_city_code": "1101", "hometown_county_code": "110101",
            "first_flow_province_code": "31", "first_flow_city_code": "3101", "first_flow_county_code": "310101",
            "current_province_code": "31", "current_city_code": "3101", "current_county_code": "310101",
            "hometown_lon": 116.4, "hometown_lat": 39.9,
            "first_lon": 121.5, "first_lat": 31.2,
            "current_lon": 121.5, "current_lat": 31.2,
            "hometown_Name_Prefecture": "Beijing", "first_Name_Prefecture": "Shanghai",
            "current_city": "Shanghai",
            "year_first_flow": 2010, "month_first_flow": 3,
            "year_current_flow": 2012, "month_current_flow": 7,
            "gender": 2, "edu_level": 5,
            "average_family_cost_per_month": 3500.0,
            "average_family_income_per_month": 9000.0,
            "num_flows_total": 2, "if_stay": true,
            "if_change_household_local": false, "how_long_to_stay": 24
        }"#;
        let record: FlowRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.hometown_name_prefecture, "Beijing");
        assert_eq!(record.first_name_prefecture, "Shanghai");
        assert_eq!(record.year_current_flow, 2012);
        assert_eq!(record.edu_level, 5);
    }
}
