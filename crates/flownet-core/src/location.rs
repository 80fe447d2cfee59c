//! Location codes, spatial granularity, and the geo-reference lookup.
//!
//! Administrative codes nest by prefix: a 6-digit county code starts with
//! its 4-digit prefecture code, which starts with its 2-digit province
//! code. Aggregating a graph to a coarser granularity is therefore a
//! prefix truncation.

use crate::error::{FlowError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Spatial resolution at which location codes collapse into nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Full 6-digit code, one node per county.
    County,
    /// First 4 digits, one node per prefecture-level city.
    Prefecture,
    /// First 2 digits, one node per province.
    Province,
}

impl Granularity {
    /// Truncates a raw code to this granularity's prefix.
    ///
    /// County keeps the code unchanged. Codes shorter than the prefix
    /// length are returned whole.
    pub fn truncate<'a>(&self, code: &'a str) -> &'a str {
        let len = match self {
            Self::County => return code,
            Self::Prefecture => 4,
            Self::Province => 2,
        };
        if code.len() > len {
            &code[..len]
        } else {
            code
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::County => "county",
            Self::Prefecture => "prefecture",
            Self::Province => "province",
        }
    }
}

impl FromStr for Granularity {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "county" => Ok(Self::County),
            "prefecture" => Ok(Self::Prefecture),
            "province" => Ok(Self::Province),
            other => Err(FlowError::InvalidGranularity(other.to_string())),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference table mapping an integer administrative code to coordinates.
#[derive(Debug, Clone)]
pub struct GeoTable {
    name: &'static str,
    coords: HashMap<u32, (f64, f64)>,
}

impl GeoTable {
    /// Creates a named table from `(code, lon, lat)` rows.
    pub fn from_rows(name: &'static str, rows: impl IntoIterator<Item = (u32, f64, f64)>) -> Self {
        Self {
            name,
            coords: rows
                .into_iter()
                .map(|(code, lon, lat)| (code, (lon, lat)))
                .collect(),
        }
    }

    /// Looks up `(lon, lat)` for a code. Missing codes are an error, not
    /// a default position.
    pub fn get(&self, code: u32) -> Result<(f64, f64)> {
        self.coords
            .get(&code)
            .copied()
            .ok_or(FlowError::UnknownLocation {
                table: self.name,
                code,
            })
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// A location code resolved to the requested granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Node identifier at the chosen granularity.
    pub id: String,
    pub lon: f64,
    pub lat: f64,
}

/// Maps raw location codes to node identifiers and coordinates.
///
/// County-level resolution uses the coordinates the record itself carries;
/// coarser granularities look the truncated prefix up in the matching
/// reference table.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    prefectures: GeoTable,
    provinces: GeoTable,
}

impl LocationResolver {
    pub fn new(prefectures: GeoTable, provinces: GeoTable) -> Self {
        tracing::debug!(
            prefectures = prefectures.len(),
            provinces = provinces.len(),
            "location resolver ready"
        );
        Self {
            prefectures,
            provinces,
        }
    }

    /// Resolves a raw code at the given granularity.
    ///
    /// `own_coords` are the record's per-stage coordinates, used verbatim
    /// at county granularity. Fails if a truncated prefix is not numeric
    /// or is absent from the reference table.
    pub fn resolve(
        &self,
        raw_code: &str,
        granularity: Granularity,
        own_coords: (f64, f64),
    ) -> Result<ResolvedLocation> {
        let id = granularity.truncate(raw_code);
        let (lon, lat) = match granularity {
            Granularity::County => own_coords,
            Granularity::Prefecture => self.prefectures.get(parse_prefix(id)?)?,
            Granularity::Province => self.provinces.get(parse_prefix(id)?)?,
        };
        Ok(ResolvedLocation {
            id: id.to_string(),
            lon,
            lat,
        })
    }
}

fn parse_prefix(prefix: &str) -> Result<u32> {
    prefix
        .parse::<u32>()
        .map_err(|_| FlowError::MalformedCode(prefix.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> LocationResolver {
        LocationResolver::new(
            GeoTable::from_rows("prefecture", [(1100, 116.4, 39.9), (3100, 121.5, 31.2)]),
            GeoTable::from_rows("province", [(11, 116.4, 39.9), (31, 121.5, 31.2)]),
        )
    }

    #[test]
    fn test_truncation_is_deterministic() {
        assert_eq!(Granularity::County.truncate("110101"), "110101");
        assert_eq!(Granularity::Prefecture.truncate("110101"), "1101");
        assert_eq!(Granularity::Province.truncate("110101"), "11");
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!("prefecture".parse::<Granularity>(), Ok(Granularity::Prefecture));
        assert_eq!(
            "district".parse::<Granularity>(),
            Err(FlowError::InvalidGranularity("district".to_string()))
        );
    }

    #[test]
    fn test_county_uses_record_coords() {
        let loc = resolver()
            .resolve("110101", Granularity::County, (116.39, 39.91))
            .unwrap();
        assert_eq!(loc.id, "110101");
        assert_eq!(loc.lon, 116.39);
        assert_eq!(loc.lat, 39.91);
    }

    #[test]
    fn test_prefecture_uses_reference_table() {
        let loc = resolver()
            .resolve("310012", Granularity::Prefecture, (0.0, 0.0))
            .unwrap();
        assert_eq!(loc.id, "3100");
        assert_eq!(loc.lon, 121.5);
        assert_eq!(loc.lat, 31.2);
    }

    #[test]
    fn test_missing_code_is_an_error() {
        let err = resolver()
            .resolve("990101", Granularity::Province, (0.0, 0.0))
            .unwrap_err();
        assert_eq!(
            err,
            FlowError::UnknownLocation {
                table: "province",
                code: 99
            }
        );
    }

    #[test]
    fn test_non_numeric_prefix_is_an_error() {
        let err = resolver()
            .resolve("ab0101", Granularity::Province, (0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, FlowError::MalformedCode("ab".to_string()));
    }
}
