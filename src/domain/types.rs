//! Shared types for the transit mesh: zones, places, air quality and trip plans

use crate::domain::error::UnknownVariant;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generate a new UUIDv7 (time-sortable)
pub fn new_uuid_v7() -> String {
    Uuid::now_v7().to_string()
}

/// Current UTC time as RFC 3339 with millisecond precision
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Geographic partition of the transit network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Centre,
    Lac,
    Nord,
    Sud,
    Ouest,
    Est,
}

impl Zone {
    pub const ALL: [Zone; 6] = [Zone::Centre, Zone::Lac, Zone::Nord, Zone::Sud, Zone::Ouest, Zone::Est];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Centre => "Centre",
            Zone::Lac => "Lac",
            Zone::Nord => "Nord",
            Zone::Sud => "Sud",
            Zone::Ouest => "Ouest",
            Zone::Est => "Est",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::ALL
            .into_iter()
            .find(|zone| zone.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("zone", s))
    }
}

/// Category of a point of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    Cafe,
    Park,
    Hospital,
    Restaurant,
    Museum,
    Shop,
}

impl PlaceType {
    pub const ALL: [PlaceType; 6] = [
        PlaceType::Cafe,
        PlaceType::Park,
        PlaceType::Hospital,
        PlaceType::Restaurant,
        PlaceType::Museum,
        PlaceType::Shop,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceType::Cafe => "cafe",
            PlaceType::Park => "park",
            PlaceType::Hospital => "hospital",
            PlaceType::Restaurant => "restaurant",
            PlaceType::Museum => "museum",
            PlaceType::Shop => "shop",
        }
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlaceType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("place type", s))
    }
}

/// Point of interest owned by the places directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlaceType,
    pub zone: Zone,
}

/// Fields required to create a place
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlaceType,
    pub zone: Zone,
}

/// Shallow update: only the fields present are replaced
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacePatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<PlaceType>,
    pub zone: Option<Zone>,
}

/// Pollutant breakdown, each a fixed fraction of the AQI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    #[serde(rename = "NO2")]
    pub no2: f64,
    #[serde(rename = "CO2")]
    pub co2: f64,
    #[serde(rename = "O3")]
    pub o3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub zone: String,
    pub aqi: u32,
    pub pollutants: Pollutants,
}

/// Merged result of a trip planning request
///
/// `transport` is forwarded untouched from the transport directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub initial_zone: String,
    pub aqi: u32,
    pub recommended_zone: String,
    pub transport: serde_json::Value,
    pub places: Vec<Place>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_round_trips_through_str() {
        for zone in Zone::ALL {
            assert_eq!(zone.as_str().parse::<Zone>().unwrap(), zone);
        }
        assert!("centre".parse::<Zone>().is_err());
        assert!("Paris".parse::<Zone>().is_err());
    }

    #[test]
    fn test_place_serializes_type_field() {
        let place = Place {
            id: "1".to_string(),
            name: "Cafe Bleu".to_string(),
            kind: PlaceType::Cafe,
            zone: Zone::Centre,
        };
        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(json["type"], "cafe");
        assert_eq!(json["zone"], "Centre");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_pollutants_use_chemical_names() {
        let reading = AirQualityReading {
            zone: "Nord".to_string(),
            aqi: 60,
            pollutants: Pollutants { no2: 18.0, co2: 12.0, o3: 6.0 },
        };
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["pollutants"]["NO2"], 18.0);
        assert_eq!(json["pollutants"]["CO2"], 12.0);
        assert_eq!(json["pollutants"]["O3"], 6.0);
    }

    #[test]
    fn test_patch_accepts_partial_fields() {
        let patch: PlacePatch = serde_json::from_str(r#"{"zone":"Lac"}"#).unwrap();
        assert_eq!(patch.zone, Some(Zone::Lac));
        assert!(patch.name.is_none());
        assert!(patch.kind.is_none());
    }
}
