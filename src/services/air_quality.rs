//! Air quality rule and its standalone HTTP service
//!
//! The reading is a pure function of the zone name: any zone whose name
//! contains "centre" (case-insensitive) scores 130, everything else 60.

use crate::domain::types::{AirQualityReading, Pollutants};
use crate::io::http::{endpoint_not_found, json_response, ApiRequest, ApiResponse, Router};
use async_trait::async_trait;
use hyper::{Method, StatusCode};

const CENTRE_AQI: u32 = 130;
const BASELINE_AQI: u32 = 60;

const NO2_FRACTION: f64 = 0.3;
const CO2_FRACTION: f64 = 0.2;
const O3_FRACTION: f64 = 0.1;

/// Zone reported by the service when the caller gives none
const UNKNOWN_ZONE: &str = "unknown";

/// Compute the AQI reading for a zone. Never fails.
pub fn compute_aqi(zone: &str) -> AirQualityReading {
    let aqi = if zone.to_lowercase().contains("centre") { CENTRE_AQI } else { BASELINE_AQI };
    let base = f64::from(aqi);

    AirQualityReading {
        zone: zone.to_string(),
        aqi,
        pollutants: Pollutants {
            no2: base * NO2_FRACTION,
            co2: base * CO2_FRACTION,
            o3: base * O3_FRACTION,
        },
    }
}

/// HTTP front for the rule: `GET /aqi?zone=...`
#[derive(Debug, Default)]
pub struct AirQualityRouter;

#[async_trait]
impl Router for AirQualityRouter {
    fn name(&self) -> &'static str {
        "air-quality"
    }

    async fn route(&self, req: ApiRequest) -> ApiResponse {
        match (&req.method, req.path.as_str()) {
            (&Method::GET, "/aqi") => {
                let zone = req.query("zone").unwrap_or(UNKNOWN_ZONE);
                json_response(StatusCode::OK, &compute_aqi(zone))
            }
            (&Method::GET, "/health") => json_response(
                StatusCode::OK,
                &serde_json::json!({ "status": "healthy", "service": "Air Quality Service" }),
            ),
            _ => endpoint_not_found(&req),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::http::body_bytes;

    #[test]
    fn test_centre_zones_score_high() {
        for zone in ["Centre", "centre", "CENTRE", "Centre-Ville", "hypercentre"] {
            assert_eq!(compute_aqi(zone).aqi, 130, "zone {zone}");
        }
    }

    #[test]
    fn test_other_zones_score_baseline() {
        for zone in ["Nord", "Lac", "Est", "", "center", "unknown"] {
            assert_eq!(compute_aqi(zone).aqi, 60, "zone {zone}");
        }
    }

    #[test]
    fn test_pollutants_are_fixed_fractions() {
        for zone in ["Centre", "Sud"] {
            let reading = compute_aqi(zone);
            let base = f64::from(reading.aqi);
            assert_eq!(reading.pollutants.no2, base * 0.3);
            assert_eq!(reading.pollutants.co2, base * 0.2);
            assert_eq!(reading.pollutants.o3, base * 0.1);
        }
    }

    #[test]
    fn test_reading_echoes_zone() {
        assert_eq!(compute_aqi("Ouest").zone, "Ouest");
    }

    #[tokio::test]
    async fn test_router_defaults_zone_to_unknown() {
        let response = AirQualityRouter.route(ApiRequest::new(Method::GET, "/aqi")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let reading: AirQualityReading = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(reading.zone, "unknown");
        assert_eq!(reading.aqi, 60);
    }

    #[tokio::test]
    async fn test_router_reads_zone_query() {
        let response = AirQualityRouter.route(ApiRequest::new(Method::GET, "/aqi?zone=Centre")).await;
        let reading: AirQualityReading = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(reading.aqi, 130);
    }

    #[tokio::test]
    async fn test_router_unknown_path() {
        let response = AirQualityRouter.route(ApiRequest::new(Method::GET, "/wsdl")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
