use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Report;
use crate::db::types::Severity;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ReportCreate {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude out of range"))]
    pub(crate) latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude out of range"))]
    pub(crate) longitude: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) accident_time: OffsetDateTime,
    pub(crate) severity: Severity,
    #[serde(default)]
    pub(crate) weather_condition: Option<String>,
    #[serde(default = "default_vehicle_count")]
    #[validate(range(min = 1, max = 100, message = "vehicle_count out of range"))]
    pub(crate) vehicle_count: i32,
    #[serde(default)]
    #[validate(length(max = 2000, message = "description too long"))]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportResponse {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) accident_time: String,
    pub(crate) severity: Severity,
    pub(crate) weather_condition: Option<String>,
    pub(crate) vehicle_count: i32,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
}

impl ReportResponse {
    pub(crate) fn from_db(report: Report) -> Self {
        Self {
            id: report.id,
            user_id: report.user_id,
            latitude: report.latitude,
            longitude: report.longitude,
            accident_time: format_primitive(report.accident_time),
            severity: report.severity,
            weather_condition: report.weather_condition,
            vehicle_count: report.vehicle_count,
            description: report.description,
            created_at: format_primitive(report.created_at),
        }
    }
}

fn default_vehicle_count() -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn payload(lat: f64, lng: f64) -> ReportCreate {
        serde_json::from_value(serde_json::json!({
            "latitude": lat,
            "longitude": lng,
            "accident_time": "2026-03-01T12:00:00Z",
            "severity": "major",
        }))
        .expect("deserialize")
    }

    #[test]
    fn valid_payload_passes_validation() {
        let report = payload(55.75, 37.61);
        assert!(report.validate().is_ok());
        assert_eq!(report.vehicle_count, 1);
        assert_eq!(report.severity, Severity::Major);
    }

    #[test]
    fn out_of_range_coordinates_fail_validation() {
        assert!(payload(91.0, 0.0).validate().is_err());
        assert!(payload(0.0, -181.0).validate().is_err());
    }
}
