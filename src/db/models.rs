use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::Severity;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) full_name: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Report {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) accident_time: PrimitiveDateTime,
    pub(crate) severity: Severity,
    pub(crate) weather_condition: Option<String>,
    pub(crate) vehicle_count: i32,
    pub(crate) description: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct HotspotRegion {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) center_lat: f64,
    pub(crate) center_lng: f64,
    pub(crate) radius_km: f64,
    pub(crate) risk_level: f64,
    pub(crate) accident_count: i32,
}

/// Hotspot row plus the computed distance from a query point.
#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct HotspotDistance {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) center_lat: f64,
    pub(crate) center_lng: f64,
    pub(crate) radius_km: f64,
    pub(crate) risk_level: f64,
    pub(crate) accident_count: i32,
    pub(crate) distance_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct EmergencyService {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) service_type: String,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) phone_number: Option<String>,
    pub(crate) is_24_hours: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct HeatmapPoint {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) severity: Severity,
    pub(crate) weight: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct SeverityCount {
    pub(crate) severity: Severity,
    pub(crate) count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct DailyCount {
    pub(crate) day: time::Date,
    pub(crate) count: i64,
}
