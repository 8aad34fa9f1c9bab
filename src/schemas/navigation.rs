use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0, message = "lat out of range"))]
    pub(crate) lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "lng out of range"))]
    pub(crate) lng: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RouteRequest {
    #[validate(nested)]
    pub(crate) origin: Coordinates,
    #[validate(nested)]
    pub(crate) destination: Coordinates,
    #[serde(default = "default_true")]
    pub(crate) avoid_high_risk: bool,
    #[serde(default)]
    pub(crate) current_conditions: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AreaAlertsQuery {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    #[serde(default = "default_radius_km")]
    pub(crate) radius: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RealTimeAlertRequest {
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude out of range"))]
    pub(crate) latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude out of range"))]
    pub(crate) longitude: f64,
    #[serde(default)]
    pub(crate) speed_kmh: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct FalseAlertRequest {
    #[serde(default)]
    pub(crate) alert_id: Option<String>,
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    #[validate(length(min = 1, message = "reason must not be empty"))]
    pub(crate) reason: String,
    #[validate(nested)]
    pub(crate) location: Coordinates,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmergencySearchQuery {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    #[serde(default = "default_emergency_radius_km")]
    pub(crate) radius_km: f64,
}

fn default_true() -> bool {
    true
}

fn default_radius_km() -> f64 {
    1.0
}

fn default_emergency_radius_km() -> f64 {
    5.0
}
