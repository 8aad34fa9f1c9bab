use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::core::config::Settings;
use crate::core::time::{format_primitive, now_rfc3339};
use crate::db::models::Report;

/// Client for the AcciNex AI microservice. Every call carries the bounded
/// request timeout from settings; an unresponsive AI service fails the call
/// instead of hanging the request.
#[derive(Debug, Clone)]
pub(crate) struct AiServiceClient {
    client: Client,
    base_url: String,
}

impl AiServiceClient {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.ai().connect_timeout_seconds))
            .timeout(Duration::from_secs(settings.ai().request_timeout_seconds))
            .build()
            .context("Failed to build AI service HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.ai().service_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) async fn safe_route(
        &self,
        origin: &Value,
        destination: &Value,
        avoid_high_risk: bool,
        current_conditions: Option<&Value>,
    ) -> Result<Value> {
        let conditions = match current_conditions {
            Some(value) => value.clone(),
            None => json!({ "timestamp": now_rfc3339() }),
        };
        let payload = json!({
            "origin": origin,
            "destination": destination,
            "avoid_high_risk": avoid_high_risk,
            "current_conditions": conditions,
        });

        let body = self.post_json("/navigation/safe-route", &payload).await?;
        require_success(&body, "safe-route")?;
        Ok(body)
    }

    pub(crate) async fn area_alerts(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<Value>> {
        let payload = json!({
            "latitude": latitude,
            "longitude": longitude,
            "radius_km": radius_km,
            "current_conditions": { "timestamp": now_rfc3339() },
        });

        let body = self.post_json("/alerts/area-check", &payload).await?;
        require_success(&body, "area-check")?;

        match body.get("alerts").and_then(Value::as_array) {
            Some(alerts) => Ok(alerts.clone()),
            None => bail!("area-check response missing alerts array"),
        }
    }

    pub(crate) async fn real_time_alert(
        &self,
        user_id: Option<&str>,
        latitude: f64,
        longitude: f64,
        speed_kmh: Option<f64>,
    ) -> Result<Value> {
        let payload = json!({
            "user_id": user_id,
            "location": { "lat": latitude, "lng": longitude },
            "conditions": { "timestamp": now_rfc3339(), "speed_kmh": speed_kmh },
        });

        let body = self.post_json("/alerts/real-time", &payload).await?;
        if body.get("alert_triggered").and_then(Value::as_bool).is_none() {
            bail!("real-time response missing alert_triggered flag");
        }
        Ok(body)
    }

    pub(crate) async fn nearby_emergency(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Value> {
        let payload = json!({
            "location": { "lat": latitude, "lng": longitude },
            "radius_meters": radius_meters,
        });

        let body = self.post_json("/navigation/nearby-emergency", &payload).await?;
        require_success(&body, "nearby-emergency")?;
        Ok(body)
    }

    /// Best-effort EXIF GPS extraction. `Ok(None)` means the AI service
    /// answered but found no GPS metadata in the image.
    pub(crate) async fn extract_gps(
        &self,
        image_path: &str,
        filename: &str,
    ) -> Result<Option<Value>> {
        let payload = json!({ "image_path": image_path, "filename": filename });

        let body = self.post_json("/extract-exif", &payload).await?;
        require_success(&body, "extract-exif")?;

        match body.get("gps_data") {
            Some(Value::Null) | None => Ok(None),
            Some(gps) => Ok(Some(gps.clone())),
        }
    }

    /// `reports` must be the bare row list; the service feeds the request
    /// body straight into a data frame.
    pub(crate) async fn detect_hotspots(&self, reports: &Value) -> Result<Vec<Value>> {
        let body = self.post_json("/detect-hotspots", reports).await?;
        match body.as_array() {
            Some(hotspots) => Ok(hotspots.clone()),
            None => bail!("detect-hotspots response is not a list"),
        }
    }

    pub(crate) async fn forecast(&self, payload: &Value) -> Result<Value> {
        let body = self.post_json("/forecast-accidents", payload).await?;
        require_success(&body, "forecast-accidents")?;
        Ok(body)
    }

    pub(crate) async fn heatmap(&self, payload: &Value) -> Result<Value> {
        let body = self.post_json("/heatmap-data", payload).await?;
        require_success(&body, "heatmap-data")?;
        Ok(body)
    }

    pub(crate) async fn send_false_alert_feedback(&self, payload: &Value) -> Result<()> {
        self.post_json("/feedback/false-alert", payload).await?;
        Ok(())
    }

    async fn post_json(&self, path: &str, payload: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to call AI service {path}"))?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .with_context(|| format!("Failed to read AI service {path} response"))?;

        let parsed = serde_json::from_str::<Value>(&raw_body).map_err(|err| {
            anyhow::anyhow!("AI service {path} returned non-JSON body (status {status}): {err}")
        })?;

        if !status.is_success() {
            bail!(
                "AI service {path} failed (status {status}): {}",
                extract_error_message(&parsed)
            );
        }

        Ok(parsed)
    }
}

/// Flattens reports into the row shape the AI service loads into a data
/// frame: `id`, `latitude`, `longitude`, `severity` and `accident_time` are
/// the columns its hotspot, forecast and heatmap models read.
pub(crate) fn accident_rows(reports: &[Report]) -> Vec<Value> {
    reports
        .iter()
        .map(|report| {
            json!({
                "id": report.id,
                "latitude": report.latitude,
                "longitude": report.longitude,
                "severity": report.severity,
                "accident_time": format_primitive(report.accident_time),
            })
        })
        .collect()
}

/// A success response without `success: true` counts as AI-unavailable.
fn require_success(body: &Value, endpoint: &str) -> Result<()> {
    match body.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(()),
        Some(false) => bail!(
            "AI service {endpoint} returned success=false: {}",
            extract_error_message(body)
        ),
        None => bail!("AI service {endpoint} response missing success flag"),
    }
}

fn extract_error_message(payload: &Value) -> String {
    payload
        .get("error")
        .and_then(Value::as_str)
        .or_else(|| payload.get("message").and_then(Value::as_str))
        .unwrap_or("unknown_error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_success_accepts_true() {
        assert!(require_success(&json!({"success": true}), "x").is_ok());
    }

    #[test]
    fn require_success_rejects_false_and_missing() {
        let err = require_success(&json!({"success": false, "error": "boom"}), "x")
            .expect_err("false should fail");
        assert!(err.to_string().contains("boom"));

        assert!(require_success(&json!({"alerts": []}), "x").is_err());
    }

    #[test]
    fn extract_error_message_prefers_error_field() {
        assert_eq!(extract_error_message(&json!({"error": "a", "message": "b"})), "a");
        assert_eq!(extract_error_message(&json!({"message": "b"})), "b");
        assert_eq!(extract_error_message(&json!({})), "unknown_error");
    }

    #[test]
    fn accident_rows_carry_the_frame_columns() {
        let report = Report {
            id: "r-1".to_string(),
            user_id: "u-1".to_string(),
            latitude: 55.75,
            longitude: 37.61,
            accident_time: time::macros::datetime!(2026-03-01 12:00),
            severity: crate::db::types::Severity::Major,
            weather_condition: None,
            vehicle_count: 2,
            description: None,
            created_at: time::macros::datetime!(2026-03-01 12:05),
        };

        let rows = accident_rows(&[report]);

        assert_eq!(rows.len(), 1);
        for column in ["id", "latitude", "longitude", "severity", "accident_time"] {
            assert!(rows[0].get(column).is_some(), "missing column {column}");
        }
        assert_eq!(rows[0]["severity"], "major");
        assert_eq!(rows[0]["accident_time"], "2026-03-01T12:00:00Z");
    }
}
