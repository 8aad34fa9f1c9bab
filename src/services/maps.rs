use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::core::config::Settings;

/// Fallback risk score applied to Maps-provided routes when the AI scoring
/// service is unavailable.
const FALLBACK_RISK_SCORE: u32 = 50;

#[derive(Debug, Clone)]
pub(crate) struct MapsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MapsClient {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(settings.maps().request_timeout_seconds))
            .build()
            .context("Failed to build Maps HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.maps().api_key.clone(),
            base_url: settings.maps().base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches route alternatives and wraps them in the safe-route envelope
    /// with neutral safety annotations.
    pub(crate) async fn directions(
        &self,
        origin_lat: f64,
        origin_lng: f64,
        dest_lat: f64,
        dest_lng: f64,
    ) -> Result<Value> {
        if self.api_key.is_empty() {
            bail!("GOOGLE_MAPS_API_KEY is not configured");
        }

        let url = format!("{}/maps/api/directions/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("origin", format!("{origin_lat},{origin_lng}")),
                ("destination", format!("{dest_lat},{dest_lng}")),
                ("key", self.api_key.clone()),
                ("alternatives", "true".to_string()),
            ])
            .send()
            .await
            .context("Failed to call Google Maps directions API")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Google Maps directions failed (status {status})");
        }

        let body: Value =
            response.json().await.context("Failed to parse Google Maps directions response")?;

        let routes = body
            .get("routes")
            .and_then(Value::as_array)
            .context("Google Maps response missing routes")?;

        Ok(json!({
            "success": true,
            "routes": map_routes(routes),
            "safety_summary": "Fallback Google Maps routing",
        }))
    }
}

fn map_routes(routes: &[Value]) -> Vec<Value> {
    routes
        .iter()
        .enumerate()
        .map(|(index, route)| {
            let leg = route.get("legs").and_then(Value::as_array).and_then(|legs| legs.first());
            let distance = leg
                .and_then(|leg| leg.get("distance"))
                .and_then(|distance| distance.get("text"))
                .cloned()
                .unwrap_or(Value::Null);
            let duration = leg
                .and_then(|leg| leg.get("duration"))
                .and_then(|duration| duration.get("text"))
                .cloned()
                .unwrap_or(Value::Null);

            json!({
                "route_index": index,
                "google_route_data": route,
                "safety_analysis": {
                    "overall_risk_score": FALLBACK_RISK_SCORE,
                    "warnings": ["AI unavailable"],
                    "is_recommended": index == 0,
                },
                "total_distance": distance,
                "total_duration": duration,
                "recommended": index == 0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_routes_marks_first_route_recommended() {
        let routes = vec![
            json!({"legs": [{"distance": {"text": "5 km"}, "duration": {"text": "10 mins"}}]}),
            json!({"legs": [{"distance": {"text": "7 km"}, "duration": {"text": "12 mins"}}]}),
        ];

        let mapped = map_routes(&routes);

        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0]["recommended"], true);
        assert_eq!(mapped[0]["total_distance"], "5 km");
        assert_eq!(mapped[0]["safety_analysis"]["overall_risk_score"], 50);
        assert_eq!(mapped[1]["recommended"], false);
        assert_eq!(mapped[1]["route_index"], 1);
    }

    #[test]
    fn map_routes_tolerates_missing_legs() {
        let mapped = map_routes(&[json!({})]);
        assert_eq!(mapped[0]["total_distance"], Value::Null);
        assert_eq!(mapped[0]["total_duration"], Value::Null);
    }
}
