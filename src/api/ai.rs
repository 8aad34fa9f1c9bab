use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::HotspotDistance;
use crate::db::types::AlertType;
use crate::repositories;
use crate::schemas::navigation::RealTimeAlertRequest;
use crate::services::ai_client;
use crate::services::fallback::{serve_with_fallback, POWERED_BY_DB};

/// How many recent reports feed hotspot detection.
const HOTSPOT_REPORT_WINDOW: i64 = 500;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/hotspots", get(detect_hotspots))
        .route("/check-alerts", post(check_alerts))
}

async fn detect_hotspots(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let served = serve_with_fallback(
        "detect-hotspots",
        async {
            let reports =
                repositories::reports::list_recent(state.db(), HOTSPOT_REPORT_WINDOW).await?;
            let rows = Value::Array(ai_client::accident_rows(&reports));
            state.ai().detect_hotspots(&rows).await
        },
        async {
            let regions = repositories::hotspots::list_all(state.db()).await?;
            regions
                .into_iter()
                .map(|region| serde_json::to_value(region).map_err(Into::into))
                .collect()
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Hotspot detection is unavailable"))?;

    let powered_by = served.powered_by(POWERED_BY_DB);
    let count = served.value.len();
    Ok(Json(json!({
        "success": true,
        "hotspots": served.value,
        "count": count,
        "powered_by": powered_by,
    })))
}

async fn check_alerts(
    State(state): State<AppState>,
    Json(payload): Json<RealTimeAlertRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_payload(&payload)?;

    let served = serve_with_fallback(
        "real-time-alert",
        async {
            state
                .ai()
                .real_time_alert(
                    payload.user_id.as_deref(),
                    payload.latitude,
                    payload.longitude,
                    payload.speed_kmh,
                )
                .await
        },
        async {
            let containing = repositories::hotspots::find_containing(
                state.db(),
                payload.latitude,
                payload.longitude,
            )
            .await?;
            Ok(fallback_alert(containing))
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Alert check is unavailable"))?;

    let powered_by = served.powered_by(POWERED_BY_DB);
    let mut body = served.value;
    if let Some(envelope) = body.as_object_mut() {
        envelope.insert("powered_by".to_string(), json!(powered_by));
    }

    let triggered = body.get("alert_triggered").and_then(Value::as_bool).unwrap_or(false);
    if triggered {
        log_alert(&state, &payload, &body).await;
    }

    Ok(Json(body))
}

/// Alert logging is a side channel; a failed insert never blocks the alert.
async fn log_alert(state: &AppState, request: &RealTimeAlertRequest, body: &Value) {
    let risk_score = body.get("risk_score").and_then(Value::as_f64);
    let message = body.get("message").and_then(Value::as_str);

    let result = repositories::alerts::insert_alert_log(
        state.db(),
        repositories::alerts::CreateAlertLog {
            id: &Uuid::new_v4().to_string(),
            user_id: request.user_id.as_deref(),
            alert_type: AlertType::RealTimeRisk,
            latitude: request.latitude,
            longitude: request.longitude,
            risk_score,
            alert_message: message,
            timestamp: primitive_now_utc(),
        },
    )
    .await;

    if let Err(err) = result {
        tracing::warn!(error = %err, "Failed to persist alert log");
    }
}

fn fallback_alert(containing: Option<HotspotDistance>) -> Value {
    match containing {
        Some(hotspot) => json!({
            "success": true,
            "alert_triggered": true,
            "risk_score": hotspot.risk_level,
            "message": format!("You are inside high-risk area: {}", hotspot.name),
            "hotspot": {
                "id": hotspot.id,
                "name": hotspot.name,
                "distance_km": hotspot.distance_km,
            },
        }),
        None => json!({
            "success": true,
            "alert_triggered": false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotspot(risk: f64) -> HotspotDistance {
        HotspotDistance {
            id: "h-1".to_string(),
            name: "Ring Road".to_string(),
            center_lat: 55.0,
            center_lng: 37.0,
            radius_km: 2.0,
            risk_level: risk,
            accident_count: 12,
            distance_km: 0.4,
        }
    }

    #[test]
    fn containing_hotspot_triggers_alert() {
        let alert = fallback_alert(Some(hotspot(0.9)));
        assert_eq!(alert["alert_triggered"], true);
        assert_eq!(alert["risk_score"], 0.9);
        assert!(alert["message"].as_str().unwrap().contains("Ring Road"));
    }

    #[test]
    fn no_hotspot_means_no_alert() {
        let alert = fallback_alert(None);
        assert_eq!(alert["alert_triggered"], false);
        assert!(alert.get("risk_score").is_none());
    }
}
