use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::navigation::{
    AreaAlertsQuery, EmergencySearchQuery, FalseAlertRequest, RouteRequest,
};
use crate::services::fallback::{serve_with_fallback, POWERED_BY_DB, POWERED_BY_MAPS};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/route", post(safe_route))
        .route("/alerts", get(area_alerts))
        .route("/alert", post(report_false_alert))
        .route("/emergency", get(nearby_emergency))
}

async fn safe_route(
    State(state): State<AppState>,
    Json(payload): Json<RouteRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_payload(&payload)?;

    let origin = json!({ "lat": payload.origin.lat, "lng": payload.origin.lng });
    let destination = json!({ "lat": payload.destination.lat, "lng": payload.destination.lng });

    let served = serve_with_fallback(
        "safe-route",
        state.ai().safe_route(
            &origin,
            &destination,
            payload.avoid_high_risk,
            payload.current_conditions.as_ref(),
        ),
        state.maps().directions(
            payload.origin.lat,
            payload.origin.lng,
            payload.destination.lat,
            payload.destination.lng,
        ),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Route planning is unavailable"))?;

    let powered_by = served.powered_by(POWERED_BY_MAPS);
    let mut body = served.value;
    if let Some(envelope) = body.as_object_mut() {
        envelope.insert("powered_by".to_string(), json!(powered_by));
    }

    Ok(Json(body))
}

async fn area_alerts(
    State(state): State<AppState>,
    Query(query): Query<AreaAlertsQuery>,
) -> Result<Json<Value>, ApiError> {
    let radius_km = query.radius.clamp(0.1, 50.0);

    let served = serve_with_fallback(
        "area-alerts",
        async {
            state.ai().area_alerts(query.latitude, query.longitude, radius_km).await
        },
        async {
            let hotspots = repositories::hotspots::find_within_radius(
                state.db(),
                query.latitude,
                query.longitude,
                radius_km,
            )
            .await?;
            Ok(hotspots.into_iter().map(hotspot_alert).collect())
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Area alert check is unavailable"))?;

    let powered_by = served.powered_by(POWERED_BY_DB);
    let count = served.value.len();
    Ok(Json(json!({
        "success": true,
        "alerts": served.value,
        "count": count,
        "powered_by": powered_by,
    })))
}

async fn report_false_alert(
    State(state): State<AppState>,
    Json(payload): Json<FalseAlertRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_payload(&payload)?;

    repositories::alerts::insert_false_alert_report(
        state.db(),
        repositories::alerts::CreateFalseAlertReport {
            id: &Uuid::new_v4().to_string(),
            alert_id: payload.alert_id.as_deref(),
            user_id: payload.user_id.as_deref(),
            reason: &payload.reason,
            latitude: payload.location.lat,
            longitude: payload.location.lng,
            reported_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record false alert report"))?;

    // Forwarding the feedback trains the AI model; the row above is the
    // durable record, so a dead AI service must not fail the request.
    let ai = state.ai().clone();
    let feedback = json!({
        "alert_id": payload.alert_id,
        "user_id": payload.user_id,
        "reason": payload.reason,
        "location": { "lat": payload.location.lat, "lng": payload.location.lng },
    });
    tokio::spawn(async move {
        if let Err(err) = ai.send_false_alert_feedback(&feedback).await {
            tracing::warn!(error = %err, "Failed to forward false-alert feedback");
        }
    });

    Ok(Json(json!({ "success": true, "message": "False alert report recorded" })))
}

async fn nearby_emergency(
    State(state): State<AppState>,
    Query(query): Query<EmergencySearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let radius_meters = query.radius_km.clamp(0.1, 50.0) * 1000.0;

    let served = serve_with_fallback(
        "nearby-emergency",
        async {
            let body = state
                .ai()
                .nearby_emergency(query.latitude, query.longitude, radius_meters)
                .await?;
            match body.get("services").and_then(Value::as_array) {
                Some(services) => Ok(services.clone()),
                None => anyhow::bail!("nearby-emergency response missing services array"),
            }
        },
        async {
            let services = repositories::emergency::find_within_radius(
                state.db(),
                query.latitude,
                query.longitude,
                radius_meters,
            )
            .await?;
            services
                .into_iter()
                .map(|service| serde_json::to_value(service).map_err(Into::into))
                .collect()
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Emergency service search is unavailable"))?;

    let powered_by = served.powered_by(POWERED_BY_DB);
    let count = served.value.len();
    Ok(Json(json!({
        "success": true,
        "services": served.value,
        "count": count,
        "powered_by": powered_by,
    })))
}

fn hotspot_alert(hotspot: crate::db::models::HotspotDistance) -> Value {
    json!({
        "id": hotspot.id,
        "name": hotspot.name,
        "latitude": hotspot.center_lat,
        "longitude": hotspot.center_lng,
        "radius_km": hotspot.radius_km,
        "risk_level": hotspot.risk_level,
        "accident_count": hotspot.accident_count,
        "distance_km": hotspot.distance_km,
        "message": format!("High-risk area: {}", hotspot.name),
    })
}
