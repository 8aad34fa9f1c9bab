use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::repositories;
use crate::services::ai_client;
use crate::services::fallback::{serve_with_fallback, POWERED_BY_DB};

/// How many recent reports feed the heatmap (primary rows and fallback points).
const HEATMAP_POINT_LIMIT: i64 = 1000;
/// How many recent reports feed the accident forecast.
const FORECAST_REPORT_WINDOW: i64 = 500;

#[derive(Debug, Deserialize)]
pub(crate) struct TrendsQuery {
    #[serde(default = "default_trend_days")]
    days: i32,
}

fn default_trend_days() -> i32 {
    30
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/trends", get(trends))
        .route("/heatmap", get(heatmap))
}

async fn summary(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let total = repositories::reports::count(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count reports"))?;

    let by_severity = repositories::analytics::counts_by_severity(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to aggregate severities"))?;

    let last_7_days = repositories::analytics::count_since_days(state.db(), 7)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count recent reports"))?;

    let last_30_days = repositories::analytics::count_since_days(state.db(), 30)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count recent reports"))?;

    let average_vehicle_count = repositories::analytics::average_vehicle_count(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to average vehicle counts"))?;

    Ok(Json(json!({
        "total_reports": total,
        "by_severity": by_severity
            .iter()
            .map(|row| json!({ "severity": row.severity, "count": row.count }))
            .collect::<Vec<_>>(),
        "last_7_days": last_7_days,
        "last_30_days": last_30_days,
        "average_vehicle_count": average_vehicle_count,
    })))
}

async fn trends(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<Value>, ApiError> {
    let days = query.days.clamp(1, 365);

    let daily = repositories::analytics::daily_counts(state.db(), days)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to aggregate daily counts"))?;

    let daily_counts: Vec<Value> = daily
        .iter()
        .map(|row| json!({ "day": row.day.to_string(), "count": row.count }))
        .collect();

    // Forecast enrichment is best-effort; the trends themselves come from
    // the database either way. The service wants raw accident rows and
    // rejects an empty set, so skip the call when there is nothing to send.
    let reports = repositories::reports::list_recent(state.db(), FORECAST_REPORT_WINDOW)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load reports for forecasting"))?;

    let forecast = if reports.is_empty() {
        None
    } else {
        let payload = json!({
            "accidents": ai_client::accident_rows(&reports),
            "periods": days.min(30),
        });
        match state.ai().forecast(&payload).await {
            Ok(body) => body.get("forecast").cloned(),
            Err(err) => {
                tracing::warn!(error = %err, "Accident forecast unavailable");
                None
            }
        }
    };

    Ok(Json(json!({
        "days": days,
        "daily_counts": daily_counts,
        "forecast": forecast,
    })))
}

async fn heatmap(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let served = serve_with_fallback(
        "heatmap",
        async {
            let reports =
                repositories::reports::list_recent(state.db(), HEATMAP_POINT_LIMIT).await?;
            if reports.is_empty() {
                anyhow::bail!("no accident rows to build a heatmap from");
            }
            let payload = json!({ "accidents": ai_client::accident_rows(&reports) });
            let body = state.ai().heatmap(&payload).await?;
            match body.get("heatmap_cells").and_then(Value::as_array) {
                Some(cells) => Ok(cells.clone()),
                None => anyhow::bail!("heatmap response missing heatmap_cells array"),
            }
        },
        async {
            let points =
                repositories::analytics::heatmap_points(state.db(), HEATMAP_POINT_LIMIT).await?;
            points
                .into_iter()
                .map(|point| serde_json::to_value(point).map_err(Into::into))
                .collect()
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Heatmap data is unavailable"))?;

    let powered_by = served.powered_by(POWERED_BY_DB);
    let count = served.value.len();
    Ok(Json(json!({
        "success": true,
        "points": served.value,
        "count": count,
        "powered_by": powered_by,
    })))
}
