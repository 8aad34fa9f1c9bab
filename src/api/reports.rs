use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::{clamp_window, default_limit, PaginatedResponse};
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::core::time::{primitive_now_utc, to_primitive_utc};
use crate::repositories;
use crate::schemas::report::{ReportCreate, ReportResponse};

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_report).get(list_reports))
        .route("/:report_id", get(get_report))
}

async fn create_report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ReportCreate>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    validate_payload(&payload)?;

    let report = repositories::reports::create(
        state.db(),
        repositories::reports::CreateReport {
            id: &Uuid::new_v4().to_string(),
            user_id: &user.id,
            latitude: payload.latitude,
            longitude: payload.longitude,
            accident_time: to_primitive_utc(payload.accident_time),
            severity: payload.severity,
            weather_condition: payload.weather_condition.as_deref(),
            vehicle_count: payload.vehicle_count,
            description: payload.description.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create report"))?;

    Ok((StatusCode::CREATED, Json(ReportResponse::from_db(report))))
}

async fn list_reports(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<PaginatedResponse<ReportResponse>>, ApiError> {
    let (skip, limit) = clamp_window(query.skip, query.limit);

    let reports = repositories::reports::list(state.db(), skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list reports"))?;

    let total_count = repositories::reports::count(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count reports"))?;

    let items = reports.into_iter().map(ReportResponse::from_db).collect();

    Ok(Json(PaginatedResponse { items, total_count, skip, limit }))
}

async fn get_report(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(report_id): Path<String>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = repositories::reports::find_by_id(state.db(), &report_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load report"))?
        .ok_or_else(|| ApiError::NotFound("Report not found".to_string()))?;

    Ok(Json(ReportResponse::from_db(report)))
}
