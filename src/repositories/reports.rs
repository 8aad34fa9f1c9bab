use sqlx::PgPool;

use crate::db::models::Report;
use crate::db::types::Severity;

pub(crate) const COLUMNS: &str = "\
    id, user_id, latitude, longitude, accident_time, severity, \
    weather_condition, vehicle_count, description, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>(&format!("SELECT {COLUMNS} FROM reports WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>(&format!(
        "SELECT {COLUMNS}
         FROM reports
         ORDER BY created_at DESC
         OFFSET $1 LIMIT $2"
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>(&format!(
        "SELECT {COLUMNS}
         FROM reports
         ORDER BY accident_time DESC
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM reports").fetch_one(pool).await
}

pub(crate) struct CreateReport<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub accident_time: time::PrimitiveDateTime,
    pub severity: Severity,
    pub weather_condition: Option<&'a str>,
    pub vehicle_count: i32,
    pub description: Option<&'a str>,
    pub created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateReport<'_>) -> Result<Report, sqlx::Error> {
    // ST_MakePoint takes lng first; keep it that way everywhere.
    sqlx::query_as::<_, Report>(&format!(
        "INSERT INTO reports (
            id, user_id, latitude, longitude, location, accident_time,
            severity, weather_condition, vehicle_count, description, created_at
        ) VALUES ($1,$2,$3,$4,ST_SetSRID(ST_MakePoint($4,$3),4326),$5,$6,$7,$8,$9,$10)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.latitude)
    .bind(params.longitude)
    .bind(params.accident_time)
    .bind(params.severity)
    .bind(params.weather_condition)
    .bind(params.vehicle_count)
    .bind(params.description)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}
