use sqlx::PgPool;

use crate::db::models::{DailyCount, HeatmapPoint, SeverityCount};

pub(crate) async fn counts_by_severity(pool: &PgPool) -> Result<Vec<SeverityCount>, sqlx::Error> {
    sqlx::query_as::<_, SeverityCount>(
        "SELECT severity, COUNT(*) AS count
         FROM reports
         GROUP BY severity
         ORDER BY severity",
    )
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_since_days(pool: &PgPool, days: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM reports
         WHERE created_at >= NOW() - make_interval(days => $1)",
    )
    .bind(days)
    .fetch_one(pool)
    .await
}

pub(crate) async fn average_vehicle_count(pool: &PgPool) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar("SELECT AVG(vehicle_count)::float8 FROM reports").fetch_one(pool).await
}

pub(crate) async fn daily_counts(pool: &PgPool, days: i32) -> Result<Vec<DailyCount>, sqlx::Error> {
    sqlx::query_as::<_, DailyCount>(
        "SELECT accident_time::date AS day, COUNT(*) AS count
         FROM reports
         WHERE accident_time >= NOW() - make_interval(days => $1)
         GROUP BY day
         ORDER BY day",
    )
    .bind(days)
    .fetch_all(pool)
    .await
}

/// Raw report points weighted by severity for the heatmap fallback.
pub(crate) async fn heatmap_points(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<HeatmapPoint>, sqlx::Error> {
    sqlx::query_as::<_, HeatmapPoint>(
        "SELECT latitude, longitude, severity,
                CASE severity
                    WHEN 'minor' THEN 0.3
                    WHEN 'major' THEN 0.6
                    ELSE 1.0
                END AS weight
         FROM reports
         ORDER BY accident_time DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
