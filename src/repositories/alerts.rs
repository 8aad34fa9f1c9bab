use sqlx::PgPool;

use crate::db::types::AlertType;

pub(crate) struct CreateAlertLog<'a> {
    pub id: &'a str,
    pub user_id: Option<&'a str>,
    pub alert_type: AlertType,
    pub latitude: f64,
    pub longitude: f64,
    pub risk_score: Option<f64>,
    pub alert_message: Option<&'a str>,
    pub timestamp: time::PrimitiveDateTime,
}

pub(crate) async fn insert_alert_log(
    pool: &PgPool,
    params: CreateAlertLog<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO alert_logs (
            id, user_id, alert_type, location, risk_score, alert_message, timestamp
        ) VALUES ($1,$2,$3,ST_SetSRID(ST_MakePoint($4,$5),4326),$6,$7,$8)",
    )
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.alert_type)
    .bind(params.longitude)
    .bind(params.latitude)
    .bind(params.risk_score)
    .bind(params.alert_message)
    .bind(params.timestamp)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) struct CreateFalseAlertReport<'a> {
    pub id: &'a str,
    pub alert_id: Option<&'a str>,
    pub user_id: Option<&'a str>,
    pub reason: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub reported_at: time::PrimitiveDateTime,
}

pub(crate) async fn insert_false_alert_report(
    pool: &PgPool,
    params: CreateFalseAlertReport<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO false_alert_reports (
            id, alert_id, user_id, reason, location, reported_at
        ) VALUES ($1,$2,$3,$4,ST_SetSRID(ST_MakePoint($5,$6),4326),$7)",
    )
    .bind(params.id)
    .bind(params.alert_id)
    .bind(params.user_id)
    .bind(params.reason)
    .bind(params.longitude)
    .bind(params.latitude)
    .bind(params.reported_at)
    .execute(pool)
    .await?;
    Ok(())
}
