use sqlx::PgPool;

use crate::db::models::EmergencyService;

pub(crate) async fn find_within_radius(
    pool: &PgPool,
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
) -> Result<Vec<EmergencyService>, sqlx::Error> {
    sqlx::query_as::<_, EmergencyService>(
        "SELECT id, name, service_type, latitude, longitude, phone_number, is_24_hours
         FROM emergency_services
         WHERE ST_DWithin(
                   location::geography,
                   ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
                   $3
               )
         ORDER BY location::geography <-> ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography",
    )
    .bind(longitude)
    .bind(latitude)
    .bind(radius_meters)
    .fetch_all(pool)
    .await
}
