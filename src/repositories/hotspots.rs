use sqlx::PgPool;

use crate::db::models::{HotspotDistance, HotspotRegion};

const COLUMNS: &str =
    "id, name, center_lat, center_lng, radius_km, risk_level, accident_count";

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<HotspotRegion>, sqlx::Error> {
    sqlx::query_as::<_, HotspotRegion>(&format!(
        "SELECT {COLUMNS}
         FROM hotspot_regions
         ORDER BY risk_level DESC"
    ))
    .fetch_all(pool)
    .await
}

/// Regions within `radius_km` of the point, nearest first.
pub(crate) async fn find_within_radius(
    pool: &PgPool,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> Result<Vec<HotspotDistance>, sqlx::Error> {
    sqlx::query_as::<_, HotspotDistance>(&format!(
        "SELECT {COLUMNS},
                ST_Distance(
                    ST_SetSRID(ST_MakePoint(center_lng, center_lat), 4326)::geography,
                    ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography
                ) / 1000.0 AS distance_km
         FROM hotspot_regions
         WHERE ST_DWithin(
                   ST_SetSRID(ST_MakePoint(center_lng, center_lat), 4326)::geography,
                   ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
                   $3 * 1000.0
               )
         ORDER BY distance_km"
    ))
    .bind(longitude)
    .bind(latitude)
    .bind(radius_km)
    .fetch_all(pool)
    .await
}

/// The closest region whose own radius contains the point, if any.
pub(crate) async fn find_containing(
    pool: &PgPool,
    latitude: f64,
    longitude: f64,
) -> Result<Option<HotspotDistance>, sqlx::Error> {
    sqlx::query_as::<_, HotspotDistance>(&format!(
        "SELECT {COLUMNS},
                ST_Distance(
                    ST_SetSRID(ST_MakePoint(center_lng, center_lat), 4326)::geography,
                    ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography
                ) / 1000.0 AS distance_km
         FROM hotspot_regions
         WHERE ST_DWithin(
                   ST_SetSRID(ST_MakePoint(center_lng, center_lat), 4326)::geography,
                   ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
                   radius_km * 1000.0
               )
         ORDER BY distance_km
         LIMIT 1"
    ))
    .bind(longitude)
    .bind(latitude)
    .fetch_optional(pool)
    .await
}
