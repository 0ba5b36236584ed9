use crate::model::{member::MemberRef, zone::Zone};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;

/// List zones
#[utoipa::path(
    get,
    path = "/api/v1/zones",
    responses(
        (status = 200, description = "All zones"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Zone"
)]
pub async fn list_zones(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let zones = sqlx::query_as::<_, Zone>("SELECT id, name, leader_id FROM zones ORDER BY name")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list zones");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({ "data": zones })))
}

/// Active members of one zone
#[utoipa::path(
    get,
    path = "/api/v1/zones/{zone_id}/roster",
    params(
        ("zone_id" = u64, Path, description = "Zone ID")
    ),
    responses(
        (status = 200, description = "Active members of the zone"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Zone"
)]
pub async fn roster(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let zone_id = path.into_inner();

    let members = sqlx::query_as::<_, MemberRef>(
        r#"
        SELECT id, first_name, last_name, member_number, photo_url
        FROM members
        WHERE zone_id = ? AND status = 'active'
        ORDER BY last_name, first_name
        "#,
    )
    .bind(zone_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, zone_id, "Failed to fetch zone roster");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "data": members })))
}
