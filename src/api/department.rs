use crate::auth::auth::AuthUser;
use crate::model::{department::Department, member::MemberRef};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RosterEntry {
    #[schema(example = 12)]
    pub member_id: u64,
}

/// List departments
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "All departments"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn list_departments(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let departments = sqlx::query_as::<_, Department>(
        "SELECT id, name, leader_id FROM departments ORDER BY name",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list departments");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "data": departments })))
}

/// Active roster of one department
#[utoipa::path(
    get,
    path = "/api/v1/departments/{department_id}/roster",
    params(
        ("department_id" = u64, Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Active members of the department"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn roster(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let department_id = path.into_inner();

    let members = sqlx::query_as::<_, MemberRef>(
        r#"
        SELECT m.id, m.first_name, m.last_name, m.member_number, m.photo_url
        FROM members m
        JOIN department_members dm ON dm.member_id = m.id
        WHERE dm.department_id = ? AND dm.is_active = TRUE AND m.status = 'active'
        ORDER BY m.last_name, m.first_name
        "#,
    )
    .bind(department_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, department_id, "Failed to fetch department roster");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "data": members })))
}

/// Add a member to a department roster
#[utoipa::path(
    post,
    path = "/api/v1/departments/{department_id}/roster",
    params(
        ("department_id" = u64, Path, description = "Department ID")
    ),
    request_body = RosterEntry,
    responses(
        (status = 200, description = "Member added to roster"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn add_to_roster(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<RosterEntry>,
) -> actix_web::Result<impl Responder> {
    auth.require_leader_or_above()?;

    let department_id = path.into_inner();

    // rejoining reactivates an old roster row
    sqlx::query(
        r#"
        INSERT INTO department_members (department_id, member_id, is_active)
        VALUES (?, ?, TRUE)
        ON DUPLICATE KEY UPDATE is_active = TRUE
        "#,
    )
    .bind(department_id)
    .bind(payload.member_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, department_id, member_id = payload.member_id, "Failed to add roster entry");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Member added to roster" })))
}

/// Remove a member from a department roster (soft: marks the row inactive)
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{department_id}/roster/{member_id}",
    params(
        ("department_id" = u64, Path, description = "Department ID"),
        ("member_id" = u64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member removed from roster"),
        (status = 404, description = "Roster entry not found"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn remove_from_roster(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<(u64, u64)>,
) -> actix_web::Result<impl Responder> {
    auth.require_leader_or_above()?;

    let (department_id, member_id) = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE department_members
        SET is_active = FALSE
        WHERE department_id = ? AND member_id = ? AND is_active = TRUE
        "#,
    )
    .bind(department_id)
    .bind(member_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, department_id, member_id, "Failed to remove roster entry");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Roster entry not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Member removed from roster" })))
}
