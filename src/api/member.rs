use crate::{
    auth::auth::AuthUser,
    config::Config,
    model::member::Member,
    utils::{
        db_utils::{build_update_sql, execute_update},
        member_cache, member_filter,
    },
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

use super::server_error;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateMember {
    #[schema(example = "M-0001", value_type = String)]
    pub member_number: String,
    #[schema(example = "Grace", value_type = String)]
    pub first_name: String,
    #[schema(example = "Mensah", value_type = String)]
    pub last_name: String,
    #[schema(example = "grace.mensah@example.com", format = "email", nullable = true)]
    pub email: Option<String>,
    #[schema(example = "+233201234567", nullable = true)]
    pub phone: Option<String>,
    #[schema(example = 2, nullable = true)]
    pub zone_id: Option<u64>,
    #[schema(example = "2023-05-14", format = "date", value_type = String)]
    pub joined_date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MemberQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub zone_id: Option<u64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MemberListResponse {
    pub data: Vec<Member>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 120)]
    pub total: i64,
}

/// Create Member
#[utoipa::path(
    post,
    path = "/api/v1/members",
    request_body = CreateMember,
    responses(
        (status = 201, description = "Member created", body = Object, example = json!({
            "message": "Member registered successfully"
        })),
        (status = 409, description = "Member number already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Member",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_member(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CreateMember>,
) -> actix_web::Result<impl Responder> {
    auth.require_leader_or_above()?;

    let member_number = payload.member_number.trim().to_uppercase();

    let result = sqlx::query(
        r#"
        INSERT INTO members
            (member_number, first_name, last_name, email, phone, zone_id, joined_date, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, 'active')
        "#,
    )
    .bind(&member_number)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(payload.zone_id)
    .bind(payload.joined_date)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(res) => {
            // keep the check-in lookup structures in step with the DB
            member_filter::insert(&member_number);
            member_cache::remember(&member_number, res.last_insert_id()).await;

            Ok(HttpResponse::Created().json(json!({
                "message": "Member registered successfully"
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "error": "Member number already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to create member");
            Ok(server_error(
                &config,
                "Failed to create member",
                e.to_string(),
            ))
        }
    }
}

/// Paginated member listing with zone/status/search filters
#[utoipa::path(
    get,
    path = "/api/v1/members",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("zone_id" = Option<u64>, Query, description = "Filter by zone"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("search" = Option<String>, Query, description = "Search by name or member number")
    ),
    responses(
        (status = 200, description = "Paginated member list", body = MemberListResponse)
    ),
    tag = "Member",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_members(
    pool: web::Data<MySqlPool>,
    query: web::Query<MemberQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<sqlx::types::JsonValue> = Vec::new();

    if let Some(zone_id) = query.zone_id {
        conditions.push("zone_id = ?");
        bindings.push(zone_id.into());
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone().into());
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR member_number LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone().into());
        bindings.push(like.clone().into());
        bindings.push(like.into());
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM members {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting members");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count members");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM members {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching members");

    let mut data_query = sqlx::query_as::<_, Member>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let members = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch members");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(MemberListResponse {
        data: members,
        page,
        per_page,
        total,
    }))
}

/// Get Member by ID
#[utoipa::path(
    get,
    path = "/api/v1/members/{member_id}",
    params(
        ("member_id" = u64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member found", body = Member),
        (status = 404, description = "Member not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Member",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_member(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let member_id = path.into_inner();

    let member = sqlx::query_as::<_, Member>(
        r#"
        SELECT id, member_number, first_name, last_name, email, phone,
               zone_id, photo_url, joined_date, status
        FROM members
        WHERE id = ?
        "#,
    )
    .bind(member_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, member_id, "Failed to fetch member");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match member {
        Some(m) => Ok(HttpResponse::Ok().json(m)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Member not found"
        }))),
    }
}

/// Update Member
#[utoipa::path(
    put,
    path = "/api/v1/members/{member_id}",
    params(
        ("member_id" = u64, Path, description = "Member ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Member updated"),
        (status = 404, description = "Member not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Member",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_member(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_leader_or_above()?;

    let member_id = path.into_inner();

    let update = build_update_sql("members", &body, "id", member_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Member not found"));
    }

    Ok(HttpResponse::Ok().body("Member updated successfully"))
}

/// Delete Member
#[utoipa::path(
    delete,
    path = "/api/v1/members/{member_id}",
    params(
        ("member_id" = u64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Member not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Member",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_member(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_pastor_or_admin()?;

    let member_id = path.into_inner();

    // fetch the number first so the lookup structures can be purged
    let member_number = sqlx::query_scalar::<_, String>(
        "SELECT member_number FROM members WHERE id = ?",
    )
    .bind(member_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, member_id, "Failed to fetch member before delete");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(member_number) = member_number else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Member not found"
        })));
    };

    let result = sqlx::query("DELETE FROM members WHERE id = ?")
        .bind(member_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Member not found"
                })));
            }

            member_filter::remove(&member_number);
            member_cache::forget(&member_number).await;

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }
        Err(e) => {
            error!(error = %e, member_id, "Failed to delete member");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}
