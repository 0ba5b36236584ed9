use crate::auth::auth::AuthUser;
use crate::model::event::Event;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateEvent {
    #[schema(example = "Harvest Convention")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "2026-09-12", format = "date", value_type = String)]
    pub event_date: NaiveDate,
    pub location: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterMember {
    #[schema(example = 12)]
    pub member_id: u64,
}

/// Create an event
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Event"
)]
pub async fn create_event(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEvent>,
) -> actix_web::Result<impl Responder> {
    auth.require_leader_or_above()?;

    let result = sqlx::query(
        r#"
        INSERT INTO events (title, description, event_date, location, created_by)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.event_date)
    .bind(&payload.location)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create event");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Event created",
        "id": result.last_insert_id()
    })))
}

/// List upcoming events, soonest first
#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "Upcoming events"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Event"
)]
pub async fn list_events(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let events = sqlx::query_as::<_, Event>(
        r#"
        SELECT id, title, description, event_date, location, created_by
        FROM events
        WHERE event_date >= CURDATE()
        ORDER BY event_date
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to list events");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "data": events })))
}

/// Register a member for an event
#[utoipa::path(
    post,
    path = "/api/v1/events/{event_id}/registrations",
    params(
        ("event_id" = u64, Path, description = "Event ID")
    ),
    request_body = RegisterMember,
    responses(
        (status = 201, description = "Registered"),
        (status = 409, description = "Already registered"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Event"
)]
pub async fn register_member(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<RegisterMember>,
) -> actix_web::Result<impl Responder> {
    let event_id = path.into_inner();

    let result = sqlx::query(
        "INSERT INTO event_registrations (event_id, member_id) VALUES (?, ?)",
    )
    .bind(event_id)
    .bind(payload.member_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Registered"
        }))),
        Err(e) => {
            // duplicate registration for the same member/event
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Already registered"
                    })));
                }
            }

            error!(error = %e, event_id, member_id = payload.member_id, "Failed to register for event");
            Err(ErrorInternalServerError("Internal Server Error"))
        }
    }
}
