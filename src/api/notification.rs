use crate::auth::auth::AuthUser;
use crate::model::notification::Notification;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateNotification {
    #[schema(example = 12)]
    pub recipient_id: u64,
    #[schema(example = "Service reminder")]
    pub title: String,
    pub body: String,
}

#[derive(Deserialize, ToSchema)]
pub struct NotificationQuery {
    /// Only unread notifications when true
    pub unread: Option<bool>,
}

/// Send a notification to a user
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    request_body = CreateNotification,
    responses(
        (status = 201, description = "Notification created"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn create_notification(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateNotification>,
) -> actix_web::Result<impl Responder> {
    auth.require_leader_or_above()?;

    sqlx::query(
        "INSERT INTO notifications (recipient_id, title, body, is_read) VALUES (?, ?, ?, FALSE)",
    )
    .bind(payload.recipient_id)
    .bind(&payload.title)
    .bind(&payload.body)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, recipient_id = payload.recipient_id, "Failed to create notification");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(json!({ "message": "Notification created" })))
}

/// List the calling user's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(
        ("unread" = Option<bool>, Query, description = "Only unread notifications")
    ),
    responses(
        (status = 200, description = "Notifications for the calling user"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn list_notifications(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<NotificationQuery>,
) -> actix_web::Result<impl Responder> {
    let sql = if query.unread.unwrap_or(false) {
        r#"
        SELECT id, recipient_id, title, body, is_read, created_at
        FROM notifications
        WHERE recipient_id = ? AND is_read = FALSE
        ORDER BY created_at DESC
        "#
    } else {
        r#"
        SELECT id, recipient_id, title, body, is_read, created_at
        FROM notifications
        WHERE recipient_id = ?
        ORDER BY created_at DESC
        "#
    };

    let notifications = sqlx::query_as::<_, Notification>(sql)
        .bind(auth.user_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id = auth.user_id, "Failed to list notifications");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({ "data": notifications })))
}

/// Mark one of the calling user's notifications as read
#[utoipa::path(
    put,
    path = "/api/v1/notifications/{notification_id}/read",
    params(
        ("notification_id" = u64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Marked as read"),
        (status = 404, description = "Notification not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Notification"
)]
pub async fn mark_read(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let notification_id = path.into_inner();

    let result = sqlx::query(
        "UPDATE notifications SET is_read = TRUE WHERE id = ? AND recipient_id = ?",
    )
    .bind(notification_id)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, notification_id, "Failed to mark notification read");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Notification not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Marked as read" })))
}
