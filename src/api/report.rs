use crate::api::attendance::{StatsData, StatsQuery, load_stats};
use crate::auth::auth::AuthUser;
use crate::config::Config;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use super::server_error;

/// Report payload: the aggregate stats plus a generation timestamp. The PDF
/// itself is rendered by the client-side templating layer from this data.
#[derive(Serialize, ToSchema)]
pub struct ReportData {
    #[schema(value_type = String, format = "date-time")]
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub stats: StatsData,
}

#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    pub data: ReportData,
}

/// Attendance report data for the PDF templating layer
#[utoipa::path(
    get,
    path = "/api/v1/reports/attendance",
    params(
        ("period" = Option<String>, Query, description = "weekly | monthly | quarterly | yearly (default monthly)"),
        ("department_id" = Option<u64>, Query, description = "Restrict to one department's roster"),
        ("type" = Option<String>, Query, description = "Restrict to one session type")
    ),
    responses(
        (status = 200, description = "Report data", body = ReportResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Report"
)]
pub async fn attendance_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<StatsQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_leader_or_above()?;

    let generated_at = Utc::now();

    match load_stats(pool.get_ref(), &query, generated_at.date_naive()).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ReportResponse {
            data: ReportData {
                generated_at,
                stats,
            },
        })),
        Err(e) => {
            error!(error = %e, "Failed to build attendance report");
            Ok(server_error(
                &config,
                "Failed to build attendance report",
                e.to_string(),
            ))
        }
    }
}
