use std::collections::HashSet;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::attendance::{Attendance, SessionType};
use crate::model::member::MemberRef;
use crate::stats::engine::{
    self, CategoryTrendPoint, DateTypeStat, MonthlyStat, Overview, Period, SessionRecord,
    StreakSummary, TopAttendee, TypeStat,
};
use crate::utils::{member_cache, member_filter};
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

use super::server_error;

const TOP_ATTENDEES_LIMIT: usize = 10;

#[derive(Deserialize, ToSchema)]
pub struct SessionEntry {
    #[schema(example = 12)]
    pub member_id: u64,
    pub present: bool,
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct SaveSession {
    #[schema(example = "2026-08-16", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "sunday_service")]
    pub attendance_type: SessionType,
    pub event_id: Option<u64>,
    pub entries: Vec<SessionEntry>,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckInReq {
    /// Member number carried in the QR code
    #[schema(example = "M-0001")]
    pub member_number: String,
    #[schema(example = "sunday_service")]
    pub attendance_type: SessionType,
    /// Defaults to today (UTC) when omitted
    #[schema(example = "2026-08-16", format = "date", value_type = String, nullable = true)]
    pub date: Option<NaiveDate>,
    pub event_id: Option<u64>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct StatsQuery {
    /// weekly | monthly | quarterly | yearly (default monthly)
    pub period: Option<Period>,
    /// Restrict to one department's active roster
    pub department_id: Option<u64>,
    /// Restrict to one session type
    #[serde(rename = "type")]
    pub session_type: Option<SessionType>,
}

#[derive(Serialize, ToSchema)]
pub struct PeriodInfo {
    #[serde(rename = "type")]
    pub period: Period,
    #[serde(rename = "startDate")]
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub overview: Overview,
    pub date_stats: Vec<DateTypeStat>,
    pub trend_data: Vec<CategoryTrendPoint>,
    pub type_stats: Vec<TypeStat>,
    pub top_attendees: Vec<TopAttendee>,
    pub period: PeriodInfo,
}

#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    pub data: StatsData,
}

#[derive(Serialize, ToSchema)]
pub struct MemberHistoryData {
    pub records: Vec<Attendance>,
    pub streak: StreakSummary,
    pub monthly: Vec<MonthlyStat>,
}

#[derive(Serialize, ToSchema)]
pub struct MemberHistoryResponse {
    pub data: MemberHistoryData,
}

async fn fetch_records(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SessionRecord>, sqlx::Error> {
    sqlx::query_as::<_, SessionRecord>(
        r#"
        SELECT member_id, date, attendance_type, present
        FROM attendance
        WHERE date BETWEEN ? AND ?
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// Save one session's roster sweep
#[utoipa::path(
    post,
    path = "/api/v1/attendance/sessions",
    request_body = SaveSession,
    responses(
        (status = 200, description = "Session saved", body = Object, example = json!({
            "message": "Session saved",
            "saved": 42
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn save_session(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<SaveSession>,
) -> actix_web::Result<impl Responder> {
    auth.require_leader_or_above()?;

    let attendance_type = payload.attendance_type.to_string();

    let mut tx = match pool.begin().await {
        Ok(tx) => tx,
        Err(e) => {
            error!(error = %e, "Failed to open transaction for session save");
            return Ok(server_error(
                &config,
                "Failed to save session",
                e.to_string(),
            ));
        }
    };

    for entry in &payload.entries {
        // one row per (member, date, type); re-saving the session overwrites
        let result = sqlx::query(
            r#"
            INSERT INTO attendance
                (member_id, date, attendance_type, present, notes, event_id, recorded_by)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                present = VALUES(present),
                notes = VALUES(notes),
                event_id = VALUES(event_id),
                recorded_by = VALUES(recorded_by)
            "#,
        )
        .bind(entry.member_id)
        .bind(payload.date)
        .bind(&attendance_type)
        .bind(entry.present)
        .bind(&entry.notes)
        .bind(payload.event_id)
        .bind(auth.user_id)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            error!(error = %e, member_id = entry.member_id, "Failed to save attendance entry");
            return Ok(server_error(
                &config,
                "Failed to save session",
                e.to_string(),
            ));
        }
    }

    if let Err(e) = tx.commit().await {
        error!(error = %e, "Failed to commit session save");
        return Ok(server_error(
            &config,
            "Failed to save session",
            e.to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Session saved",
        "saved": payload.entries.len()
    })))
}

/// QR check-in: resolve the scanned member number and upsert a present record
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = CheckInReq,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "member_id": 12
        })),
        (status = 404, description = "Unknown member number", body = Object, example = json!({
            "message": "Unknown member number"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<CheckInReq>,
) -> actix_web::Result<impl Responder> {
    // fast negative once the filter is warm; a cold or failed warmup
    // reads every number as a maybe and falls through to the cache/DB
    if !member_filter::might_exist(&payload.member_number) {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Unknown member number"
        })));
    }

    let member_id = match member_cache::lookup(&payload.member_number).await {
        Some(id) => id,
        None => {
            let found = match sqlx::query_scalar::<_, u64>(
                "SELECT id FROM members WHERE member_number = ? AND status = 'active'",
            )
            .bind(payload.member_number.trim().to_uppercase())
            .fetch_optional(pool.get_ref())
            .await
            {
                Ok(found) => found,
                Err(e) => {
                    error!(error = %e, "Check-in member lookup failed");
                    return Ok(server_error(&config, "Check-in failed", e.to_string()));
                }
            };

            match found {
                Some(id) => {
                    member_cache::remember(&payload.member_number, id).await;
                    id
                }
                None => {
                    return Ok(HttpResponse::NotFound().json(json!({
                        "message": "Unknown member number"
                    })));
                }
            }
        }
    };

    let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());

    let result = sqlx::query(
        r#"
        INSERT INTO attendance
            (member_id, date, attendance_type, present, event_id, recorded_by)
        VALUES (?, ?, ?, TRUE, ?, ?)
        ON DUPLICATE KEY UPDATE
            present = TRUE,
            event_id = VALUES(event_id),
            recorded_by = VALUES(recorded_by)
        "#,
    )
    .bind(member_id)
    .bind(date)
    .bind(payload.attendance_type.to_string())
    .bind(payload.event_id)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "message": "Checked in successfully",
            "member_id": member_id
        }))),
        Err(e) => {
            error!(error = %e, member_id, "Check-in failed");
            Ok(server_error(&config, "Check-in failed", e.to_string()))
        }
    }
}

/// Aggregate attendance statistics for dashboards and reports
#[utoipa::path(
    get,
    path = "/api/v1/attendance/stats",
    params(
        ("period" = Option<String>, Query, description = "weekly | monthly | quarterly | yearly (default monthly)"),
        ("department_id" = Option<u64>, Query, description = "Restrict to one department's roster"),
        ("type" = Option<String>, Query, description = "Restrict to one session type")
    ),
    responses(
        (status = 200, description = "Aggregated statistics", body = StatsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "error": "Failed to load attendance statistics"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn stats(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<StatsQuery>,
) -> actix_web::Result<impl Responder> {
    let today = Utc::now().date_naive();

    match load_stats(pool.get_ref(), &query, today).await {
        Ok(data) => Ok(HttpResponse::Ok().json(StatsResponse { data })),
        Err(e) => {
            error!(error = %e, "Failed to load attendance statistics");
            Ok(server_error(
                &config,
                "Failed to load attendance statistics",
                e.to_string(),
            ))
        }
    }
}

/// Fetch engine inputs and run every aggregation for one stats request.
/// Shared by the dashboard stats endpoint and the report endpoint.
pub(crate) async fn load_stats(
    pool: &MySqlPool,
    query: &StatsQuery,
    today: NaiveDate,
) -> Result<StatsData, sqlx::Error> {
    let period = query.period.unwrap_or_default();
    let (start, end) = engine::period_range(period, today);

    let type_filter = query.session_type.map(|t| t.to_string());

    // independent inputs, fetched concurrently
    let records_fut = fetch_records(pool, start, end);
    let total_fut =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members WHERE status = 'active'")
            .fetch_one(pool);
    let roster_fut = sqlx::query_as::<_, MemberRef>(
        "SELECT id, first_name, last_name, member_number, photo_url FROM members WHERE status = 'active'",
    )
    .fetch_all(pool);

    let (records, total_active, roster) =
        futures::try_join!(records_fut, total_fut, roster_fut)?;

    let member_subset = match query.department_id {
        Some(department_id) => {
            let ids = sqlx::query_scalar::<_, u64>(
                r#"
                SELECT member_id
                FROM department_members
                WHERE department_id = ? AND is_active = TRUE
                "#,
            )
            .bind(department_id)
            .fetch_all(pool)
            .await?;

            Some(ids.into_iter().collect::<HashSet<u64>>())
        }
        None => None,
    };

    let records = engine::filter_records(
        records,
        start,
        end,
        type_filter.as_deref(),
        member_subset.as_ref(),
    );

    // secondary query feeding only weeklyTrend; a failure here degrades the
    // trend to 0 instead of failing the request
    let previous_week = if period == Period::Weekly {
        let (prev_start, prev_end) = engine::previous_week_range(start);
        match fetch_records(pool, prev_start, prev_end).await {
            Ok(rows) => Some(engine::filter_records(
                rows,
                prev_start,
                prev_end,
                type_filter.as_deref(),
                member_subset.as_ref(),
            )),
            Err(e) => {
                warn!(error = %e, "Previous-week fetch failed; weekly trend degraded to 0");
                None
            }
        }
    } else {
        None
    };

    let total_active = total_active.max(0) as u64;
    let overview = engine::overview(&records, total_active, period, previous_week.as_deref());

    Ok(StatsData {
        overview,
        date_stats: engine::date_type_breakdown(&records),
        trend_data: engine::trend_by_category(&records),
        type_stats: engine::type_breakdown(&records),
        top_attendees: engine::top_attendees(&records, &roster, TOP_ATTENDEES_LIMIT),
        period: PeriodInfo {
            period,
            start_date: start,
            end_date: end,
        },
    })
}

/// One member's attendance history with streaks and a monthly rollup
#[utoipa::path(
    get,
    path = "/api/v1/attendance/members/{member_id}",
    params(
        ("member_id" = u64, Path, description = "Member ID"),
        ("period" = Option<String>, Query, description = "Reporting period (default yearly)")
    ),
    responses(
        (status = 200, description = "Member attendance history", body = MemberHistoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn member_history(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    query: web::Query<StatsQuery>,
) -> actix_web::Result<impl Responder> {
    let member_id = path.into_inner();
    let period = query.period.unwrap_or(Period::Yearly);
    let today = Utc::now().date_naive();
    let (start, end) = engine::period_range(period, today);

    let rows = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, member_id, date, attendance_type, present, notes, event_id,
               recorded_by, created_at
        FROM attendance
        WHERE member_id = ? AND date BETWEEN ? AND ?
        ORDER BY date DESC
        "#,
    )
    .bind(member_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool.get_ref())
    .await;

    let rows = match rows {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, member_id, "Failed to fetch member attendance history");
            return Ok(server_error(
                &config,
                "Failed to load member history",
                e.to_string(),
            ));
        }
    };

    let records: Vec<SessionRecord> = rows
        .iter()
        .map(|r| SessionRecord {
            member_id: r.member_id,
            date: r.date,
            attendance_type: r.attendance_type.clone(),
            present: r.present,
        })
        .collect();

    Ok(HttpResponse::Ok().json(MemberHistoryResponse {
        data: MemberHistoryData {
            streak: engine::member_streak(&records, member_id),
            monthly: engine::monthly_rollup(&records, member_id),
            records: rows,
        },
    }))
}
