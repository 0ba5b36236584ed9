use crate::api::attendance::{
    CheckInReq, MemberHistoryData, MemberHistoryResponse, PeriodInfo, SaveSession, SessionEntry,
    StatsData, StatsQuery, StatsResponse,
};
use crate::api::department::RosterEntry;
use crate::api::event::{CreateEvent, RegisterMember};
use crate::api::member::{CreateMember, MemberListResponse, MemberQuery};
use crate::api::notification::CreateNotification;
use crate::api::report::{ReportData, ReportResponse};
use crate::model::attendance::{Attendance, SessionType};
use crate::model::event::Event;
use crate::model::member::{Member, MemberRef};
use crate::model::notification::Notification;
use crate::stats::engine::{
    CategoryTrendPoint, DateTypeStat, MonthlyStat, Overview, Period, PresenceKind, StreakSummary,
    TopAttendee, TypeStat,
};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Church Management API",
        version = "1.0.0",
        description = r#"
## Church Management System

This API powers a church management system for congregations.

### Key Features
- **Member Management**
  - Create, update, list, and view member profiles
- **Attendance Tracking**
  - Bulk roster sweeps per session, QR-code check-in, and aggregated
    statistics (overview, per-date/type breakdowns, trends, top attendees,
    streaks)
- **Departments & Zones**
  - Rosters and membership management
- **Events & Notifications**
  - Event registration and user notifications
- **Reports**
  - Aggregated attendance data for the PDF report templates

### Security
Most endpoints are protected using **JWT Bearer authentication**.
Recording attendance and managing rosters requires the **Leader** role or
above; deletions require **Pastor** or **Admin**.

### Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::save_session,
        crate::api::attendance::check_in,
        crate::api::attendance::stats,
        crate::api::attendance::member_history,

        crate::api::member::create_member,
        crate::api::member::list_members,
        crate::api::member::get_member,
        crate::api::member::update_member,
        crate::api::member::delete_member,

        crate::api::department::list_departments,
        crate::api::department::roster,
        crate::api::department::add_to_roster,
        crate::api::department::remove_from_roster,

        crate::api::zone::list_zones,
        crate::api::zone::roster,

        crate::api::event::create_event,
        crate::api::event::list_events,
        crate::api::event::register_member,

        crate::api::notification::create_notification,
        crate::api::notification::list_notifications,
        crate::api::notification::mark_read,

        crate::api::report::attendance_report
    ),
    components(
        schemas(
            Member,
            CreateMember,
            MemberQuery,
            MemberListResponse,
            SessionType,
            Attendance,
            SaveSession,
            SessionEntry,
            CheckInReq,
            StatsQuery,
            StatsResponse,
            StatsData,
            PeriodInfo,
            Period,
            Overview,
            DateTypeStat,
            CategoryTrendPoint,
            TypeStat,
            TopAttendee,
            StreakSummary,
            PresenceKind,
            MonthlyStat,
            MemberRef,
            MemberHistoryResponse,
            MemberHistoryData,
            ReportData,
            RosterEntry,
            Event,
            CreateEvent,
            RegisterMember,
            Notification,
            CreateNotification,
            ReportResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance recording and statistics APIs"),
        (name = "Member", description = "Member management APIs"),
        (name = "Department", description = "Department roster APIs"),
        (name = "Zone", description = "Zone roster APIs"),
        (name = "Event", description = "Event and registration APIs"),
        (name = "Notification", description = "Notification APIs"),
        (name = "Report", description = "Report data APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
