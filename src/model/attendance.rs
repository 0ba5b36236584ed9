use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Session types recorded by the app. Stored as plain strings in the DB;
/// the stats engine treats the column as opaque so new types can be added
/// without touching the aggregation code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionType {
    SundayService,
    MidweekFellowship,
    SpecialEvent,
    DepartmentMeeting,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: u64,
    pub member_id: u64,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub attendance_type: String,
    pub present: bool,
    pub notes: Option<String>,
    pub event_id: Option<u64>,
    pub recorded_by: u64,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}
