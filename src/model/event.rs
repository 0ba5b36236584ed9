use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Event {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Harvest Convention")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "2026-09-12", value_type = String, format = "date")]
    pub event_date: NaiveDate,
    pub location: Option<String>,
    pub created_by: u64,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRegistration {
    pub id: u64,
    pub event_id: u64,
    pub member_id: u64,
    pub registered_at: Option<DateTime<Utc>>,
}
