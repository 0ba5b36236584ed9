use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "member_number": "M-0001",
        "first_name": "Grace",
        "last_name": "Mensah",
        "email": "grace.mensah@example.com",
        "phone": "+233201234567",
        "zone_id": 2,
        "photo_url": null,
        "joined_date": "2023-05-14",
        "status": "active"
    })
)]
pub struct Member {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "M-0001")]
    pub member_number: String,

    #[schema(example = "Grace")]
    pub first_name: String,

    #[schema(example = "Mensah")]
    pub last_name: String,

    #[schema(example = "grace.mensah@example.com", nullable = true)]
    pub email: Option<String>,

    #[schema(example = "+233201234567", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = 2, nullable = true)]
    pub zone_id: Option<u64>,

    #[schema(nullable = true)]
    pub photo_url: Option<String>,

    #[schema(example = "2023-05-14", value_type = String, format = "date")]
    pub joined_date: NaiveDate,

    /// active | inactive | suspended
    #[schema(example = "active")]
    pub status: String,
}

/// Slim roster row used by the stats engine when joining top-attendee
/// tallies back to display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct MemberRef {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub member_number: String,
    pub photo_url: Option<String>,
}
