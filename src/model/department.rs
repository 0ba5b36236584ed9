use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    pub id: u64,
    pub name: String,
    pub leader_id: Option<u64>,
}

/// Roster join row; the stats department filter is built from the
/// `member_id`s of active rows.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct DepartmentMember {
    pub department_id: u64,
    pub member_id: u64,
    pub is_active: bool,
}
