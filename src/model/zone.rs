use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Zone {
    pub id: u64,
    pub name: String,
    pub leader_id: Option<u64>,
}
