use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One requester's active like on one target.
///
/// Marks are inserted on like and deleted on unlike, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LikeMark {
    pub id: i32,
    pub target_id: i32,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}
