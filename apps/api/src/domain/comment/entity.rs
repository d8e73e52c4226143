use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author: String,
    pub avatar: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub like_count: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub post_id: i32,
    pub author: String,
    pub avatar: Option<String>,
    pub content: String,
}
