use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub author_name: String,
    pub body: String,
    pub rating: i16,
    pub likes: i64,
    pub flagged: bool,
    pub flag_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub product_id: i32,
    pub body: String,
    pub rating: i16,
}

#[derive(Debug, Deserialize)]
pub struct FlagRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub count: usize,
    pub average: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CommentThread {
    pub comments: Vec<Comment>,
    pub rating: RatingSummary,
}
