use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Inquiry {
    pub id: i64,
    pub listing_id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: String,
}

/// Public contact form body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub message: String,
}
