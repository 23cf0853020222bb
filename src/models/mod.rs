pub mod inquiry;
pub mod listing;
pub mod user;

pub use inquiry::*;
pub use listing::*;
pub use user::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u32,
    pub status: String,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            status: "ok".to_string(),
            message: None,
            data: Some(data),
        }
    }
}
