use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::inquiry::{Inquiry, NewInquiry};
use crate::utils::error::{AppError, AppResult};

/// Buyer inquiries left on a listing's contact form. Created by the public,
/// read by the dealer, never edited or deleted.
#[derive(Clone)]
pub struct InquiryService {
    pool: SqlitePool,
}

impl InquiryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_tables(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inquiries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                listing_id INTEGER NOT NULL REFERENCES listings(id),
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("failed to create inquiries table: {e}")))?;

        Ok(())
    }

    pub async fn create(&self, listing_id: i64, new: NewInquiry) -> AppResult<Inquiry> {
        let name = new.name.trim();
        let email = new.email.trim();
        let message = new.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(AppError::ValidationError(
                "name, email and message are all required".to_string(),
            ));
        }

        let created_at = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO inquiries (listing_id, name, email, message, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(listing_id)
        .bind(name)
        .bind(email)
        .bind(message)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("failed to insert inquiry: {e}")))?;

        log::info!("new inquiry for listing {listing_id} from {email}");

        Ok(Inquiry {
            id: result.last_insert_rowid(),
            listing_id,
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            created_at,
        })
    }

    pub async fn list_all(&self) -> AppResult<Vec<Inquiry>> {
        sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to query inquiries: {e}")))
    }
}
