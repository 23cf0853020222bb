use sqlx::SqlitePool;

use crate::models::listing::{Listing, ListingFilters, ListingSummary, NewListing, Page};
use crate::utils::error::{AppError, AppResult};

pub const PER_PAGE: u32 = 12;

/// Inventory store: the listings table and the image rows each listing owns.
#[derive(Clone)]
pub struct InventoryService {
    pool: SqlitePool,
}

impl InventoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init_tables(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                brand TEXT NOT NULL,
                body_type TEXT,
                year INTEGER,
                mileage INTEGER,
                engine TEXT,
                transmission TEXT,
                drivetrain TEXT,
                price_usd INTEGER NOT NULL,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("failed to create listings table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listing_images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                listing_id INTEGER NOT NULL REFERENCES listings(id),
                filename TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("failed to create listing_images table: {e}"))
        })?;

        Ok(())
    }

    /// Inserts the listing row and all of its image rows in one transaction,
    /// so a crash can never leave a listing without its gallery.
    pub async fn create(&self, new: NewListing, image_filenames: &[String]) -> AppResult<Listing> {
        let template = new.into_listing(0);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to open transaction: {e}")))?;

        let result = sqlx::query(
            r#"
            INSERT INTO listings
                (name, brand, body_type, year, mileage, engine, transmission,
                 drivetrain, price_usd, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&template.name)
        .bind(&template.brand)
        .bind(&template.body_type)
        .bind(template.year)
        .bind(template.mileage)
        .bind(&template.engine)
        .bind(&template.transmission)
        .bind(&template.drivetrain)
        .bind(template.price_usd)
        .bind(&template.description)
        .bind(&template.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(format!("failed to insert listing: {e}")))?;

        let id = result.last_insert_rowid();

        for (position, filename) in image_filenames.iter().enumerate() {
            sqlx::query(
                "INSERT INTO listing_images (listing_id, filename, position) VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(filename)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to insert image row: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to commit listing: {e}")))?;

        log::info!(
            "created listing {id} ({}) with {} image(s)",
            template.name,
            image_filenames.len()
        );

        Ok(Listing { id, ..template })
    }

    /// One page of the catalog under conjunctive filters.
    pub async fn list(&self, filters: &ListingFilters) -> AppResult<Page<ListingSummary>> {
        let where_sql = filter_sql(filters);
        let brand = filters.brand.as_ref().map(|b| b.to_lowercase());
        let body_type = filters.body_type.as_ref().map(|b| b.to_lowercase());
        let search = filters
            .search
            .as_ref()
            .map(|s| format!("%{}%", s.to_lowercase()));

        let count_sql = format!("SELECT COUNT(*) FROM listings{where_sql}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(v) = filters.min_price {
            count_query = count_query.bind(v);
        }
        if let Some(v) = filters.max_price {
            count_query = count_query.bind(v);
        }
        if let Some(v) = &brand {
            count_query = count_query.bind(v.as_str());
        }
        if let Some(v) = &body_type {
            count_query = count_query.bind(v.as_str());
        }
        if let Some(v) = &search {
            count_query = count_query
                .bind(v.as_str())
                .bind(v.as_str())
                .bind(v.as_str());
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to count listings: {e}")))?;

        let page = filters.page.max(1);
        let offset = (page - 1) as i64 * PER_PAGE as i64;

        let select_sql = format!(
            r#"
            SELECT l.*,
                   (SELECT filename FROM listing_images li
                     WHERE li.listing_id = l.id
                     ORDER BY li.position, li.id LIMIT 1) AS cover_image
            FROM listings l{where_sql}
            ORDER BY {order}
            LIMIT ? OFFSET ?
            "#,
            order = filters.sort.sql()
        );

        let mut select_query = sqlx::query_as::<_, ListingSummary>(&select_sql);
        if let Some(v) = filters.min_price {
            select_query = select_query.bind(v);
        }
        if let Some(v) = filters.max_price {
            select_query = select_query.bind(v);
        }
        if let Some(v) = &brand {
            select_query = select_query.bind(v.as_str());
        }
        if let Some(v) = &body_type {
            select_query = select_query.bind(v.as_str());
        }
        if let Some(v) = &search {
            select_query = select_query
                .bind(v.as_str())
                .bind(v.as_str())
                .bind(v.as_str());
        }

        let items = select_query
            .bind(PER_PAGE as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to query listings: {e}")))?;

        Ok(Page {
            items,
            page,
            per_page: PER_PAGE,
            total,
            total_pages: (total + PER_PAGE as i64 - 1) / PER_PAGE as i64,
        })
    }

    /// Unpaginated newest-first view for the admin table.
    pub async fn list_all(&self) -> AppResult<Vec<ListingSummary>> {
        sqlx::query_as::<_, ListingSummary>(
            r#"
            SELECT l.*,
                   (SELECT filename FROM listing_images li
                     WHERE li.listing_id = l.id
                     ORDER BY li.position, li.id LIMIT 1) AS cover_image
            FROM listings l
            ORDER BY l.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("failed to query listings: {e}")))
    }

    pub async fn get(&self, id: i64) -> AppResult<(Listing, Vec<String>)> {
        let listing = sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to fetch listing: {e}")))?
            .ok_or(AppError::ListingNotFound(id))?;

        let images = self.image_filenames(id).await?;

        Ok((listing, images))
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to check listing: {e}")))?;
        Ok(count > 0)
    }

    /// Removes the listing and its image rows, returning the owned filenames
    /// so the caller can clean up the files on disk.
    pub async fn delete(&self, id: i64) -> AppResult<Vec<String>> {
        let filenames = self.image_filenames(id).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to open transaction: {e}")))?;

        sqlx::query("DELETE FROM listing_images WHERE listing_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to delete image rows: {e}")))?;

        let result = sqlx::query("DELETE FROM listings WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to delete listing: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::ListingNotFound(id));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("failed to commit delete: {e}")))?;

        log::info!("deleted listing {id} and {} image row(s)", filenames.len());

        Ok(filenames)
    }

    async fn image_filenames(&self, listing_id: i64) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT filename FROM listing_images WHERE listing_id = ? ORDER BY position, id",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("failed to fetch image rows: {e}")))
    }
}

fn filter_sql(filters: &ListingFilters) -> String {
    let mut sql = String::from(" WHERE 1=1");
    if filters.min_price.is_some() {
        sql.push_str(" AND price_usd >= ?");
    }
    if filters.max_price.is_some() {
        sql.push_str(" AND price_usd <= ?");
    }
    if filters.brand.is_some() {
        sql.push_str(" AND LOWER(brand) = ?");
    }
    if filters.body_type.is_some() {
        sql.push_str(" AND LOWER(body_type) = ?");
    }
    if filters.search.is_some() {
        sql.push_str(
            " AND (LOWER(name) LIKE ? OR LOWER(brand) LIKE ? OR LOWER(description) LIKE ?)",
        );
    }
    sql
}
