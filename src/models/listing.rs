use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub body_type: Option<String>,
    pub year: Option<i64>,
    pub mileage: Option<i64>,
    pub engine: Option<String>,
    pub transmission: Option<String>,
    pub drivetrain: Option<String>,
    pub price_usd: i64,
    pub description: String,
    pub created_at: String,
}

/// Catalog row: a listing plus the first gallery image, if any.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ListingSummary {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub body_type: Option<String>,
    pub year: Option<i64>,
    pub mileage: Option<i64>,
    pub engine: Option<String>,
    pub transmission: Option<String>,
    pub drivetrain: Option<String>,
    pub price_usd: i64,
    pub description: String,
    pub created_at: String,
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewListing {
    pub name: String,
    pub brand: String,
    pub body_type: Option<String>,
    pub year: Option<i64>,
    pub mileage: Option<i64>,
    pub engine: Option<String>,
    pub transmission: Option<String>,
    pub drivetrain: Option<String>,
    pub price_usd: i64,
    pub description: String,
}

impl NewListing {
    /// Builds a listing from the admin form fields.
    ///
    /// `name`, `brand`, `price_usd` and `description` are required; numeric
    /// fields must parse and be non-negative, anything else is a 400.
    pub fn from_form(fields: &HashMap<String, String>) -> AppResult<Self> {
        let name = required(fields, "name")?;
        let brand = required(fields, "brand")?;
        let description = required(fields, "description")?;

        let price_usd = parse_non_negative(&required(fields, "price_usd")?, "price_usd")?;
        let year = optional_non_negative(fields, "year")?;
        let mileage = optional_non_negative(fields, "mileage")?;

        Ok(Self {
            name,
            brand,
            body_type: optional(fields, "body_type"),
            year,
            mileage,
            engine: optional(fields, "engine"),
            transmission: optional(fields, "transmission"),
            drivetrain: optional(fields, "drivetrain"),
            price_usd,
            description,
        })
    }

    pub fn into_listing(self, id: i64) -> Listing {
        Listing {
            id,
            name: self.name,
            brand: self.brand,
            body_type: self.body_type,
            year: self.year,
            mileage: self.mileage,
            engine: self.engine,
            transmission: self.transmission,
            drivetrain: self.drivetrain,
            price_usd: self.price_usd,
            description: self.description,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

fn required(fields: &HashMap<String, String>, key: &str) -> AppResult<String> {
    match fields.get(key).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::ValidationError(format!(
            "missing required field: {key}"
        ))),
    }
}

fn optional(fields: &HashMap<String, String>, key: &str) -> Option<String> {
    fields
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

fn parse_non_negative(value: &str, key: &str) -> AppResult<i64> {
    let parsed: i64 = value
        .parse()
        .map_err(|_| AppError::ValidationError(format!("{key} must be a whole number")))?;
    if parsed < 0 {
        return Err(AppError::ValidationError(format!(
            "{key} must not be negative"
        )));
    }
    Ok(parsed)
}

fn optional_non_negative(fields: &HashMap<String, String>, key: &str) -> AppResult<Option<i64>> {
    match optional(fields, key) {
        Some(v) => Ok(Some(parse_non_negative(&v, key)?)),
        None => Ok(None),
    }
}

/// Sort orders the catalog supports; insertion order (newest first) is the
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("price_asc") => SortOrder::PriceAsc,
            Some("price_desc") => SortOrder::PriceDesc,
            _ => SortOrder::Newest,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Newest => "id DESC",
            SortOrder::PriceAsc => "price_usd ASC, id DESC",
            SortOrder::PriceDesc => "price_usd DESC, id DESC",
        }
    }
}

/// Conjunctive catalog filters.
#[derive(Debug, Clone, Default)]
pub struct ListingFilters {
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub brand: Option<String>,
    pub body_type: Option<String>,
    pub search: Option<String>,
    pub sort: SortOrder,
    pub page: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: i64,
}
