use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::models::listing::{Listing, ListingFilters, ListingSummary, SortOrder};
use crate::models::ApiResponse;
use crate::services::{ExchangeRateService, InventoryService};
use crate::utils::error::AppResult;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub brand: Option<String>,
    pub body_type: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl CatalogQuery {
    /// Query parameters come in as strings; a bound that does not parse is
    /// dropped rather than rejected, the catalog stays browsable.
    fn into_filters(self) -> ListingFilters {
        ListingFilters {
            min_price: self.min_price.as_deref().and_then(|v| v.parse().ok()),
            max_price: self.max_price.as_deref().and_then(|v| v.parse().ok()),
            brand: self.brand.filter(|v| !v.trim().is_empty()),
            body_type: self.body_type.filter(|v| !v.trim().is_empty()),
            search: self.search.filter(|v| !v.trim().is_empty()),
            sort: SortOrder::from_param(self.sort.as_deref()),
            page: self
                .page
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogItem {
    #[serde(flatten)]
    pub listing: ListingSummary,
    pub price_ngn: i64,
}

#[derive(Debug, Serialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: i64,
    pub usd_to_ngn_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub listing: Listing,
    pub price_ngn: i64,
    pub images: Vec<String>,
}

fn to_ngn(price_usd: i64, rate: f64) -> i64 {
    (price_usd as f64 * rate).round() as i64
}

/// Public catalog with filters, search, sort and pagination.
#[get("/")]
pub async fn index(
    query: web::Query<CatalogQuery>,
    inventory: web::Data<InventoryService>,
    exchange: web::Data<ExchangeRateService>,
) -> AppResult<HttpResponse> {
    let filters = query.into_inner().into_filters();
    let page = inventory.list(&filters).await?;
    let rate = exchange.get_rate().await;

    let items = page
        .items
        .into_iter()
        .map(|listing| CatalogItem {
            price_ngn: to_ngn(listing.price_usd, rate),
            listing,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CatalogPage {
        items,
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        total_pages: page.total_pages,
        usd_to_ngn_rate: rate,
    })))
}

/// Detail page data for one listing; 404 when the id is unknown.
#[get("/car/{id}")]
pub async fn detail(
    path: web::Path<i64>,
    inventory: web::Data<InventoryService>,
    exchange: web::Data<ExchangeRateService>,
) -> AppResult<HttpResponse> {
    let (listing, images) = inventory.get(path.into_inner()).await?;
    let rate = exchange.get_rate().await;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ListingDetail {
        price_ngn: to_ngn(listing.price_usd, rate),
        listing,
        images,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::listing::NewListing;
    use actix_web::{test, App};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_services() -> (InventoryService, ExchangeRateService) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to connect to in-memory database");
        let inventory = InventoryService::new(pool);
        inventory.init_tables().await.expect("failed to init tables");

        // unreachable endpoint: every rate lookup uses the fallback
        let exchange = ExchangeRateService::new("http://127.0.0.1:9/latest".to_string(), 1500.0)
            .expect("service build failed");

        (inventory, exchange)
    }

    fn sample(name: &str, price_usd: i64) -> NewListing {
        NewListing {
            name: name.to_string(),
            brand: "Toyota".to_string(),
            body_type: None,
            year: None,
            mileage: None,
            engine: None,
            transmission: None,
            drivetrain: None,
            price_usd,
            description: "clean".to_string(),
        }
    }

    #[actix_web::test]
    async fn detail_page_contains_title_and_prices() {
        let (inventory, exchange) = test_services().await;
        let created = inventory
            .create(sample("Corolla LE", 14500), &["front.jpg".to_string()])
            .await
            .expect("create failed");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(inventory.clone()))
                .app_data(web::Data::new(exchange.clone()))
                .service(detail),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/car/{}", created.id))
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        let data = &body["data"];
        assert_eq!(data["name"], "Corolla LE");
        assert_eq!(data["price_usd"], 14500);
        assert_eq!(data["price_ngn"], 14500 * 1500);
        assert_eq!(data["images"][0], "front.jpg");
    }

    #[actix_web::test]
    async fn detail_of_unknown_id_is_404() {
        let (inventory, exchange) = test_services().await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(inventory.clone()))
                .app_data(web::Data::new(exchange.clone()))
                .service(detail),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/car/999").to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn index_applies_price_bounds_inclusively() {
        let (inventory, exchange) = test_services().await;
        for (name, price) in [("Low", 19999), ("Mid", 25000), ("Edge", 30000), ("High", 30001)] {
            inventory
                .create(sample(name, price), &[])
                .await
                .expect("create failed");
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(inventory.clone()))
                .app_data(web::Data::new(exchange.clone()))
                .service(index),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/?min_price=20000&max_price=30000")
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        let items = body["data"]["items"].as_array().expect("items missing");
        let mut names: Vec<_> = items
            .iter()
            .map(|i| i["name"].as_str().expect("name missing"))
            .collect();
        names.sort();
        assert_eq!(names, vec!["Edge", "Mid"]);
    }

    #[actix_web::test]
    async fn non_numeric_price_bound_is_ignored() {
        let (inventory, exchange) = test_services().await;
        inventory
            .create(sample("Corolla", 14500), &[])
            .await
            .expect("create failed");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(inventory.clone()))
                .app_data(web::Data::new(exchange.clone()))
                .service(index),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/?min_price=cheap")
                .to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["total"], 1);
    }
}
