use actix_web::{post, web, HttpResponse};

use crate::models::inquiry::NewInquiry;
use crate::models::ApiResponse;
use crate::services::{InquiryService, InventoryService};
use crate::utils::error::{AppError, AppResult};

/// Public contact form on a listing's detail page.
#[post("/car/{id}/contact")]
pub async fn submit_inquiry(
    path: web::Path<i64>,
    form: web::Form<NewInquiry>,
    inventory: web::Data<InventoryService>,
    inquiries: web::Data<InquiryService>,
) -> AppResult<HttpResponse> {
    let listing_id = path.into_inner();

    if !inventory.exists(listing_id).await? {
        return Err(AppError::ListingNotFound(listing_id));
    }

    let inquiry = inquiries.create(listing_id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(inquiry)))
}
