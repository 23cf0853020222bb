use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::http::header;
use actix_web::{get, post, web, HttpResponse};
use futures::TryStreamExt;

use crate::models::listing::NewListing;
use crate::models::ApiResponse;
use crate::services::{InquiryService, InventoryService, UploadService};
use crate::utils::error::{AppError, AppResult};
use crate::utils::session::require_admin;

/// Admin landing data: the full inventory table, newest first.
#[get("/admin")]
pub async fn admin_page(
    session: Session,
    inventory: web::Data<InventoryService>,
) -> AppResult<HttpResponse> {
    require_admin(&session)?;
    let listings = inventory.list_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(listings)))
}

/// Multipart upload form: text fields plus one or more `image` file parts.
///
/// Files hit the disk before the database row exists; if the insert fails the
/// stored files are removed again so nothing is orphaned.
#[post("/admin")]
pub async fn create_listing(
    session: Session,
    mut payload: Multipart,
    inventory: web::Data<InventoryService>,
    uploads: web::Data<UploadService>,
) -> AppResult<HttpResponse> {
    require_admin(&session)?;

    let mut fields: HashMap<String, String> = HashMap::new();
    let mut stored_files: Vec<String> = Vec::new();

    let collected: AppResult<()> = async {
        while let Some(mut field) = payload.try_next().await? {
            let (name, file_name) = {
                let disposition = field.content_disposition();
                (
                    disposition
                        .and_then(|d| d.get_name())
                        .unwrap_or("")
                        .to_string(),
                    disposition
                        .and_then(|d| d.get_filename())
                        .map(|f| f.to_string()),
                )
            };

            let mut data = Vec::new();
            while let Some(chunk) = field.try_next().await? {
                data.extend_from_slice(&chunk);
            }

            match file_name {
                Some(original) if name == "image" => {
                    // an untouched file input submits an empty filename
                    if original.is_empty() {
                        continue;
                    }
                    stored_files.push(uploads.store(&original, &data)?);
                }
                _ => {
                    fields.insert(name, String::from_utf8_lossy(&data).into_owned());
                }
            }
        }
        Ok(())
    }
    .await;

    if let Err(e) = collected {
        remove_all(&uploads, &stored_files);
        return Err(e);
    }

    let new = match NewListing::from_form(&fields) {
        Ok(new) => new,
        Err(e) => {
            remove_all(&uploads, &stored_files);
            return Err(e);
        }
    };

    if stored_files.is_empty() {
        return Err(AppError::ValidationError(
            "at least one image is required".to_string(),
        ));
    }

    match inventory.create(new, &stored_files).await {
        Ok(_) => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/admin"))
            .finish()),
        Err(e) => {
            remove_all(&uploads, &stored_files);
            Err(e)
        }
    }
}

/// Cascade delete: listing row, image rows, and the files on disk.
#[post("/admin/car/{id}/delete")]
pub async fn delete_listing(
    session: Session,
    path: web::Path<i64>,
    inventory: web::Data<InventoryService>,
    uploads: web::Data<UploadService>,
) -> AppResult<HttpResponse> {
    require_admin(&session)?;

    let filenames = inventory.delete(path.into_inner()).await?;
    remove_all(&uploads, &filenames);

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/admin"))
        .finish())
}

#[get("/admin/inquiries")]
pub async fn list_inquiries(
    session: Session,
    inquiries: web::Data<InquiryService>,
) -> AppResult<HttpResponse> {
    require_admin(&session)?;
    let all = inquiries.list_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(all)))
}

fn remove_all(uploads: &UploadService, filenames: &[String]) {
    for filename in filenames {
        uploads.remove(filename);
    }
}
