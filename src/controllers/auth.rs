use actix_session::Session;
use actix_web::http::header;
use actix_web::{get, post, web, HttpResponse};
use serde_json::json;

use crate::models::user::LoginForm;
use crate::models::ApiResponse;
use crate::services::AuthService;
use crate::utils::error::{AppError, AppResult};
use crate::utils::session::{is_logged_in, ADMIN_FLAG};

/// Login page data: whether a session is already active.
#[get("/login")]
pub async fn login_page(session: Session) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({
        "logged_in": is_logged_in(&session)
    }))))
}

/// Credential check; success sets the session flag and lands on /admin.
#[post("/login")]
pub async fn login(
    session: Session,
    form: web::Form<LoginForm>,
    auth: web::Data<AuthService>,
) -> AppResult<HttpResponse> {
    let user = auth.verify(&form.username, &form.password).await?;

    session
        .insert(ADMIN_FLAG, true)
        .map_err(|e| AppError::InternalError(format!("failed to write session: {e}")))?;
    log::info!("'{}' logged in", user.username);

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/admin"))
        .finish())
}

#[get("/logout")]
pub async fn logout(session: Session) -> AppResult<HttpResponse> {
    session.purge();
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/login"))
        .finish())
}
