use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("upload rejected: {0}")]
    UploadRejected(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("listing not found: {0}")]
    ListingNotFound(i64),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("multipart error: {0}")]
    MultipartError(#[from] actix_multipart::MultipartError),

    #[error("internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        // The session gate answers with a redirect rather than a JSON body,
        // so the browser lands on the login page.
        if let AppError::NotLoggedIn = self {
            return HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish();
        }

        let (status_code, error_type) = match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::UploadRejected(_) => (StatusCode::BAD_REQUEST, "upload_rejected"),
            AppError::NotLoggedIn => (StatusCode::UNAUTHORIZED, "not_logged_in"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::ListingNotFound(_) => (StatusCode::NOT_FOUND, "listing_not_found"),
            AppError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
            AppError::IoError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            AppError::ReqwestError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "request_error"),
            AppError::MultipartError(_) => (StatusCode::BAD_REQUEST, "multipart_error"),
            AppError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        HttpResponse::build(status_code).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        })
    }
}
