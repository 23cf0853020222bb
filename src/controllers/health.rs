use actix_web::{get, HttpResponse, Responder};

/// Liveness probe for external monitors.
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}
