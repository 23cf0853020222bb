use crate::controllers;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public catalog
        .service(controllers::index) //              GET  /
        .service(controllers::detail) //             GET  /car/{id}
        .service(controllers::submit_inquiry) //     POST /car/{id}/contact
        // Session auth
        .service(controllers::login_page) //         GET  /login
        .service(controllers::login) //              POST /login
        .service(controllers::logout) //             GET  /logout
        // Admin (session gated)
        .service(controllers::admin_page) //         GET  /admin
        .service(controllers::create_listing) //     POST /admin
        .service(controllers::delete_listing) //     POST /admin/car/{id}/delete
        .service(controllers::list_inquiries) //     GET  /admin/inquiries
        // Ops
        .service(controllers::health_check); //      GET  /health
}
