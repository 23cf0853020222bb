use actix_cors::Cors;
use actix_files::Files;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

mod config;
mod controllers;
mod models;
mod routes;
mod services;
mod utils;

use config::AppConfig;
use services::exchange;
use services::{AuthService, ExchangeRateService, InquiryService, InventoryService, UploadService};
use utils::session::session_key;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();

    log::info!("Connecting to database: {}", config.database_url);

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
        .expect("Failed to create database connection pool");

    std::fs::create_dir_all(&config.upload_dir)?;

    let inventory = InventoryService::new(pool.clone());
    let uploads = UploadService::new(&config.upload_dir);
    let auth = AuthService::new(pool.clone());
    let inquiries = InquiryService::new(pool);
    let exchange_rates = ExchangeRateService::new(
        config.exchange_api_url.clone(),
        config.exchange_fallback_rate,
    )
    .expect("Failed to build exchange rate service");

    inventory
        .init_tables()
        .await
        .expect("Failed to initialize listings tables");
    inquiries
        .init_tables()
        .await
        .expect("Failed to initialize inquiries table");
    auth.init_tables()
        .await
        .expect("Failed to initialize admin_users table");
    auth.ensure_admin(&config.admin_username, &config.admin_password)
        .await
        .expect("Failed to seed admin account");
    log::info!("Database initialized successfully");

    exchange::spawn_scheduled_reset(exchange_rates.clone(), &config.rate_reset_cron)
        .expect("Failed to start the rate reset job");

    let session_signing_key = session_key(config.session_secret.as_deref());
    let host = config.host.clone();
    let port = config.port;
    let upload_dir = config.upload_dir.clone();

    log::info!("Starting server at http://{}:{}", host, port);

    // The exchange-rate cache is shared across workers, so all services are
    // built once and handed to each worker as Data clones.
    let inventory = web::Data::new(inventory);
    let uploads = web::Data::new(uploads);
    let auth = web::Data::new(auth);
    let inquiries = web::Data::new(inquiries);
    let exchange_rates = web::Data::new(exchange_rates);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(inventory.clone())
            .app_data(uploads.clone())
            .app_data(auth.clone())
            .app_data(inquiries.clone())
            .app_data(exchange_rates.clone())
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .wrap(
                SessionMiddleware::builder(
                    CookieSessionStore::default(),
                    session_signing_key.clone(),
                )
                .cookie_secure(false)
                .build(),
            )
            .configure(routes::configure)
            .service(Files::new("/uploads", upload_dir.clone()))
    })
    .bind((host, port))?
    .run()
    .await
}
