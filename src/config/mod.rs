use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: String,
    pub session_secret: Option<String>,
    pub admin_username: String,
    pub admin_password: String,
    pub exchange_api_url: String,
    pub exchange_fallback_rate: f64,
    /// Cron expression for the weekly cache reset, 7-field with seconds.
    pub rate_reset_cron: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:carlot.db".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            upload_dir: "static/uploads".to_string(),
            session_secret: None,
            admin_username: "admin".to_string(),
            admin_password: "change-me".to_string(),
            exchange_api_url: "https://api.exchangerate.host/latest?base=USD&symbols=NGN"
                .to_string(),
            exchange_fallback_rate: 1500.0,
            // Thursday midnight UTC, matching the dealership's restock day
            rate_reset_cron: "0 0 0 * * Thu *".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        Self {
            database_url: env_or("DATABASE_URL", &defaults.database_url),
            host: env_or("HOST", &defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            upload_dir: env_or("UPLOAD_DIR", &defaults.upload_dir),
            session_secret: std::env::var("SESSION_SECRET").ok().filter(|s| !s.is_empty()),
            admin_username: env_or("ADMIN_USERNAME", &defaults.admin_username),
            admin_password: env_or("ADMIN_PASSWORD", &defaults.admin_password),
            exchange_api_url: env_or("EXCHANGE_API_URL", &defaults.exchange_api_url),
            exchange_fallback_rate: std::env::var("EXCHANGE_FALLBACK_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.exchange_fallback_rate),
            rate_reset_cron: env_or("RATE_RESET_CRON", &defaults.rate_reset_cron),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
