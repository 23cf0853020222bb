use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use cron::Schedule;
use tokio::sync::Mutex;

use crate::utils::error::{AppError, AppResult};

const CACHE_TTL: i64 = 3600; // seconds
const FETCH_TIMEOUT: StdDuration = StdDuration::from_secs(10);

#[derive(Debug, Clone, Copy)]
struct RateSnapshot {
    rate: f64,
    fetched_at: DateTime<Utc>,
}

/// Hourly-cached USD to NGN conversion rate.
///
/// The single mutex also dedups concurrent refreshes: the first request
/// through the stale window fetches while the others wait on the lock and
/// then read the fresh value.
#[derive(Clone)]
pub struct ExchangeRateService {
    client: reqwest::Client,
    endpoint: String,
    fallback_rate: f64,
    cache: Arc<Mutex<Option<RateSnapshot>>>,
}

impl ExchangeRateService {
    pub fn new(endpoint: String, fallback_rate: f64) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::InternalError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            fallback_rate,
            cache: Arc::new(Mutex::new(None)),
        })
    }

    /// Returns the cached rate while it is younger than an hour, otherwise
    /// performs one fetch. A failed fetch substitutes the fallback rate and
    /// still freshens the timestamp, so the fallback sticks for the next
    /// hour as well.
    pub async fn get_rate(&self) -> f64 {
        let mut cache = self.cache.lock().await;

        if let Some(snapshot) = cache.as_ref() {
            if Utc::now() - snapshot.fetched_at < Duration::seconds(CACHE_TTL) {
                return snapshot.rate;
            }
        }

        let rate = match self.fetch().await {
            Ok(rate) => {
                log::info!("refreshed USD/NGN rate: {rate}");
                rate
            }
            Err(e) => {
                log::warn!(
                    "exchange rate fetch failed, using fallback {}: {e}",
                    self.fallback_rate
                );
                self.fallback_rate
            }
        };

        *cache = Some(RateSnapshot {
            rate,
            fetched_at: Utc::now(),
        });

        rate
    }

    /// Clears the cache; the next `get_rate` call fetches again.
    pub async fn reset(&self) {
        *self.cache.lock().await = None;
        log::info!("exchange rate cache cleared");
    }

    async fn fetch(&self) -> AppResult<f64> {
        let body: serde_json::Value = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        body.get("rates")
            .and_then(|rates| rates.get("NGN"))
            .and_then(|rate| rate.as_f64())
            .ok_or_else(|| {
                AppError::InternalError("exchange response missing rates.NGN".to_string())
            })
    }
}

/// Background job clearing the cache on the configured cron schedule, so the
/// first request afterwards refetches even if the fallback got stuck.
pub fn spawn_scheduled_reset(service: ExchangeRateService, cron_expr: &str) -> AppResult<()> {
    let schedule = Schedule::from_str(cron_expr)
        .map_err(|e| AppError::ConfigError(format!("invalid RATE_RESET_CRON '{cron_expr}': {e}")))?;

    tokio::spawn(async move {
        loop {
            let next = match schedule.upcoming(Utc).next() {
                Some(next) => next,
                None => {
                    log::warn!("rate reset schedule has no upcoming runs, job exiting");
                    return;
                }
            };

            let wait = (next - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;
            service.reset().await;
            log::info!("scheduled exchange rate reset fired");
        }
    });

    Ok(())
}
