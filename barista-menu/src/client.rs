use crate::models::{MenuBeverage, MenuResponse};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// The only pricing seam the core depends on; transport is this crate's concern
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self, beverage_id: u32) -> Result<Decimal, MenuError>;
}

/// HTTP client for the menu REST API
pub struct MenuClient {
    http: reqwest::Client,
    base_url: String,
}

impl MenuClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, MenuError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MenuError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch the complete menu
    pub async fn fetch_menu(&self) -> Result<MenuResponse, MenuError> {
        let url = format!("{}/api/menu", self.base_url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        response
            .json::<MenuResponse>()
            .await
            .map_err(|err| MenuError::Decode(err.to_string()))
    }

    /// Fetch a single menu entry by id
    pub async fn fetch_beverage(&self, beverage_id: u32) -> Result<MenuBeverage, MenuError> {
        let url = format!("{}/api/beverages/{}", self.base_url, beverage_id);
        let response = self.http.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MenuError::PriceUnavailable(beverage_id));
        }
        let response = response.error_for_status()?;
        response
            .json::<MenuBeverage>()
            .await
            .map_err(|err| MenuError::Decode(err.to_string()))
    }

    /// Only available beverages from the menu
    pub async fn available_beverages(&self) -> Result<Vec<MenuBeverage>, MenuError> {
        let menu = self.fetch_menu().await?;
        Ok(menu
            .beverages
            .into_iter()
            .filter(|beverage| beverage.available)
            .collect())
    }

    /// Whether the menu currently advertises an active happy hour
    pub async fn is_happy_hour(&self) -> Result<bool, MenuError> {
        Ok(self.fetch_menu().await?.happy_hour.active)
    }

    /// Liveness probe against `GET /health`
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!(error = %err, "menu API health check failed");
                false
            }
        }
    }
}

#[async_trait]
impl PriceSource for MenuClient {
    async fn fetch_price(&self, beverage_id: u32) -> Result<Decimal, MenuError> {
        Ok(self.fetch_beverage(beverage_id).await?.base_price)
    }
}

/// Price source with last-known-price fallback.
///
/// A fetch failure falls back to the most recently seen price, then to the
/// seeded registry price; only when neither exists does submission fail.
pub struct CachedPriceSource<S: PriceSource> {
    source: S,
    fallback: HashMap<u32, Decimal>,
    cache: Mutex<HashMap<u32, Decimal>>,
}

impl<S: PriceSource> CachedPriceSource<S> {
    pub fn new(source: S, fallback: HashMap<u32, Decimal>) -> Self {
        Self {
            source,
            fallback,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<S: PriceSource> PriceSource for CachedPriceSource<S> {
    async fn fetch_price(&self, beverage_id: u32) -> Result<Decimal, MenuError> {
        match self.source.fetch_price(beverage_id).await {
            Ok(price) => {
                self.cache
                    .lock()
                    .expect("price cache lock poisoned")
                    .insert(beverage_id, price);
                Ok(price)
            }
            Err(err) => {
                let cached = self
                    .cache
                    .lock()
                    .expect("price cache lock poisoned")
                    .get(&beverage_id)
                    .copied();
                if let Some(price) = cached.or_else(|| self.fallback.get(&beverage_id).copied()) {
                    tracing::warn!(
                        beverage_id,
                        error = %err,
                        fallback_price = %price,
                        "live price fetch failed, using fallback"
                    );
                    Ok(price)
                } else {
                    tracing::error!(beverage_id, error = %err, "no price available");
                    Err(MenuError::PriceUnavailable(beverage_id))
                }
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("Price unavailable for beverage {0}")]
    PriceUnavailable(u32),

    #[error("Menu request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Menu payload could not be decoded: {0}")]
    Decode(String),
}
