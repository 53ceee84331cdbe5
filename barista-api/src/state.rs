use crate::app_config::ReportsConfig;
use barista_catalog::{BeverageRegistry, PricingRules};
use barista_menu::{MenuError, PriceSource};
use barista_order::OrderService;
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<BeverageRegistry>,
    pub service: OrderService,
    pub price_source: Arc<dyn PriceSource>,
    pub pricing: PricingRules,
    pub reports: ReportsConfig,
}

/// Price source backed by the in-process registry; used when no external
/// menu API is configured.
pub struct RegistryPriceSource {
    registry: Arc<BeverageRegistry>,
}

impl RegistryPriceSource {
    pub fn new(registry: Arc<BeverageRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait::async_trait]
impl PriceSource for RegistryPriceSource {
    async fn fetch_price(&self, beverage_id: u32) -> Result<Decimal, MenuError> {
        self.registry
            .get_by_id(beverage_id)
            .map(|spec| spec.base_price)
            .ok_or(MenuError::PriceUnavailable(beverage_id))
    }
}
