use std::net::SocketAddr;
use std::sync::Arc;

use barista_api::state::RegistryPriceSource;
use barista_api::{app, app_config::Config, AppState};
use barista_catalog::BeverageRegistry;
use barista_menu::{CachedPriceSource, MenuClient, PriceSource};
use barista_order::OrderService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "barista_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Barista API on port {}", config.server.port);

    let registry = Arc::new(BeverageRegistry::standard());
    assert!(!registry.is_empty(), "beverage registry must not be empty");

    // Live prices from an external menu API when configured, with the
    // registry prices as fallback; otherwise the registry alone.
    let price_source: Arc<dyn PriceSource> = match &config.menu.base_url {
        Some(base_url) => {
            let client = MenuClient::with_timeout(base_url.clone(), config.menu.timeout())
                .expect("Failed to build menu client");
            if client.health_check().await {
                tracing::info!(%base_url, "menu API reachable");
            } else {
                tracing::warn!(%base_url, "menu API unreachable, relying on fallback prices");
            }
            let fallback = registry
                .entries()
                .into_iter()
                .map(|spec| (spec.id, spec.base_price))
                .collect();
            Arc::new(CachedPriceSource::new(client, fallback))
        }
        None => Arc::new(RegistryPriceSource::new(Arc::clone(&registry))),
    };

    let service = OrderService::new(config.processing.delays());

    let app_state = AppState {
        registry,
        service,
        price_source,
        pricing: config.pricing.clone(),
        reports: config.reports.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
