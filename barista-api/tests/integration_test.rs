use std::sync::Arc;
use std::time::Duration;

use barista_api::app_config::ReportsConfig;
use barista_api::state::RegistryPriceSource;
use barista_api::{app, AppState};
use barista_catalog::{BeverageRegistry, PricingRules};
use barista_menu::{MenuClient, MenuError, PriceSource};
use barista_order::{OrderService, OrderSnapshot, StageDelays};
use barista_shared::OrderStatus;
use rust_decimal_macros::dec;

async fn spawn_server() -> String {
    let registry = Arc::new(BeverageRegistry::standard());
    let service = OrderService::new(StageDelays {
        accept: Duration::from_millis(10),
        prepare: Duration::from_millis(20),
        pickup: Duration::from_millis(10),
    });
    let state = AppState {
        registry: Arc::clone(&registry),
        service,
        price_source: Arc::new(RegistryPriceSource::new(registry)),
        pricing: PricingRules::default(),
        reports: ReportsConfig::default(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_menu_client_round_trip() {
    let base_url = spawn_server().await;
    let client = MenuClient::new(base_url.as_str()).unwrap();

    assert!(client.health_check().await);

    let menu = client.fetch_menu().await.unwrap();
    assert_eq!(menu.beverages.len(), 10);
    let coffee = menu
        .beverages
        .iter()
        .find(|beverage| beverage.name == "Coffee")
        .unwrap();
    assert_eq!(coffee.base_price, dec!(2.50));

    let espresso = client.fetch_beverage(1).await.unwrap();
    assert_eq!(espresso.name, "Espresso");
    assert_eq!(espresso.base_price, dec!(2.00));

    assert!(matches!(
        client.fetch_beverage(99).await,
        Err(MenuError::PriceUnavailable(99))
    ));

    // The same client doubles as the core's price source
    assert_eq!(client.fetch_price(6).await.unwrap(), dec!(3.50));
}

#[tokio::test]
async fn test_order_lifecycle_over_http() {
    let base_url = spawn_server().await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("{}/api/orders", base_url))
        .json(&serde_json::json!({
            "beverage": "BEER",
            "quantity": 5,
            "strategy": "BULK_DISCOUNT"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let created: OrderSnapshot = response.json().await.unwrap();
    // 3.50 * 5 at 10% bulk discount
    assert_eq!(created.total_price, dec!(15.75));
    assert_eq!(created.status, OrderStatus::Pending);

    // Poll until the advancement tasks complete the order
    let order_url = format!("{}/api/orders/{}", base_url, created.id);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let snapshot: OrderSnapshot = http.get(&order_url).send().await.unwrap().json().await.unwrap();
        if snapshot.status == OrderStatus::Completed {
            assert!(snapshot.completed_at.is_some());
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "order never completed, last status {:?}",
            snapshot.status
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let listed: Vec<OrderSnapshot> = http
        .get(format!("{}/api/orders", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);

    // Completed orders cannot be cancelled
    let cancel = http.delete(&order_url).send().await.unwrap();
    assert_eq!(cancel.status(), reqwest::StatusCode::CONFLICT);

    let csv = http
        .get(format!("{}/api/reports/orders.csv", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(csv.headers()["content-type"], "text/csv");
    let body = csv.text().await.unwrap();
    assert!(body.contains("Beer,5,3.50,15.75,COMPLETED"));
    assert!(body.contains("TOTAL,,1,,15.75"));

    let pdf = http
        .get(format!("{}/api/reports/orders.pdf", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(pdf.headers()["content-type"], "application/pdf");
    assert!(pdf.bytes().await.unwrap().starts_with(b"%PDF-1.4"));
}

#[tokio::test]
async fn test_submission_validation_and_lookup_errors() {
    let base_url = spawn_server().await;
    let http = reqwest::Client::new();

    let bad_quantity = http
        .post(format!("{}/api/orders", base_url))
        .json(&serde_json::json!({ "beverage": "COFFEE", "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_quantity.status(), reqwest::StatusCode::BAD_REQUEST);

    let missing = uuid::Uuid::new_v4();
    let not_found = http
        .get(format!("{}/api/orders/{}", base_url, missing))
        .send()
        .await
        .unwrap();
    assert_eq!(not_found.status(), reqwest::StatusCode::NOT_FOUND);

    let cancel_missing = http
        .delete(format!("{}/api/orders/{}", base_url, missing))
        .send()
        .await
        .unwrap();
    assert_eq!(cancel_missing.status(), reqwest::StatusCode::NOT_FOUND);

    let unknown_beverage = http
        .get(format!("{}/api/beverages/99", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown_beverage.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_event_stream_is_exposed() {
    let base_url = spawn_server().await;
    let http = reqwest::Client::new();

    let response = http
        .get(format!("{}/api/orders/events", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));
}
