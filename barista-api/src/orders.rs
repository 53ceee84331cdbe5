use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use barista_catalog::{Beverage, BeverageKind, PricingRules, PricingStrategy};
use barista_order::OrderSnapshot;
use barista_shared::OrderStatus;
use chrono::Local;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(submit_order).get(list_orders))
        .route("/api/orders/events", get(order_events))
        .route("/api/orders/{id}", get(get_order).delete(cancel_order))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    pub beverage: BeverageKind,
    pub quantity: u32,
    /// Explicit strategy override; omitted means the configured selection
    /// policy decides (happy-hour window, then bulk threshold, then standard)
    #[serde(default)]
    pub strategy: Option<StrategyChoice>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyChoice {
    Standard,
    HappyHour,
    BulkDiscount,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub status: Option<OrderStatus>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/orders
/// Validate, price and register an order; advancement runs asynchronously
async fn submit_order(
    State(state): State<AppState>,
    Json(req): Json<SubmitOrderRequest>,
) -> Result<(StatusCode, Json<OrderSnapshot>), AppError> {
    let spec = state
        .registry
        .get(req.beverage)
        .ok_or_else(|| AppError::NotFoundError(format!("Unknown beverage: {:?}", req.beverage)))?
        .clone();

    // Live price lookup through the configured source; a missing price is a
    // submission failure, never a silently unpriced order.
    let base_price = state.price_source.fetch_price(spec.id).await?;
    let beverage = Beverage {
        name: spec.name,
        base_price,
        category: spec.category,
    };

    let strategy = resolve_strategy(&state.pricing, req.strategy, req.quantity)?;
    let id = state.service.submit(beverage, req.quantity, strategy).await?;
    let snapshot = state.service.get_order(id).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

fn resolve_strategy(
    rules: &PricingRules,
    choice: Option<StrategyChoice>,
    quantity: u32,
) -> Result<PricingStrategy, AppError> {
    let strategy = match choice {
        Some(StrategyChoice::Standard) => PricingStrategy::standard(),
        Some(StrategyChoice::HappyHour) => {
            PricingStrategy::happy_hour(rules.happy_hour.discount_percentage)?
        }
        Some(StrategyChoice::BulkDiscount) => {
            PricingStrategy::bulk_discount(rules.bulk.min_quantity, rules.bulk.discount_percentage)?
        }
        None => rules.choose_strategy(quantity, Local::now().time())?,
    };
    Ok(strategy)
}

/// GET /api/orders?status=COMPLETED
/// Snapshots in creation order
async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListOrdersParams>,
) -> Json<Vec<OrderSnapshot>> {
    let orders = match params.status {
        Some(status) => state.service.orders_by_status(status).await,
        None => state.service.list_orders().await,
    };
    Json(orders)
}

/// GET /api/orders/{id}
async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderSnapshot>, AppError> {
    Ok(Json(state.service.get_order(order_id).await?))
}

/// DELETE /api/orders/{id}
/// Cancel an order still in Pending/Processing
async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.service.cancel(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/orders/events
/// Status-change feed for the GUI, bridged from the service's broadcast
/// channel; the GUI never touches core state directly.
async fn order_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.service.subscribe()).filter_map(|result| async move {
        // Lagged receivers just skip missed events
        let status_event = result.ok()?;
        let event = Event::default()
            .event("order_status")
            .json_data(&status_event)
            .ok()?;
        Some(Ok(event))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
