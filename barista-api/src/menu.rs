use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use barista_menu::{HappyHourStatus, MenuBeverage, MenuResponse};
use chrono::Local;
use serde_json::json;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/menu", get(get_menu))
        .route("/api/beverages/{id}", get(get_beverage))
}

/// GET /health
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "barista-api" }))
}

/// GET /api/menu
/// Full catalog plus the current happy-hour block
async fn get_menu(State(state): State<AppState>) -> Json<MenuResponse> {
    let beverages = state
        .registry
        .entries()
        .into_iter()
        .map(|spec| MenuBeverage {
            id: spec.id,
            name: spec.name.clone(),
            base_price: spec.base_price,
            category: spec.category,
            available: spec.available,
        })
        .collect();

    let window = &state.pricing.happy_hour;
    Json(MenuResponse {
        beverages,
        happy_hour: HappyHourStatus {
            active: window.contains(Local::now().time()),
            discount_percentage: window.discount_percentage,
            start_time: window.start,
            end_time: window.end,
        },
    })
}

/// GET /api/beverages/{id}
async fn get_beverage(
    State(state): State<AppState>,
    Path(beverage_id): Path<u32>,
) -> Result<Json<MenuBeverage>, AppError> {
    let spec = state.registry.get_by_id(beverage_id).ok_or_else(|| {
        AppError::NotFoundError(format!("Beverage with id {} not found", beverage_id))
    })?;

    Ok(Json(MenuBeverage {
        id: spec.id,
        name: spec.name.clone(),
        base_price: spec.base_price,
        category: spec.category,
        available: spec.available,
    }))
}
