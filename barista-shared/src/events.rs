use crate::status::OrderStatus;
use uuid::Uuid;

/// Published on every order status transition; consumed by the GUI/SSE boundary.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderStatusEvent {
    pub order_id: Uuid,
    pub beverage_name: String,
    pub status: OrderStatus,
    pub timestamp: i64,
}

impl OrderStatusEvent {
    pub fn new(order_id: Uuid, beverage_name: String, status: OrderStatus) -> Self {
        Self {
            order_id,
            beverage_name,
            status,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
