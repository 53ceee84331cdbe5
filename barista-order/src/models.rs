use barista_catalog::{Beverage, PricingError, PricingStrategy};
use barista_shared::OrderStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A single placed order.
///
/// Prices are computed once at creation and never change afterwards; status
/// is the only mutable field and moves strictly forward.
#[derive(Debug)]
pub struct Order {
    id: Uuid,
    beverage: Arc<Beverage>,
    quantity: u32,
    unit_price: Decimal,
    total_price: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a Pending order, pricing it with the given strategy
    pub fn create(
        beverage: Arc<Beverage>,
        quantity: u32,
        strategy: PricingStrategy,
    ) -> Result<Self, OrderError> {
        if quantity < 1 {
            return Err(OrderError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }

        let unit_price = strategy.unit_price(beverage.base_price)?;
        let total_price = strategy.calculate_price(beverage.base_price, quantity)?;

        Ok(Self {
            id: Uuid::new_v4(),
            beverage,
            quantity,
            unit_price,
            total_price,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn beverage(&self) -> &Beverage {
        &self.beverage
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Move to the next lifecycle stage.
    ///
    /// Pending -> Processing -> Ready -> Completed, no skipping, no rollback.
    pub fn advance(&mut self) -> Result<OrderStatus, OrderError> {
        let next = match self.status {
            OrderStatus::Pending => OrderStatus::Processing,
            OrderStatus::Processing => OrderStatus::Ready,
            OrderStatus::Ready => OrderStatus::Completed,
            terminal @ (OrderStatus::Completed | OrderStatus::Cancelled) => {
                return Err(OrderError::InvalidTransition {
                    from: terminal.to_string(),
                    to: "next stage".to_string(),
                });
            }
        };

        self.status = next;
        if next == OrderStatus::Completed {
            self.completed_at = Some(Utc::now());
        }
        Ok(next)
    }

    /// Cancel the order; only allowed before it is Ready
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        match self.status {
            OrderStatus::Pending | OrderStatus::Processing => {
                self.status = OrderStatus::Cancelled;
                Ok(())
            }
            other => Err(OrderError::InvalidTransition {
                from: other.to_string(),
                to: OrderStatus::Cancelled.to_string(),
            }),
        }
    }

    /// Immutable copy safe to hand across thread boundaries
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            id: self.id,
            beverage_name: self.beverage.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price: self.total_price,
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }
}

/// Read-only view of an order handed to the GUI and exporters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    pub id: Uuid,
    pub beverage_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid order request: {0}")]
    Validation(String),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl From<PricingError> for OrderError {
    fn from(err: PricingError) -> Self {
        OrderError::Validation(err.to_string())
    }
}
