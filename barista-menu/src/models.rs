use barista_catalog::BeverageCategory;
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One menu entry as served by `GET /api/menu`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuBeverage {
    pub id: u32,
    pub name: String,
    pub base_price: Decimal,
    pub category: BeverageCategory,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Happy-hour block of the menu payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HappyHourStatus {
    pub active: bool,
    pub discount_percentage: Decimal,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Full menu payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuResponse {
    pub beverages: Vec<MenuBeverage>,
    pub happy_hour: HappyHourStatus,
}
