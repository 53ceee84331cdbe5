use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Beverage categories in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeverageCategory {
    Coffee,
    Tea,
    Beer,
    Other,
}

/// Concrete drinks the café serves
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeverageKind {
    Espresso,
    Coffee,
    Cappuccino,
    Latte,
    Tea,
    Beer,
    Wine,
    CocaCola,
    Juice,
    Water,
}

impl BeverageKind {
    pub const ALL: [BeverageKind; 10] = [
        BeverageKind::Espresso,
        BeverageKind::Coffee,
        BeverageKind::Cappuccino,
        BeverageKind::Latte,
        BeverageKind::Tea,
        BeverageKind::Beer,
        BeverageKind::Wine,
        BeverageKind::CocaCola,
        BeverageKind::Juice,
        BeverageKind::Water,
    ];

    pub fn category(&self) -> BeverageCategory {
        match self {
            BeverageKind::Espresso
            | BeverageKind::Coffee
            | BeverageKind::Cappuccino
            | BeverageKind::Latte => BeverageCategory::Coffee,
            BeverageKind::Tea => BeverageCategory::Tea,
            BeverageKind::Beer | BeverageKind::Wine => BeverageCategory::Beer,
            BeverageKind::CocaCola | BeverageKind::Juice | BeverageKind::Water => {
                BeverageCategory::Other
            }
        }
    }
}

/// Immutable beverage value; constructed only by the registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Beverage {
    pub name: String,
    pub base_price: Decimal,
    pub category: BeverageCategory,
}
