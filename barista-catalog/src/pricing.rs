use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pricing strategy applied to a single order at creation time.
///
/// Strategies are pure: the price is a function of the base price, the
/// quantity and the strategy parameters. Activation policy (happy-hour
/// window checks, bulk thresholds) belongs to the caller, never to the
/// strategy itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingStrategy {
    Standard,
    HappyHour {
        discount_percentage: Decimal,
    },
    BulkDiscount {
        min_quantity: u32,
        discount_percentage: Decimal,
    },
}

impl PricingStrategy {
    pub fn standard() -> Self {
        PricingStrategy::Standard
    }

    /// Happy-hour strategy discounting the unit price
    pub fn happy_hour(discount_percentage: Decimal) -> Result<Self, PricingError> {
        validate_percentage(discount_percentage)?;
        Ok(PricingStrategy::HappyHour {
            discount_percentage,
        })
    }

    /// Bulk strategy discounting the total once `min_quantity` is reached.
    ///
    /// The discount is bounded by `100 / min_quantity` so the discounted
    /// total at the threshold never undercuts the undiscounted total one
    /// unit below it; price stays monotone in quantity.
    pub fn bulk_discount(
        min_quantity: u32,
        discount_percentage: Decimal,
    ) -> Result<Self, PricingError> {
        if min_quantity < 1 {
            return Err(PricingError::InvalidParameter(
                "bulk min_quantity must be at least 1".to_string(),
            ));
        }
        validate_percentage(discount_percentage)?;
        if Decimal::from(min_quantity) * discount_percentage > Decimal::ONE_HUNDRED {
            return Err(PricingError::InvalidParameter(format!(
                "bulk discount of {}% at threshold {} would price {} units below {}",
                discount_percentage,
                min_quantity,
                min_quantity,
                min_quantity - 1
            )));
        }
        Ok(PricingStrategy::BulkDiscount {
            min_quantity,
            discount_percentage,
        })
    }

    /// Calculate the total price for `quantity` units at `base_price` each.
    ///
    /// Pure and thread-safe; result is always non-negative for valid input.
    pub fn calculate_price(
        &self,
        base_price: Decimal,
        quantity: u32,
    ) -> Result<Decimal, PricingError> {
        if base_price < Decimal::ZERO {
            return Err(PricingError::InvalidParameter(format!(
                "base_price must be non-negative, got {}",
                base_price
            )));
        }
        if quantity < 1 {
            return Err(PricingError::InvalidParameter(
                "quantity must be at least 1".to_string(),
            ));
        }

        let qty = Decimal::from(quantity);
        let total = match self {
            PricingStrategy::Standard => base_price * qty,
            PricingStrategy::HappyHour {
                discount_percentage,
            } => {
                let unit = base_price - base_price * discount_percentage / Decimal::ONE_HUNDRED;
                unit * qty
            }
            PricingStrategy::BulkDiscount {
                min_quantity,
                discount_percentage,
            } => {
                let gross = base_price * qty;
                if quantity >= *min_quantity {
                    gross - gross * discount_percentage / Decimal::ONE_HUNDRED
                } else {
                    gross
                }
            }
        };
        Ok(total)
    }

    /// Unit price for a single item under this strategy
    pub fn unit_price(&self, base_price: Decimal) -> Result<Decimal, PricingError> {
        self.calculate_price(base_price, 1)
    }
}

fn validate_percentage(pct: Decimal) -> Result<(), PricingError> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidParameter(format!(
            "discount percentage must be within [0, 100], got {}",
            pct
        )));
    }
    Ok(())
}

/// Configured happy-hour window; the window check lives here, not in the strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HappyHourWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub discount_percentage: Decimal,
}

impl HappyHourWindow {
    pub fn contains(&self, at: NaiveTime) -> bool {
        self.start <= at && at < self.end
    }
}

impl Default for HappyHourWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            discount_percentage: Decimal::from(20),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRule {
    pub min_quantity: u32,
    pub discount_percentage: Decimal,
}

impl Default for BulkRule {
    fn default() -> Self {
        Self {
            min_quantity: 5,
            discount_percentage: Decimal::from(10),
        }
    }
}

/// Configurable pricing defaults (happy hour 16:00–18:00 @20%, bulk 5 @10%)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingRules {
    #[serde(default)]
    pub happy_hour: HappyHourWindow,
    #[serde(default)]
    pub bulk: BulkRule,
}

impl PricingRules {
    /// Deterministic strategy selection for an order placed at `at` local time.
    ///
    /// Happy hour wins over bulk when both apply; the clock is an explicit
    /// argument so selection stays side-effect-free.
    pub fn choose_strategy(
        &self,
        quantity: u32,
        at: NaiveTime,
    ) -> Result<PricingStrategy, PricingError> {
        if self.happy_hour.contains(at) {
            PricingStrategy::happy_hour(self.happy_hour.discount_percentage)
        } else if quantity >= self.bulk.min_quantity {
            PricingStrategy::bulk_discount(self.bulk.min_quantity, self.bulk.discount_percentage)
        } else {
            Ok(PricingStrategy::standard())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid pricing parameter: {0}")]
    InvalidParameter(String),
}
