pub mod beverage;
pub mod pricing;
pub mod registry;

pub use beverage::{Beverage, BeverageCategory, BeverageKind};
pub use pricing::{BulkRule, HappyHourWindow, PricingError, PricingRules, PricingStrategy};
pub use registry::{BeverageRegistry, BeverageSpec, CatalogError};
