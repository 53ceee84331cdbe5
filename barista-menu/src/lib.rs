pub mod client;
pub mod models;

pub use client::{CachedPriceSource, MenuClient, MenuError, PriceSource};
pub use models::{HappyHourStatus, MenuBeverage, MenuResponse};
