pub mod models;
pub mod service;

pub use models::{Order, OrderError, OrderSnapshot};
pub use service::{OrderService, StageDelays};
