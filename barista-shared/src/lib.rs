pub mod events;
pub mod status;

pub use events::OrderStatusEvent;
pub use status::OrderStatus;
