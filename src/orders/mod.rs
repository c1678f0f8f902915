//! Order lifecycle: state machine, repository and transition engine.

pub mod lifecycle;
pub mod models;
pub mod repository;
pub mod status;

pub use lifecycle::OrderLifecycle;
pub use models::{Order, PlaceOrderRequest};
pub use repository::OrderRepository;
pub use status::OrderStatus;
