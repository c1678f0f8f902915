//! Disputes: a party flags an order for admin review; resolution either
//! upholds the order or cancels it.

pub mod models;
pub mod repository;

pub use models::{Dispute, DisputeStatus};
pub use repository::DisputeRepository;
