//! Escrow payments: one per order, settled exactly once.

pub mod models;
pub mod repository;

pub use models::{Payment, PaymentStatus};
pub use repository::PaymentRepository;
