//! Reviews: one per completed order, editable within a bounded window.

pub mod models;
pub mod repository;

pub use models::Review;
pub use repository::ReviewRepository;
