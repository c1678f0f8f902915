//! Order message threads between client and student.

pub mod models;
pub mod repository;

pub use models::Message;
pub use repository::MessageRepository;
