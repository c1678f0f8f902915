//! Service listings offered by students.

pub mod models;
pub mod repository;

pub use models::{Service, ServiceStatus};
pub use repository::ServiceRepository;
