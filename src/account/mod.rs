//! Account management module
//!
//! PostgreSQL-based storage for users and student profiles.

pub mod models;
pub mod repository;

// Re-export commonly used types
pub use models::{Role, StudentProfile, User, UserStatus};
pub use repository::{StudentProfileRepository, UserRepository};

// Re-export Database from top-level db module
pub use crate::db::Database;
