//! User authentication: registration, login, JWT verification.

pub mod handlers;
pub mod middleware;
pub mod service;

pub use service::{AuthResponse, Claims, LoginRequest, RegisterRequest, UserAuthService};
