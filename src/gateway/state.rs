use std::sync::Arc;

use crate::account::Database;
use crate::config::AppConfig;
use crate::notify::Notifier;
use crate::orders::OrderLifecycle;
use crate::storage::FileStore;
use crate::user_auth::UserAuthService;

/// Shared gateway application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL database
    pub db: Arc<Database>,
    /// User auth (register/login/JWT)
    pub user_auth: Arc<UserAuthService>,
    /// Order transition engine
    pub lifecycle: Arc<OrderLifecycle>,
    /// File storage collaborator
    pub file_store: Arc<dyn FileStore>,
    /// Notification collaborator
    pub notifier: Arc<dyn Notifier>,
    /// Business parameters (commission rate, review window, webhook secret)
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        user_auth: Arc<UserAuthService>,
        lifecycle: Arc<OrderLifecycle>,
        file_store: Arc<dyn FileStore>,
        notifier: Arc<dyn Notifier>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            user_auth,
            lifecycle,
            file_store,
            notifier,
            config,
        }
    }
}
