pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::account::Database;
use crate::config::AppConfig;
use crate::notify::Notifier;
use crate::orders::OrderLifecycle;
use crate::storage::FileStore;
use crate::user_auth::UserAuthService;
use crate::user_auth::middleware::{admin_guard, jwt_auth_middleware};
use state::AppState;

/// Start HTTP Gateway server
pub async fn run_server(
    config: Arc<AppConfig>,
    db: Arc<Database>,
    notifier: Arc<dyn Notifier>,
    file_store: Arc<dyn FileStore>,
) {
    let user_auth = Arc::new(UserAuthService::new(
        db.pool().clone(),
        config.jwt_secret.clone(),
    ));

    let lifecycle = Arc::new(OrderLifecycle::new(
        db.clone(),
        notifier.clone(),
        config.market.commission_rate_percent,
    ));

    let state = Arc::new(AppState::new(
        db,
        user_auth,
        lifecycle,
        file_store,
        notifier,
        config.clone(),
    ));

    // ==========================================================================
    // Auth routes (public)
    // ==========================================================================
    let auth_routes = Router::new()
        .route("/register", post(crate::user_auth::handlers::register))
        .route("/login", post(crate::user_auth::handlers::login));

    // ==========================================================================
    // Public catalog routes (no auth required)
    // ==========================================================================
    let public_routes = Router::new()
        .route("/services", get(handlers::services::list_services))
        .route("/services/{service_id}", get(handlers::services::get_service))
        .route(
            "/services/{service_id}/reviews",
            get(handlers::reviews::list_service_reviews),
        );

    // ==========================================================================
    // Authenticated routes (JWT)
    // ==========================================================================
    let private_routes = Router::new()
        // Catalog management
        .route("/services", post(handlers::services::create_service))
        .route("/services/mine", get(handlers::services::list_my_services))
        .route(
            "/services/{service_id}",
            put(handlers::services::update_service),
        )
        .route(
            "/services/{service_id}/status",
            post(handlers::services::set_service_status),
        )
        // Orders
        .route("/orders", post(handlers::orders::place_order))
        .route("/orders", get(handlers::orders::list_orders))
        .route("/orders/{order_id}", get(handlers::orders::get_order))
        .route(
            "/orders/{order_id}/accept",
            post(handlers::orders::accept_order),
        )
        .route(
            "/orders/{order_id}/deliver",
            post(handlers::orders::deliver_order),
        )
        .route(
            "/orders/{order_id}/request-revision",
            post(handlers::orders::request_revision),
        )
        .route(
            "/orders/{order_id}/complete",
            post(handlers::orders::complete_order),
        )
        .route(
            "/orders/{order_id}/audit",
            get(handlers::orders::get_order_audit),
        )
        // Messaging
        .route(
            "/orders/{order_id}/messages",
            post(handlers::messages::send_message),
        )
        .route(
            "/orders/{order_id}/messages",
            get(handlers::messages::list_messages),
        )
        // Reviews
        .route(
            "/orders/{order_id}/review",
            post(handlers::reviews::create_review),
        )
        .route("/reviews/{review_id}", put(handlers::reviews::update_review))
        // Account
        .route("/account/profile", get(handlers::account::get_profile))
        .route("/account/profile", put(handlers::account::update_profile))
        .route(
            "/account/withdrawals",
            post(handlers::account::request_withdrawal),
        )
        .route(
            "/account/withdrawals",
            get(handlers::account::list_withdrawals),
        )
        // Disputes
        .route("/disputes", post(handlers::disputes::open_dispute))
        // Uploads
        .route("/files", post(handlers::files::upload_file))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    // ==========================================================================
    // Admin routes (JWT + role gate)
    // ==========================================================================
    let admin_routes = Router::new()
        .route("/orders", get(handlers::admin::list_all_orders))
        .route(
            "/orders/{order_id}/cancel",
            post(handlers::orders::cancel_order),
        )
        .route("/disputes", get(handlers::disputes::list_open_disputes))
        .route(
            "/disputes/{dispute_id}/resolve",
            post(handlers::disputes::resolve_dispute),
        )
        .route(
            "/reconciliation",
            get(handlers::admin::reconciliation_report),
        )
        .layer(axum::middleware::from_fn(admin_guard))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    // ==========================================================================
    // Webhooks (shared-secret, not JWT)
    // ==========================================================================
    let webhook_routes = Router::new().route(
        "/payment",
        post(handlers::webhook::payment_confirmed),
    );

    // Build complete router
    let app = Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1", public_routes)
        .nest("/api/v1", private_routes)
        .nest("/api/v1/admin", admin_routes)
        .nest("/api/v1/webhooks", webhook_routes);

    // [SECURITY] Mock webhook route - only compiled when 'mock-webhook' feature
    // is enabled. Production builds MUST be compiled with `--no-default-features`.
    #[cfg(feature = "mock-webhook")]
    let app = app.nest(
        "/internal/mock",
        Router::new().route(
            "/payment",
            post(handlers::webhook::mock_payment_confirmed),
        ),
    );

    let app = app
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    // Bind address
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                config.gateway.port, config.gateway.port
            );
            std::process::exit(1);
        }
    };

    tracing::info!("🚀 Gateway listening on http://{}", addr);
    tracing::info!("📖 API Docs: http://{}/docs", addr);

    // Start server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
