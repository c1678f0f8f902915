//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::account::StudentProfile;
use crate::audit::{AuditEntry, BalanceDiscrepancy};
use crate::catalog::models::{
    CreateServiceRequest, ServiceApiData, ServiceStatusRequest, UpdateServiceRequest,
};
use crate::disputes::models::{DisputeApiData, OpenDisputeRequest, ResolveDisputeRequest};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::handlers::account::{UpdateProfileRequest, WithdrawRequest, WithdrawalApiData};
use crate::gateway::handlers::files::UploadResponse;
use crate::gateway::handlers::webhook::PaymentConfirmedPayload;
use crate::messages::models::{Message, SendMessageRequest};
use crate::orders::models::{
    CancelRequest, DeliverRequest, OrderApiData, PlaceOrderRequest, RevisionRequest,
};
use crate::reviews::models::{CreateReviewRequest, UpdateReviewRequest};
use crate::user_auth::service::{AuthResponse, LoginRequest, RegisterRequest};

/// Bearer JWT security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus Market API",
        version = "1.0.0",
        description = "Student services marketplace: listings, escrowed orders, commission settlement, reviews and moderation.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        // Auth
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
        // Catalog
        crate::gateway::handlers::services::create_service,
        crate::gateway::handlers::services::list_services,
        crate::gateway::handlers::services::get_service,
        crate::gateway::handlers::services::list_my_services,
        crate::gateway::handlers::services::update_service,
        crate::gateway::handlers::services::set_service_status,
        // Orders
        crate::gateway::handlers::orders::place_order,
        crate::gateway::handlers::orders::list_orders,
        crate::gateway::handlers::orders::get_order,
        crate::gateway::handlers::orders::accept_order,
        crate::gateway::handlers::orders::deliver_order,
        crate::gateway::handlers::orders::request_revision,
        crate::gateway::handlers::orders::complete_order,
        crate::gateway::handlers::orders::get_order_audit,
        // Messaging
        crate::gateway::handlers::messages::send_message,
        crate::gateway::handlers::messages::list_messages,
        // Reviews
        crate::gateway::handlers::reviews::create_review,
        crate::gateway::handlers::reviews::update_review,
        crate::gateway::handlers::reviews::list_service_reviews,
        // Account
        crate::gateway::handlers::account::get_profile,
        crate::gateway::handlers::account::update_profile,
        crate::gateway::handlers::account::request_withdrawal,
        crate::gateway::handlers::account::list_withdrawals,
        // Disputes / Admin
        crate::gateway::handlers::disputes::open_dispute,
        crate::gateway::handlers::disputes::list_open_disputes,
        crate::gateway::handlers::disputes::resolve_dispute,
        crate::gateway::handlers::admin::list_all_orders,
        crate::gateway::handlers::admin::reconciliation_report,
        // Files / Webhooks
        crate::gateway::handlers::files::upload_file,
        crate::gateway::handlers::webhook::payment_confirmed,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            CreateServiceRequest,
            UpdateServiceRequest,
            ServiceStatusRequest,
            ServiceApiData,
            PlaceOrderRequest,
            DeliverRequest,
            RevisionRequest,
            CancelRequest,
            OrderApiData,
            SendMessageRequest,
            Message,
            CreateReviewRequest,
            UpdateReviewRequest,
            StudentProfile,
            UpdateProfileRequest,
            WithdrawRequest,
            WithdrawalApiData,
            OpenDisputeRequest,
            ResolveDisputeRequest,
            DisputeApiData,
            AuditEntry,
            BalanceDiscrepancy,
            UploadResponse,
            PaymentConfirmedPayload,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Services", description = "Service listings"),
        (name = "Orders", description = "Order lifecycle (auth required)"),
        (name = "Messages", description = "Order message threads"),
        (name = "Reviews", description = "Reviews of completed orders"),
        (name = "Account", description = "Student balance and withdrawals"),
        (name = "Disputes", description = "Dispute intake"),
        (name = "Admin", description = "Moderation and reconciliation"),
        (name = "Files", description = "Uploads"),
        (name = "Webhooks", description = "Payment gateway callbacks"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_doc_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).expect("openapi serializes");
        assert!(json.contains("/api/v1/orders/{order_id}/complete"));
        assert!(json.contains("/api/v1/admin/reconciliation"));
        assert!(json.contains("/api/v1/webhooks/payment"));
    }
}
