//! mirror-api library
//!
//! HTTP service exposing the artifact generator and the legacy record
//! storage. Admin routes sit behind timestamp + hash authentication; all
//! other routes are public.

use axum::Router;
use mirror_art::ArtifactGenerator;
use mirror_common::records::{GiftService, ReceiptService, RegistrationService};
use mirror_common::SharedStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub receipts: ReceiptService,
    pub gifts: GiftService,
    pub registrations: RegistrationService,
    pub generator: ArtifactGenerator,
    /// Shared secret for admin authentication (0 disables checking)
    pub shared_secret: i64,
}

impl AppState {
    pub fn new(store: SharedStore, generator: ArtifactGenerator, shared_secret: i64) -> Self {
        Self {
            receipts: ReceiptService::new(store.clone()),
            gifts: GiftService::new(store.clone()),
            registrations: RegistrationService::new(store),
            generator,
            shared_secret,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{delete, get, post, put};

    // Admin routes (require authentication)
    let protected = Router::new()
        .route("/api/admin/receipts", get(api::admin::list_receipts))
        .route("/api/admin/receipts/:id/status", put(api::admin::update_receipt_status))
        .route("/api/admin/receipts/:id", delete(api::admin::delete_receipt))
        .route("/api/admin/gifts", get(api::admin::list_gifts))
        .route("/api/admin/gifts/:id/status", put(api::admin::update_gift_status))
        .route("/api/admin/gifts/:id", delete(api::admin::delete_gift))
        .route("/api/admin/registrations", get(api::admin::list_registrations))
        .route(
            "/api/admin/registrations/:id/status",
            put(api::admin::update_registration_status),
        )
        .route("/api/admin/registrations/:id", delete(api::admin::delete_registration))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes
    let public = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/artifacts", post(api::create_artifact))
        .route("/api/payment/receipts", post(api::create_receipt))
        .route("/api/payment/receipts/:receipt_number", get(api::get_receipt))
        .route("/api/gift", post(api::create_gift))
        .route("/api/gift/:code", get(api::get_gift))
        .route("/api/gift/:code/redeem", post(api::redeem_gift))
        .route("/api/register", post(api::register))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
