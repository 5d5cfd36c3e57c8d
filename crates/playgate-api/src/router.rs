//! Axum router construction.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use playgate_core::{AccountStore, Notifier, RegistrationService, ServiceSettings, VerificationService};
use serde::Serialize;

use crate::handlers::accounts::{register_handler, resend_handler};
use crate::handlers::verification::verify_handler;

/// Services shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registration and code re-issue.
    pub registration: RegistrationService,
    /// Code redemption.
    pub verification: VerificationService,
}

impl AppState {
    /// Wire both services to the same store.
    pub fn new(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            registration: RegistrationService::new(store.clone(), notifier, settings),
            verification: VerificationService::new(store, settings),
        }
    }
}

/// State handle passed to handlers.
pub type SharedState = Arc<AppState>;

/// Response body for the health endpoint.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Build the Axum application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/v1/accounts", post(register_handler))
        .route("/v1/accounts/verification-code", post(resend_handler))
        .route("/v1/accounts/:id/verify", post(verify_handler))
        .with_state(Arc::new(state))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
