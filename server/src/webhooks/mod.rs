//! Incoming Webhooks
//!
//! Management plane for token-bearing endpoints that post into a channel:
//! create, list, inspect and revoke, all behind a two-tier permission gate.

pub mod error;
pub mod gate;
pub mod handlers;
pub mod queries;
pub mod service;
pub mod types;

use axum::routing::{get, post};
use axum::Router;

use crate::api::AppState;

pub use error::{ErrorKind, WebhookError};
pub use gate::{authorize, decide, Decision, GateTarget};
pub use queries::{PgWebhookStore, WebhookStore};
pub use service::WebhookService;
pub use types::{
    CreateIncomingWebhookRequest, IncomingWebhook, ListIncomingWebhooksQuery, PageLimits,
    Pagination,
};

/// Incoming webhook routes. Callers must already be authenticated.
///
/// - POST   /api/v4/hooks/incoming
/// - GET    /api/v4/hooks/incoming
/// - GET    /api/v4/hooks/incoming/{hook_id}
/// - DELETE /api/v4/hooks/incoming/{hook_id}
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v4/hooks/incoming",
            post(handlers::create_incoming_hook).get(handlers::list_incoming_hooks),
        )
        .route(
            "/api/v4/hooks/incoming/{hook_id}",
            get(handlers::get_incoming_hook).delete(handlers::delete_incoming_hook),
        )
}
