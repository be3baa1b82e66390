//! Incoming Webhook API Handlers
//!
//! HTTP surface over [`WebhookService`](super::service::WebhookService).

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::error::{ErrorResponse, WebhookError};
use super::types::{
    parse_hook_id, CreateIncomingWebhookRequest, IncomingWebhook, ListIncomingWebhooksQuery,
};
use crate::api::AppState;
use crate::auth::AuthUser;

/// Create an incoming webhook.
#[utoipa::path(
    post,
    path = "/api/v4/hooks/incoming",
    tag = "webhooks",
    request_body = CreateIncomingWebhookRequest,
    responses(
        (status = 201, description = "Incoming webhook created", body = IncomingWebhook),
        (status = 400, description = "Malformed payload", body = ErrorResponse),
        (status = 403, description = "Missing manage_webhooks or read_channel", body = ErrorResponse),
        (status = 404, description = "Channel or team not found", body = ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, auth, body), fields(user_id = %auth.id))]
pub async fn create_incoming_hook(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<CreateIncomingWebhookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IncomingWebhook>), WebhookError> {
    let Json(req) = body.map_err(|_| WebhookError::InvalidParameter("webhook".to_string()))?;

    let hook = state.webhooks.create(auth.id, req).await?;

    Ok((StatusCode::CREATED, Json(hook)))
}

/// List incoming webhooks for one team, or across all teams.
#[utoipa::path(
    get,
    path = "/api/v4/hooks/incoming",
    tag = "webhooks",
    params(ListIncomingWebhooksQuery),
    responses(
        (status = 200, description = "Page of incoming webhooks", body = [IncomingWebhook]),
        (status = 400, description = "Query string is not form encoded", body = ErrorResponse),
        (status = 403, description = "Missing manage_webhooks", body = ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, auth, query), fields(user_id = %auth.id))]
pub async fn list_incoming_hooks(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ListIncomingWebhooksQuery>, QueryRejection>,
) -> Result<Json<Vec<IncomingWebhook>>, WebhookError> {
    let Query(query) = query.map_err(|e| WebhookError::InvalidParameter(e.body_text()))?;

    let hooks = state.webhooks.list(auth.id, &query).await?;

    Ok(Json(hooks))
}

/// Fetch one incoming webhook.
#[utoipa::path(
    get,
    path = "/api/v4/hooks/incoming/{hook_id}",
    tag = "webhooks",
    params(("hook_id" = String, Path, description = "Incoming webhook ID")),
    responses(
        (status = 200, description = "Incoming webhook", body = IncomingWebhook),
        (status = 400, description = "Malformed hook id", body = ErrorResponse),
        (status = 403, description = "Missing manage_webhooks or read_channel", body = ErrorResponse),
        (status = 404, description = "Hook or its channel not found", body = ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn get_incoming_hook(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(hook_id): Path<String>,
) -> Result<Json<IncomingWebhook>, WebhookError> {
    let hook_id = parse_hook_id(&hook_id)?;

    let hook = state.webhooks.get(auth.id, hook_id).await?;

    Ok(Json(hook))
}

/// Revoke an incoming webhook.
#[utoipa::path(
    delete,
    path = "/api/v4/hooks/incoming/{hook_id}",
    tag = "webhooks",
    params(("hook_id" = String, Path, description = "Incoming webhook ID")),
    responses(
        (status = 204, description = "Incoming webhook deleted"),
        (status = 400, description = "Malformed hook id", body = ErrorResponse),
        (status = 403, description = "Missing manage_webhooks or read_channel", body = ErrorResponse),
        (status = 404, description = "Hook or its channel not found", body = ErrorResponse),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn delete_incoming_hook(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(hook_id): Path<String>,
) -> Result<StatusCode, WebhookError> {
    let hook_id = parse_hook_id(&hook_id)?;

    state.webhooks.delete(auth.id, hook_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
