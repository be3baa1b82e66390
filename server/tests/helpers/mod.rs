//! Reusable test helpers for webhook tests.
//!
//! Provides in-memory collaborators (channel lookup, permission evaluator,
//! webhook store, audit sink) and `TestApp`, which drives the full axum router
//! via `tower::ServiceExt::oneshot`.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use hooks_server::api::{create_router, AppState};
use hooks_server::audit::{AuditAction, AuditEvent, AuditOutcome, AuditSink};
use hooks_server::auth::jwt;
use hooks_server::channels::{Channel, ChannelLookup, ChannelType};
use hooks_server::config::Config;
use hooks_server::db::{BackendError, BackendResult};
use hooks_server::permissions::{Permission, PermissionEvaluator, PermissionScope};
use hooks_server::webhooks::{
    IncomingWebhook, PageLimits, Pagination, WebhookService, WebhookStore,
};

// ============================================================================
// Channel lookup
// ============================================================================

#[derive(Default)]
pub struct MemoryChannels {
    channels: Mutex<HashMap<Uuid, Channel>>,
    teams: Mutex<HashSet<Uuid>>,
}

impl MemoryChannels {
    pub fn add_team(&self) -> Uuid {
        let team_id = Uuid::now_v7();
        self.teams.lock().unwrap().insert(team_id);
        team_id
    }

    pub fn remove_team(&self, team_id: Uuid) {
        self.teams.lock().unwrap().remove(&team_id);
    }

    pub fn add_channel(&self, team_id: Option<Uuid>, channel_type: ChannelType) -> Uuid {
        let id = Uuid::now_v7();
        self.channels.lock().unwrap().insert(
            id,
            Channel {
                id,
                team_id,
                channel_type,
            },
        );
        id
    }

    pub fn remove_channel(&self, channel_id: Uuid) {
        self.channels.lock().unwrap().remove(&channel_id);
    }

    /// Move a channel to another team without touching existing hooks.
    pub fn move_channel(&self, channel_id: Uuid, team_id: Uuid) {
        if let Some(channel) = self.channels.lock().unwrap().get_mut(&channel_id) {
            channel.team_id = Some(team_id);
        }
    }

    pub fn set_channel_type(&self, channel_id: Uuid, channel_type: ChannelType) {
        if let Some(channel) = self.channels.lock().unwrap().get_mut(&channel_id) {
            channel.channel_type = channel_type;
        }
    }
}

#[async_trait]
impl ChannelLookup for MemoryChannels {
    async fn get_channel(&self, channel_id: Uuid) -> BackendResult<Option<Channel>> {
        Ok(self.channels.lock().unwrap().get(&channel_id).cloned())
    }

    async fn team_exists(&self, team_id: Uuid) -> BackendResult<bool> {
        Ok(self.teams.lock().unwrap().contains(&team_id))
    }
}

// ============================================================================
// Permission evaluator
// ============================================================================

/// Exact-match grants: no scope implies another.
#[derive(Default)]
pub struct MemoryPermissions {
    grants: Mutex<HashSet<(Uuid, PermissionScope, Permission)>>,
    calls: Mutex<Vec<(Uuid, PermissionScope, Permission)>>,
}

impl MemoryPermissions {
    pub fn grant(&self, user_id: Uuid, scope: PermissionScope, permission: Permission) {
        self.grants
            .lock()
            .unwrap()
            .insert((user_id, scope, permission));
    }

    pub fn revoke(&self, user_id: Uuid, scope: PermissionScope, permission: Permission) {
        self.grants
            .lock()
            .unwrap()
            .remove(&(user_id, scope, permission));
    }

    pub fn grant_team_manager(&self, user_id: Uuid, team_id: Uuid) {
        self.grant(
            user_id,
            PermissionScope::Team(team_id),
            Permission::ManageWebhooks,
        );
    }

    pub fn grant_channel_read(&self, user_id: Uuid, channel_id: Uuid) {
        self.grant(
            user_id,
            PermissionScope::Channel(channel_id),
            Permission::ReadChannel,
        );
    }

    /// Number of READ_CHANNEL lookups made so far.
    pub fn read_channel_checks(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, _, p)| *p == Permission::ReadChannel)
            .count()
    }
}

#[async_trait]
impl PermissionEvaluator for MemoryPermissions {
    async fn has_permission(
        &self,
        user_id: Uuid,
        scope: PermissionScope,
        permission: Permission,
    ) -> BackendResult<bool> {
        self.calls
            .lock()
            .unwrap()
            .push((user_id, scope, permission));
        Ok(self
            .grants
            .lock()
            .unwrap()
            .contains(&(user_id, scope, permission)))
    }
}

// ============================================================================
// Webhook store
// ============================================================================

/// Insertion-ordered store with an optional injected failure.
#[derive(Default)]
pub struct MemoryStore {
    hooks: Mutex<Vec<IncomingWebhook>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn len(&self) -> usize {
        self.hooks.lock().unwrap().len()
    }

    pub fn insert(&self, hook: IncomingWebhook) {
        self.hooks.lock().unwrap().push(hook);
    }

    fn check_writes(&self) -> BackendResult<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(BackendError::Unavailable("injected write failure".into()));
        }
        Ok(())
    }

    fn page_of<'a>(
        hooks: impl Iterator<Item = &'a IncomingWebhook>,
        page: Pagination,
    ) -> Vec<IncomingWebhook> {
        hooks
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl WebhookStore for MemoryStore {
    async fn create(&self, hook: &IncomingWebhook) -> BackendResult<IncomingWebhook> {
        self.check_writes()?;
        self.hooks.lock().unwrap().push(hook.clone());
        Ok(hook.clone())
    }

    async fn get(&self, hook_id: Uuid) -> BackendResult<Option<IncomingWebhook>> {
        Ok(self
            .hooks
            .lock()
            .unwrap()
            .iter()
            .find(|h| h.id == hook_id)
            .cloned())
    }

    async fn delete(&self, hook_id: Uuid) -> BackendResult<()> {
        self.check_writes()?;
        self.hooks.lock().unwrap().retain(|h| h.id != hook_id);
        Ok(())
    }

    async fn list_by_team(
        &self,
        team_id: Uuid,
        page: Pagination,
    ) -> BackendResult<Vec<IncomingWebhook>> {
        let hooks = self.hooks.lock().unwrap();
        Ok(Self::page_of(
            hooks.iter().filter(|h| h.team_id == team_id),
            page,
        ))
    }

    async fn list_all(&self, page: Pagination) -> BackendResult<Vec<IncomingWebhook>> {
        let hooks = self.hooks.lock().unwrap();
        Ok(Self::page_of(hooks.iter(), page))
    }
}

// ============================================================================
// Audit sink
// ============================================================================

/// Records events in order; can be told to reject one outcome.
#[derive(Default)]
pub struct MemoryAudit {
    events: Mutex<Vec<AuditEvent>>,
    reject: Mutex<Option<AuditOutcome>>,
}

impl MemoryAudit {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn outcomes(&self) -> Vec<(AuditAction, AuditOutcome)> {
        self.events()
            .into_iter()
            .map(|e| (e.action, e.outcome))
            .collect()
    }

    pub fn reject(&self, outcome: AuditOutcome) {
        *self.reject.lock().unwrap() = Some(outcome);
    }
}

#[async_trait]
impl AuditSink for MemoryAudit {
    async fn record(&self, event: AuditEvent) -> BackendResult<()> {
        if *self.reject.lock().unwrap() == Some(event.outcome) {
            return Err(BackendError::Unavailable("audit log offline".into()));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

// ============================================================================
// Fixture
// ============================================================================

/// All in-memory collaborators plus a service wired to them.
pub struct Fixture {
    pub channels: Arc<MemoryChannels>,
    pub permissions: Arc<MemoryPermissions>,
    pub store: Arc<MemoryStore>,
    pub audit: Arc<MemoryAudit>,
    pub service: WebhookService,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_limits(PageLimits {
            default_per_page: 60,
            max_per_page: 200,
        })
    }

    pub fn with_limits(limits: PageLimits) -> Self {
        let channels = Arc::new(MemoryChannels::default());
        let permissions = Arc::new(MemoryPermissions::default());
        let store = Arc::new(MemoryStore::default());
        let audit = Arc::new(MemoryAudit::default());
        let service = WebhookService::new(
            channels.clone(),
            permissions.clone(),
            store.clone(),
            audit.clone(),
            limits,
        );

        Self {
            channels,
            permissions,
            store,
            audit,
            service,
        }
    }
}

/// Build a hook record directly, bypassing the service.
pub fn stored_hook(channel_id: Uuid, team_id: Uuid, user_id: Uuid) -> IncomingWebhook {
    let now = chrono::Utc::now();
    IncomingWebhook {
        id: Uuid::now_v7(),
        channel_id,
        team_id,
        user_id,
        display_name: String::new(),
        description: String::new(),
        created_at: now,
        updated_at: now,
    }
}

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router over a [`Fixture`].
pub struct TestApp {
    pub router: Router,
    pub fixture: Fixture,
    pub config: Arc<Config>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Config::default_for_test();
        let fixture = Fixture::new();
        let state = AppState::new(config.clone(), fixture.service.clone());
        let router = create_router(state);

        Self {
            router,
            fixture,
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Build an authenticated request for `user_id`.
    pub fn authed(&self, method: Method, uri: &str, user_id: Uuid) -> http::request::Builder {
        let token = generate_access_token(&self.config, user_id);
        Self::request(method, uri).header("Authorization", format!("Bearer {token}"))
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }
}

/// Generate a valid access token for a user.
pub fn generate_access_token(config: &Config, user_id: Uuid) -> String {
    jwt::generate_access_token(user_id, &config.jwt_secret, config.jwt_access_expiry)
        .expect("Failed to generate test token")
}

/// Collect a response body into JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
