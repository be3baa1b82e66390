//! Hooks Server
//!
//! Permission-gated lifecycle management for incoming webhooks: external
//! callers get a token-bearing endpoint that posts into one channel, and
//! authorized users create, enumerate, inspect and revoke those endpoints.

pub mod api;
pub mod audit;
pub mod auth;
pub mod channels;
pub mod config;
pub mod db;
pub mod permissions;
pub mod webhooks;
