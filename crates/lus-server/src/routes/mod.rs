//! Route handlers for the HTTP API.

pub mod auth;
pub mod catalog;
pub mod health;
pub mod history;
pub mod users;
pub mod videos;

use serde::Serialize;

/// Generic `{"detail": ...}` body used by the auth and user endpoints.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub detail: String,
}

impl MessageResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
