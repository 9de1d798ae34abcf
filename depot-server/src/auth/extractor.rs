//! Session extractor
//!
//! Reads the `session` header, resolves it against the session store and
//! caches the result in request extensions so the logging middleware and
//! later extractors can see who is calling.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::{AppError, ErrorCode};

use super::Session;
use super::policy::{Access, Operation, authorize};
use crate::state::AppState;

pub const SESSION_HEADER: &str = "session";

/// Authenticated caller of a protected handler
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub token: String,
    pub session: Session,
}

impl CurrentSession {
    pub fn authorize(&self, op: Operation) -> Result<Access, AppError> {
        authorize(&self.session, op)
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentSession>() {
            return Ok(current.clone());
        }

        let token = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::debug!(uri = %parts.uri, "Missing session header");
                AppError::not_authenticated()
            })?
            .to_string();

        let Some(session) = state.sessions.get(&token).await else {
            tracing::debug!(uri = %parts.uri, "Unknown or expired session");
            return Err(AppError::new(ErrorCode::SessionExpired));
        };

        let current = CurrentSession { token, session };
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}
