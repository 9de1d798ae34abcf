//! Request middleware
//!
//! - [`session_middleware`]: resolves the `session` header up front
//! - [`logging_middleware`]: one line per request with caller and latency

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, error, info, info_span, warn};

use super::REQUEST_ID_HEADER;
use crate::auth::{CurrentSession, SESSION_HEADER};
use crate::state::AppState;

/// Attach the caller's session to the request when the token is live
///
/// Never rejects: protected handlers do that through the `CurrentSession`
/// extractor, which reuses what this middleware stored.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    if let Some(token) = token
        && let Some(session) = state.sessions.get(&token).await
    {
        req.extensions_mut().insert(CurrentSession { token, session });
    }

    next.run(req).await
}

/// Request logging
///
/// Opens an `http` span carrying request id, method, matched path and
/// caller, then logs the outcome inside it: 5xx at `error`, 4xx at `warn`.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_owned(), |p| p.as_str().to_owned());
    let caller = req
        .extensions()
        .get::<CurrentSession>()
        .map_or_else(
            || "anonymous".to_string(),
            |c| format!("{}:{}", c.session.role, c.session.user_id),
        );

    let span = info_span!(
        "http",
        request_id = %request_id,
        method = %req.method(),
        path = %path,
        caller = %caller,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        if status.is_server_error() {
            error!(status = status.as_u16(), latency_ms, "Request failed");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), latency_ms, "Request rejected");
        } else {
            info!(status = status.as_u16(), latency_ms, "Request completed");
        }
        response
    }
    .instrument(span)
    .await
}
