//! API middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use voteboard_core::{PollRegistryService, VoterIdentity};

use crate::sse::SseBroadcaster;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// The poll registry.
    pub registry: PollRegistryService,
    /// Broadcaster backing the SSE event stream.
    pub broadcaster: SseBroadcaster,
}

/// Authentication middleware.
///
/// The bearer token is the caller's opaque voter identity; there is no
/// verification beyond its presence. Handlers that require a caller pull it
/// from the request extensions via [`crate::extractors::AuthVoter`].
pub async fn auth_middleware(mut req: Request<Body>, next: Next) -> Response {
    let identity = if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && !token.is_empty()
    {
        Some(VoterIdentity::from(token))
    } else {
        None
    };

    if let Some(identity) = identity {
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}
