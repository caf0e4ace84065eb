//! HTTP API layer for voteboard.
//!
//! This crate provides the REST API and the real-time event stream:
//!
//! - **Endpoints**: poll creation, voting, closing, read queries
//! - **Extractors**: caller identity from the auth middleware
//! - **Middleware**: bearer-token identity extraction
//! - **SSE**: Server-Sent Events stream of registry events
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod sse;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
pub use sse::{RegistryEvent, SseBroadcaster};
