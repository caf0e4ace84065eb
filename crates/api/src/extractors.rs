//! Request extractors.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use voteboard_common::AppError;
use voteboard_core::VoterIdentity;

/// Authenticated voter extractor.
#[derive(Debug, Clone)]
pub struct AuthVoter(pub VoterIdentity);

impl<S> FromRequestParts<S> for AuthVoter
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        parts
            .extensions
            .get::<VoterIdentity>()
            .cloned()
            .map(AuthVoter)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated voter extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthVoter(pub Option<VoterIdentity>);

impl<S> FromRequestParts<S> for MaybeAuthVoter
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<VoterIdentity>().cloned()))
    }
}
