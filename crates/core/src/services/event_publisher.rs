//! Event publisher service.
//!
//! Provides an abstraction for publishing registry events.
//! The actual delivery mechanism is provided by the api crate (SSE broadcast);
//! the registry only calls the trait.

use async_trait::async_trait;
use std::sync::Arc;
use voteboard_common::AppResult;

use crate::services::poll_registry::VoterIdentity;

/// Trait for publishing poll registry events.
///
/// This allows the registry to announce state changes without depending
/// on the transport that carries them to subscribers.
#[async_trait]
pub trait PollEventPublisher: Send + Sync {
    /// Publish a poll created event.
    async fn publish_poll_created(
        &self,
        id: u64,
        owner: &VoterIdentity,
        question: &str,
        candidates: &[String],
    ) -> AppResult<()>;

    /// Publish a vote cast event.
    async fn publish_vote_cast(&self, poll_id: u64, voter: &VoterIdentity) -> AppResult<()>;

    /// Publish a poll closed event.
    async fn publish_poll_closed(&self, poll_id: u64, winner: &str) -> AppResult<()>;
}

/// A no-op implementation of [`PollEventPublisher`] for testing or when
/// event delivery is disabled.
#[derive(Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl PollEventPublisher for NoOpEventPublisher {
    async fn publish_poll_created(
        &self,
        _id: u64,
        _owner: &VoterIdentity,
        _question: &str,
        _candidates: &[String],
    ) -> AppResult<()> {
        Ok(())
    }

    async fn publish_vote_cast(&self, _poll_id: u64, _voter: &VoterIdentity) -> AppResult<()> {
        Ok(())
    }

    async fn publish_poll_closed(&self, _poll_id: u64, _winner: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed [`PollEventPublisher`] trait object.
pub type EventPublisherService = Arc<dyn PollEventPublisher>;
