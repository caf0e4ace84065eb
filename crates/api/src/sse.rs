//! Server-Sent Events (SSE) for real-time registry updates.
//!
//! The broadcaster implements [`PollEventPublisher`], so the registry
//! publishes straight into the SSE stream without knowing about transport.

use std::convert::Infallible;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use voteboard_common::AppResult;
use voteboard_core::{PollEventPublisher, VoterIdentity};

use crate::middleware::AppState;

/// Registry event types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RegistryEvent {
    /// A poll was created.
    Created {
        /// New poll id.
        id: u64,
        /// Identity of the creator.
        owner: String,
        /// Poll question.
        question: String,
        /// Candidate labels.
        candidates: Vec<String>,
    },
    /// A vote was cast.
    Voted {
        /// Poll voted on.
        poll_id: u64,
        /// Identity of the voter.
        voter: String,
    },
    /// A poll was closed.
    Closed {
        /// Poll that closed.
        poll_id: u64,
        /// Winning candidate label.
        winner: String,
    },
    /// Connection established.
    Connected,
}

/// Broadcast channel for registry events.
#[derive(Clone)]
pub struct SseBroadcaster {
    /// Registry event channel.
    pub events: broadcast::Sender<RegistryEvent>,
}

impl SseBroadcaster {
    /// Create a new SSE broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(1000);
        Self { events }
    }

    /// Broadcast an event to all subscribers.
    pub fn broadcast(&self, event: RegistryEvent) {
        let _ = self.events.send(event);
    }
}

impl Default for SseBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PollEventPublisher for SseBroadcaster {
    async fn publish_poll_created(
        &self,
        id: u64,
        owner: &VoterIdentity,
        question: &str,
        candidates: &[String],
    ) -> AppResult<()> {
        self.broadcast(RegistryEvent::Created {
            id,
            owner: owner.to_string(),
            question: question.to_string(),
            candidates: candidates.to_vec(),
        });
        Ok(())
    }

    async fn publish_vote_cast(&self, poll_id: u64, voter: &VoterIdentity) -> AppResult<()> {
        self.broadcast(RegistryEvent::Voted {
            poll_id,
            voter: voter.to_string(),
        });
        Ok(())
    }

    async fn publish_poll_closed(&self, poll_id: u64, winner: &str) -> AppResult<()> {
        self.broadcast(RegistryEvent::Closed {
            poll_id,
            winner: winner.to_string(),
        });
        Ok(())
    }
}

/// Registry event SSE stream.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result.ok().map(|event| {
            Ok(Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().data("error")))
        })
    });

    // Add initial connected event
    let initial = stream::once(async {
        Ok(Event::default()
            .json_data(&RegistryEvent::Connected)
            .unwrap_or_else(|_| Event::default().data("connected")))
    });

    Sse::new(initial.chain(stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}
