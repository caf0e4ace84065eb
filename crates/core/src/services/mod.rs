//! Core services.

pub mod event_publisher;
pub mod poll_registry;

pub use event_publisher::{EventPublisherService, NoOpEventPublisher, PollEventPublisher};
pub use poll_registry::{Poll, PollRegistryService, VoteRecord, VoterIdentity, VoterView};
