//! Poll registry service.
//!
//! The registry owns every poll record and every vote record. It is the sole
//! mutator of that state: all check-then-mutate sequences run under a single
//! write guard, so each operation is atomic with respect to concurrent callers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use voteboard_common::{AppError, AppResult, RegistryConfig};

use crate::services::event_publisher::{EventPublisherService, NoOpEventPublisher};

/// Opaque identifier of a calling party.
///
/// Supplied by the host environment (the HTTP layer); assumed unique per
/// real-world participant, not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VoterIdentity(String);

impl VoterIdentity {
    /// Create a voter identity from an opaque token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoterIdentity {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for VoterIdentity {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single voting instance.
///
/// Identity, question and candidate list are fixed at creation. The only
/// mutations a poll ever sees are vote-count increments and the one-way
/// open-to-closed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Poll {
    /// Sequential id, assigned from 1. Id 0 is reserved and never valid.
    pub id: u64,
    /// Identity of the creator.
    pub owner: VoterIdentity,
    /// Free-form question text.
    pub question: String,
    /// Ordered candidate labels, indexed from 0. Never empty.
    pub candidates: Vec<String>,
    /// Winning candidate label. Empty exactly while the poll is open.
    pub winner: String,
    /// Whether the poll still accepts votes.
    pub is_open: bool,
    /// Vote tally per candidate index.
    pub vote_counts: Vec<u64>,
    /// When the poll was created.
    pub created_at: DateTime<Utc>,
    /// When voting was closed, if it has been.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Poll {
    /// Number of distinct voters who have voted on this poll.
    #[must_use]
    pub fn voters_count(&self) -> u64 {
        self.vote_counts.iter().sum()
    }
}

/// A voter's recorded choice on one poll.
///
/// Created lazily on the first successful vote and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRecord {
    /// Chosen candidate index.
    pub candidate_index: usize,
    /// When the vote was cast.
    pub created_at: DateTime<Utc>,
}

/// Read-only projection of a voter's status on one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoterView {
    /// Whether the voter has a recorded vote on the poll.
    pub has_voted: bool,
    /// Label of the chosen candidate, empty if the voter has not voted.
    pub voted_for: String,
}

impl VoterView {
    const fn none() -> Self {
        Self {
            has_voted: false,
            voted_for: String::new(),
        }
    }
}

/// One poll plus its per-voter vote records.
#[derive(Debug)]
struct PollRecord {
    poll: Poll,
    voters: HashMap<VoterIdentity, VoteRecord>,
}

/// Registry state: the poll table. Poll with id `n` lives at index `n - 1`.
#[derive(Debug, Default)]
struct RegistryState {
    polls: Vec<PollRecord>,
}

impl RegistryState {
    fn get(&self, poll_id: u64) -> AppResult<&PollRecord> {
        poll_id
            .checked_sub(1)
            .and_then(|i| self.polls.get(usize::try_from(i).ok()?))
            .ok_or(AppError::PollNotFound(poll_id))
    }

    fn get_mut(&mut self, poll_id: u64) -> AppResult<&mut PollRecord> {
        poll_id
            .checked_sub(1)
            .and_then(|i| self.polls.get_mut(usize::try_from(i).ok()?))
            .ok_or(AppError::PollNotFound(poll_id))
    }
}

/// Poll registry service.
#[derive(Clone)]
pub struct PollRegistryService {
    state: Arc<RwLock<RegistryState>>,
    limits: RegistryConfig,
    events: EventPublisherService,
}

impl PollRegistryService {
    /// Create a new registry with event delivery disabled.
    #[must_use]
    pub fn new(limits: &RegistryConfig) -> Self {
        Self::with_publisher(limits, Arc::new(NoOpEventPublisher))
    }

    /// Create a new registry publishing events through `events`.
    #[must_use]
    pub fn with_publisher(limits: &RegistryConfig, events: EventPublisherService) -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState::default())),
            limits: limits.clone(),
            events,
        }
    }

    /// Create a poll and return its id.
    ///
    /// Ids are sequential starting at 1 and never reused. The new poll is
    /// open, has zeroed vote counts and an empty winner.
    pub async fn create_poll(
        &self,
        owner: &VoterIdentity,
        question: &str,
        candidates: Vec<String>,
    ) -> AppResult<u64> {
        self.validate_poll_input(question, &candidates)?;

        let poll = {
            let mut state = self.state.write().await;

            let id = state.polls.len() as u64 + 1;
            let poll = Poll {
                id,
                owner: owner.clone(),
                question: question.to_string(),
                vote_counts: vec![0; candidates.len()],
                candidates,
                winner: String::new(),
                is_open: true,
                created_at: Utc::now(),
                closed_at: None,
            };
            state.polls.push(PollRecord {
                poll: poll.clone(),
                voters: HashMap::new(),
            });
            poll
        };

        tracing::info!(poll_id = poll.id, owner = %owner, "Poll created");

        if let Err(e) = self
            .events
            .publish_poll_created(poll.id, &poll.owner, &poll.question, &poll.candidates)
            .await
        {
            tracing::warn!(error = %e, poll_id = poll.id, "Failed to publish poll created event");
        }

        Ok(poll.id)
    }

    /// Cast a vote on a poll.
    ///
    /// Error precedence: existence, then closed state, then double voting,
    /// then candidate validity.
    pub async fn vote(
        &self,
        voter: &VoterIdentity,
        poll_id: u64,
        candidate_index: i64,
    ) -> AppResult<()> {
        {
            let mut state = self.state.write().await;
            let record = state.get_mut(poll_id)?;

            if !record.poll.is_open {
                return Err(AppError::PollClosed(poll_id));
            }
            if record.voters.contains_key(voter) {
                return Err(AppError::AlreadyVoted(poll_id));
            }
            let index = usize::try_from(candidate_index)
                .ok()
                .filter(|&i| i < record.poll.candidates.len())
                .ok_or(AppError::InvalidCandidate {
                    poll_id,
                    index: candidate_index,
                })?;

            record.poll.vote_counts[index] += 1;
            record.voters.insert(
                voter.clone(),
                VoteRecord {
                    candidate_index: index,
                    created_at: Utc::now(),
                },
            );
        }

        tracing::debug!(poll_id, voter = %voter, "Vote recorded");

        if let Err(e) = self.events.publish_vote_cast(poll_id, voter).await {
            tracing::warn!(error = %e, poll_id, "Failed to publish vote cast event");
        }

        Ok(())
    }

    /// Close voting on a poll, freezing the winner.
    ///
    /// Only the poll owner may close. The winner is the candidate with the
    /// highest vote count; on a tie the lowest candidate index wins.
    pub async fn close_voting(&self, caller: &VoterIdentity, poll_id: u64) -> AppResult<Poll> {
        let poll = {
            let mut state = self.state.write().await;
            let record = state.get_mut(poll_id)?;

            if record.poll.owner != *caller {
                return Err(AppError::Forbidden(
                    "Only the poll owner can close voting".to_string(),
                ));
            }
            if !record.poll.is_open {
                return Err(AppError::AlreadyClosed(poll_id));
            }

            record.poll.is_open = false;
            record.poll.winner =
                winning_label(&record.poll.candidates, &record.poll.vote_counts);
            record.poll.closed_at = Some(Utc::now());
            record.poll.clone()
        };

        tracing::info!(poll_id, winner = %poll.winner, "Poll closed");

        if let Err(e) = self.events.publish_poll_closed(poll_id, &poll.winner).await {
            tracing::warn!(error = %e, poll_id, "Failed to publish poll closed event");
        }

        Ok(poll)
    }

    /// Get a poll by id.
    pub async fn get_poll(&self, poll_id: u64) -> AppResult<Poll> {
        let state = self.state.read().await;
        Ok(state.get(poll_id)?.poll.clone())
    }

    /// Get a voter's status on a poll.
    ///
    /// Read-query tolerant: a missing poll or an unknown voter yields
    /// `(false, "")` rather than an error.
    pub async fn get_voter_info(&self, poll_id: u64, voter: &VoterIdentity) -> VoterView {
        let state = self.state.read().await;
        let Ok(record) = state.get(poll_id) else {
            return VoterView::none();
        };
        record.voters.get(voter).map_or(VoterView::none(), |vote| {
            VoterView {
                has_voted: true,
                voted_for: record
                    .poll
                    .candidates
                    .get(vote.candidate_index)
                    .cloned()
                    .unwrap_or_default(),
            }
        })
    }

    /// Total number of polls ever created.
    ///
    /// Also the highest valid poll id, since ids are sequential and never
    /// reused.
    pub async fn poll_count(&self) -> u64 {
        let state = self.state.read().await;
        state.polls.len() as u64
    }

    fn validate_poll_input(&self, question: &str, candidates: &[String]) -> AppResult<()> {
        if question.chars().count() > self.limits.max_question_length {
            return Err(AppError::Validation(format!(
                "Question is too long (max {} chars)",
                self.limits.max_question_length
            )));
        }
        if candidates.is_empty() {
            return Err(AppError::Validation(
                "Poll must have at least one candidate".to_string(),
            ));
        }
        if candidates.len() > self.limits.max_candidates {
            return Err(AppError::Validation(format!(
                "Poll cannot have more than {} candidates",
                self.limits.max_candidates
            )));
        }
        for candidate in candidates {
            if candidate.trim().is_empty() {
                return Err(AppError::Validation(
                    "Candidate labels cannot be empty".to_string(),
                ));
            }
            if candidate.chars().count() > self.limits.max_candidate_length {
                return Err(AppError::Validation(format!(
                    "Candidate label is too long (max {} chars)",
                    self.limits.max_candidate_length
                )));
            }
        }
        Ok(())
    }
}

/// Label of the candidate with the strictly highest count; lowest index on ties.
fn winning_label(candidates: &[String], counts: &[u64]) -> String {
    let mut winner = 0;
    for (index, &count) in counts.iter().enumerate() {
        if count > counts[winner] {
            winner = index;
        }
    }
    candidates.get(winner).cloned().unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::event_publisher::PollEventPublisher;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    const QUESTION: &str = "Which programming language is your favourite language?";

    fn languages() -> Vec<String> {
        ["C#", "C++", "Python", "Solidity"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn registry() -> PollRegistryService {
        PollRegistryService::new(&RegistryConfig::default())
    }

    fn voter(id: &str) -> VoterIdentity {
        VoterIdentity::from(id)
    }

    /// Publisher that records every event it sees, for asserting payloads.
    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PollEventPublisher for RecordingPublisher {
        async fn publish_poll_created(
            &self,
            id: u64,
            owner: &VoterIdentity,
            question: &str,
            candidates: &[String],
        ) -> voteboard_common::AppResult<()> {
            self.events.lock().await.push(format!(
                "created:{id}:{owner}:{question}:{}",
                candidates.join(",")
            ));
            Ok(())
        }

        async fn publish_vote_cast(
            &self,
            poll_id: u64,
            voter: &VoterIdentity,
        ) -> voteboard_common::AppResult<()> {
            self.events
                .lock()
                .await
                .push(format!("voted:{poll_id}:{voter}"));
            Ok(())
        }

        async fn publish_poll_closed(
            &self,
            poll_id: u64,
            winner: &str,
        ) -> voteboard_common::AppResult<()> {
            self.events
                .lock()
                .await
                .push(format!("closed:{poll_id}:{winner}"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_create_poll_tracks_count_and_id() {
        let registry = registry();
        assert_eq!(registry.poll_count().await, 0);

        let id = registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(registry.poll_count().await, 1);

        let id = registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();
        assert_eq!(id, 2);
        assert_eq!(registry.poll_count().await, 2);
    }

    #[tokio::test]
    async fn test_new_poll_has_correct_data() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        let poll = registry.get_poll(1).await.unwrap();
        assert_eq!(poll.id, 1);
        assert_eq!(poll.owner, voter("creator"));
        assert_eq!(poll.question, QUESTION);
        assert_eq!(poll.candidates, languages());
        assert_eq!(poll.winner, "");
        assert!(poll.is_open);
        assert_eq!(poll.vote_counts, vec![0, 0, 0, 0]);
        assert!(poll.closed_at.is_none());
    }

    #[tokio::test]
    async fn test_create_poll_publishes_created_event() {
        let publisher = Arc::new(RecordingPublisher::default());
        let registry = PollRegistryService::with_publisher(
            &RegistryConfig::default(),
            publisher.clone(),
        );

        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        let events = publisher.events.lock().await;
        assert_eq!(
            events.as_slice(),
            [format!("created:1:creator:{QUESTION}:C#,C++,Python,Solidity")]
        );
    }

    #[tokio::test]
    async fn test_create_poll_rejects_empty_candidates() {
        let registry = registry();
        let err = registry
            .create_poll(&voter("creator"), QUESTION, vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(registry.poll_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_poll_rejects_blank_candidate_label() {
        let registry = registry();
        let err = registry
            .create_poll(
                &voter("creator"),
                QUESTION,
                vec!["C#".to_string(), "   ".to_string()],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_poll_rejects_long_question() {
        let registry = registry();
        let question = "q".repeat(501);
        let err = registry
            .create_poll(&voter("creator"), &question, languages())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(registry.poll_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_poll_rejects_long_candidate_label() {
        let registry = registry();
        let err = registry
            .create_poll(
                &voter("creator"),
                QUESTION,
                vec!["C#".to_string(), "c".repeat(101)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(registry.poll_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_poll_rejects_too_many_candidates() {
        let registry = registry();
        let candidates = (0..33).map(|i| format!("candidate {i}")).collect();
        let err = registry
            .create_poll(&voter("creator"), QUESTION, candidates)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_vote_records_choice() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        registry.vote(&voter("creator"), 1, 3).await.unwrap();

        let info = registry.get_voter_info(1, &voter("creator")).await;
        assert!(info.has_voted);
        assert_eq!(info.voted_for, "Solidity");

        let poll = registry.get_poll(1).await.unwrap();
        assert_eq!(poll.vote_counts, vec![0, 0, 0, 1]);
        assert_eq!(poll.voters_count(), 1);
    }

    #[tokio::test]
    async fn test_vote_rejects_missing_poll() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        let err = registry.vote(&voter("alice"), 12, 3).await.unwrap_err();
        assert!(matches!(err, AppError::PollNotFound(12)));

        let err = registry.vote(&voter("alice"), 0, 3).await.unwrap_err();
        assert!(matches!(err, AppError::PollNotFound(0)));
    }

    #[tokio::test]
    async fn test_vote_rejects_invalid_candidate() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        let err = registry.vote(&voter("alice"), 1, 99).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidCandidate {
                poll_id: 1,
                index: 99
            }
        ));

        let err = registry.vote(&voter("alice"), 1, -1).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCandidate { .. }));

        // Nothing was recorded
        let info = registry.get_voter_info(1, &voter("alice")).await;
        assert!(!info.has_voted);
    }

    #[tokio::test]
    async fn test_vote_rejects_double_vote() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        registry.vote(&voter("alice"), 1, 3).await.unwrap();
        let err = registry.vote(&voter("alice"), 1, 2).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyVoted(1)));

        // Double voting is rejected even with an invalid candidate index
        let err = registry.vote(&voter("alice"), 1, 99).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyVoted(1)));

        let poll = registry.get_poll(1).await.unwrap();
        assert_eq!(poll.vote_counts, vec![0, 0, 0, 1]);
    }

    #[tokio::test]
    async fn test_vote_rejects_closed_poll() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();
        registry.close_voting(&voter("creator"), 1).await.unwrap();

        let err = registry.vote(&voter("alice"), 1, 3).await.unwrap_err();
        assert!(matches!(err, AppError::PollClosed(1)));

        // Closed-state rejection takes precedence over candidate validity
        let err = registry.vote(&voter("alice"), 1, 99).await.unwrap_err();
        assert!(matches!(err, AppError::PollClosed(1)));
    }

    #[tokio::test]
    async fn test_same_voter_may_vote_on_different_polls() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        registry.vote(&voter("alice"), 1, 0).await.unwrap();
        registry.vote(&voter("alice"), 2, 1).await.unwrap();

        assert_eq!(registry.get_voter_info(1, &voter("alice")).await.voted_for, "C#");
        assert_eq!(
            registry.get_voter_info(2, &voter("alice")).await.voted_for,
            "C++"
        );
    }

    #[tokio::test]
    async fn test_close_computes_winner() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        registry.vote(&voter("alice"), 1, 2).await.unwrap();
        registry.vote(&voter("bob"), 1, 2).await.unwrap();
        registry.vote(&voter("carol"), 1, 3).await.unwrap();

        let poll = registry.close_voting(&voter("creator"), 1).await.unwrap();
        assert!(!poll.is_open);
        assert_eq!(poll.winner, "Python");
        assert!(poll.closed_at.is_some());

        // Frozen state is visible through reads
        let poll = registry.get_poll(1).await.unwrap();
        assert_eq!(poll.winner, "Python");
        assert!(!poll.is_open);
    }

    #[tokio::test]
    async fn test_close_tie_break_prefers_lowest_index() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        registry.vote(&voter("alice"), 1, 3).await.unwrap();
        registry.vote(&voter("bob"), 1, 1).await.unwrap();

        let poll = registry.close_voting(&voter("creator"), 1).await.unwrap();
        assert_eq!(poll.winner, "C++");
    }

    #[tokio::test]
    async fn test_close_without_votes_picks_first_candidate() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        let poll = registry.close_voting(&voter("creator"), 1).await.unwrap();
        assert_eq!(poll.winner, "C#");
    }

    #[tokio::test]
    async fn test_close_rejects_missing_poll() {
        let registry = registry();
        let err = registry
            .close_voting(&voter("creator"), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PollNotFound(7)));
    }

    #[tokio::test]
    async fn test_close_rejects_non_owner() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        let err = registry.close_voting(&voter("mallory"), 1).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let poll = registry.get_poll(1).await.unwrap();
        assert!(poll.is_open);
    }

    #[tokio::test]
    async fn test_close_rejects_already_closed() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();
        registry.close_voting(&voter("creator"), 1).await.unwrap();

        let err = registry
            .close_voting(&voter("creator"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyClosed(1)));
    }

    #[tokio::test]
    async fn test_reads_are_pure() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();
        registry.vote(&voter("alice"), 1, 3).await.unwrap();

        let first = registry.get_poll(1).await.unwrap();
        let second = registry.get_poll(1).await.unwrap();
        assert_eq!(first, second);

        let first = registry.get_voter_info(1, &voter("alice")).await;
        let second = registry.get_voter_info(1, &voter("alice")).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_voter_info_tolerates_missing_poll_and_voter() {
        let registry = registry();
        let info = registry.get_voter_info(42, &voter("alice")).await;
        assert!(!info.has_voted);
        assert_eq!(info.voted_for, "");

        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();
        let info = registry.get_voter_info(1, &voter("alice")).await;
        assert!(!info.has_voted);
        assert_eq!(info.voted_for, "");
    }

    #[tokio::test]
    async fn test_events_for_vote_and_close() {
        let publisher = Arc::new(RecordingPublisher::default());
        let registry = PollRegistryService::with_publisher(
            &RegistryConfig::default(),
            publisher.clone(),
        );

        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();
        registry.vote(&voter("alice"), 1, 3).await.unwrap();
        registry.close_voting(&voter("creator"), 1).await.unwrap();

        let events = publisher.events.lock().await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], "voted:1:alice");
        assert_eq!(events[2], "closed:1:Solidity");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_votes_from_distinct_voters_all_land() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..50 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry
                    .vote(&voter(&format!("voter-{i}")), 1, i64::from(i % 4))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let poll = registry.get_poll(1).await.unwrap();
        assert_eq!(poll.voters_count(), 50);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_votes_from_same_voter_land_once() {
        let registry = registry();
        registry
            .create_poll(&voter("creator"), QUESTION, languages())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let registry = registry.clone();
            handles.push(tokio::spawn(
                async move { registry.vote(&voter("alice"), 1, 0).await },
            ));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);

        let poll = registry.get_poll(1).await.unwrap();
        assert_eq!(poll.voters_count(), 1);
    }
}
