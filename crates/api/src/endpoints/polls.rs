//! Poll endpoints.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use validator::Validate;
use voteboard_common::{AppError, AppResult};
use voteboard_core::{Poll, VoterIdentity};

use crate::{
    extractors::{AuthVoter, MaybeAuthVoter},
    middleware::AppState,
    response::{self, ApiResponse},
    sse,
};

/// Poll response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: u64,
    pub owner: String,
    pub question: String,
    pub candidates: Vec<String>,
    pub winner: String,
    pub is_open: bool,
    pub vote_counts: Vec<u64>,
    pub voters_count: u64,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
}

impl From<Poll> for PollResponse {
    fn from(poll: Poll) -> Self {
        let voters_count = poll.voters_count();
        Self {
            id: poll.id,
            owner: poll.owner.to_string(),
            question: poll.question,
            candidates: poll.candidates,
            winner: poll.winner,
            is_open: poll.is_open,
            vote_counts: poll.vote_counts,
            voters_count,
            created_at: poll.created_at.to_rfc3339(),
            closed_at: poll.closed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Create poll request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    #[validate(length(min = 1, message = "question cannot be empty"))]
    pub question: String,
    #[validate(length(min = 1, message = "at least one candidate is required"))]
    pub candidates: Vec<String>,
}

/// Create poll response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollResponse {
    pub poll_id: u64,
}

/// Create a new poll owned by the caller.
async fn create_poll(
    AuthVoter(owner): AuthVoter,
    State(state): State<AppState>,
    Json(req): Json<CreatePollRequest>,
) -> AppResult<ApiResponse<CreatePollResponse>> {
    req.validate()?;

    let poll_id = state
        .registry
        .create_poll(&owner, &req.question, req.candidates)
        .await?;

    Ok(ApiResponse::ok(CreatePollResponse { poll_id }))
}

/// Show poll request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowPollRequest {
    pub poll_id: u64,
}

/// Get poll details.
async fn show_poll(
    State(state): State<AppState>,
    Json(req): Json<ShowPollRequest>,
) -> AppResult<ApiResponse<PollResponse>> {
    let poll = state.registry.get_poll(req.poll_id).await?;
    Ok(ApiResponse::ok(poll.into()))
}

/// Vote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub poll_id: u64,
    pub candidate_index: i64,
}

/// Cast the caller's vote on a poll.
async fn vote(
    AuthVoter(voter): AuthVoter,
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .registry
        .vote(&voter, req.poll_id, req.candidate_index)
        .await?;
    Ok(response::ok())
}

/// Close voting request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseVotingRequest {
    pub poll_id: u64,
}

/// Close voting on a poll the caller owns.
async fn close_voting(
    AuthVoter(caller): AuthVoter,
    State(state): State<AppState>,
    Json(req): Json<CloseVotingRequest>,
) -> AppResult<ApiResponse<PollResponse>> {
    let poll = state.registry.close_voting(&caller, req.poll_id).await?;
    Ok(ApiResponse::ok(poll.into()))
}

/// Voter info request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterInfoRequest {
    pub poll_id: u64,
    /// Voter to query; defaults to the caller.
    #[serde(default)]
    pub voter_id: Option<String>,
}

/// Voter info response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterInfoResponse {
    pub has_voted: bool,
    pub voted_for: String,
}

/// Get a voter's status on a poll.
async fn voter_info(
    MaybeAuthVoter(caller): MaybeAuthVoter,
    State(state): State<AppState>,
    Json(req): Json<VoterInfoRequest>,
) -> AppResult<ApiResponse<VoterInfoResponse>> {
    let voter = match req.voter_id {
        Some(id) => VoterIdentity::from(id),
        None => caller.ok_or_else(|| {
            AppError::BadRequest("voterId is required when unauthenticated".to_string())
        })?,
    };

    let info = state.registry.get_voter_info(req.poll_id, &voter).await;
    Ok(ApiResponse::ok(VoterInfoResponse {
        has_voted: info.has_voted,
        voted_for: info.voted_for,
    }))
}

/// Poll count response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollCountResponse {
    pub count: u64,
}

/// Get the total number of polls ever created.
async fn poll_count(State(state): State<AppState>) -> AppResult<ApiResponse<PollCountResponse>> {
    let count = state.registry.poll_count().await;
    Ok(ApiResponse::ok(PollCountResponse { count }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_poll))
        .route("/show", post(show_poll))
        .route("/vote", post(vote))
        .route("/close", post(close_voting))
        .route("/voter", post(voter_info))
        .route("/count", post(poll_count))
        .route("/stream", get(sse::event_stream))
}
