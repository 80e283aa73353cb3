use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Response,
    routing::{delete, get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        leaderboard::{
            BucketTopQuery, LeaderboardResponse, RemovedResponse, SubmitScoreRequest,
            SubmitScoreResponse, TopQuery,
        },
        validation::validate_key_part,
    },
    error::AppError,
    services::{
        leaderboard_service,
        score_service::{self, ScoreOutcome},
    },
    state::SharedState,
};

/// Score submission and top-N leaderboard endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games/{namespace}/scores", post(submit_score))
        .route("/games/{namespace}/scores/{player_id}", delete(delete_score))
        .route("/games/{namespace}/leaderboard", get(top))
        .route("/games/{namespace}/leaderboard/bucket", get(top_for_bucket))
        .route("/games/{namespace}/leaderboard/current", get(current_bucket_top))
}

/// Submit a score; it is kept only when it beats the player's high score.
#[utoipa::path(
    post,
    path = "/games/{namespace}/scores",
    tag = "leaderboard",
    params(("namespace" = String, Path, description = "Game namespace")),
    request_body = SubmitScoreRequest,
    responses(
        (status = 200, description = "Submission handled", body = SubmitScoreResponse),
        (status = 404, description = "Player has no profile"),
        (status = 503, description = "Store unavailable or partial write")
    )
)]
pub async fn submit_score(
    State(state): State<SharedState>,
    Path(namespace): Path<String>,
    Valid(Json(payload)): Valid<Json<SubmitScoreRequest>>,
) -> Result<Json<SubmitScoreResponse>, AppError> {
    validate_key_part("namespace", &namespace)?;
    validate_key_part("player id", &payload.player_id)?;

    let outcome =
        score_service::submit_score(&state, &namespace, &payload.player_id, payload.score).await?;
    let response = match outcome {
        ScoreOutcome::Accepted { previous } => SubmitScoreResponse {
            accepted: true,
            previous,
        },
        ScoreOutcome::Unchanged { current } => SubmitScoreResponse {
            accepted: false,
            previous: Some(current),
        },
    };
    Ok(Json(response))
}

/// Remove a player from the global leaderboard. Time buckets keep their entries.
#[utoipa::path(
    delete,
    path = "/games/{namespace}/scores/{player_id}",
    tag = "leaderboard",
    params(
        ("namespace" = String, Path, description = "Game namespace"),
        ("player_id" = String, Path, description = "Player identifier")
    ),
    responses((status = 200, description = "Number of removed entries", body = RemovedResponse))
)]
pub async fn delete_score(
    State(state): State<SharedState>,
    Path((namespace, player_id)): Path<(String, String)>,
) -> Result<Json<RemovedResponse>, AppError> {
    validate_key_part("namespace", &namespace)?;
    validate_key_part("player id", &player_id)?;

    let removed = score_service::delete_score(&state, &namespace, &player_id).await?;
    Ok(Json(RemovedResponse {
        removed: u64::from(removed),
    }))
}

/// Highest scores of the global leaderboard.
#[utoipa::path(
    get,
    path = "/games/{namespace}/leaderboard",
    tag = "leaderboard",
    params(("namespace" = String, Path, description = "Game namespace"), TopQuery),
    responses((status = 200, description = "Top entries, highest first", body = LeaderboardResponse))
)]
pub async fn top(
    State(state): State<SharedState>,
    Path(namespace): Path<String>,
    Valid(Query(query)): Valid<Query<TopQuery>>,
) -> Result<Response, AppError> {
    validate_key_part("namespace", &namespace)?;
    let body = leaderboard_service::top_json(&state, &namespace, query.count()).await;
    Ok(super::json_body(body))
}

/// Highest scores of a past or current time bucket.
#[utoipa::path(
    get,
    path = "/games/{namespace}/leaderboard/bucket",
    tag = "leaderboard",
    params(("namespace" = String, Path, description = "Game namespace"), BucketTopQuery),
    responses((status = 200, description = "Top entries of the bucket, highest first", body = LeaderboardResponse))
)]
pub async fn top_for_bucket(
    State(state): State<SharedState>,
    Path(namespace): Path<String>,
    Valid(Query(query)): Valid<Query<BucketTopQuery>>,
) -> Result<Response, AppError> {
    validate_key_part("namespace", &namespace)?;
    let body =
        leaderboard_service::top_bucket_json(&state, &namespace, query.count(), query.days_old)
            .await;
    Ok(super::json_body(body))
}

/// Highest scores of the bucket currently receiving submissions.
#[utoipa::path(
    get,
    path = "/games/{namespace}/leaderboard/current",
    tag = "leaderboard",
    params(("namespace" = String, Path, description = "Game namespace")),
    responses((status = 200, description = "Top entries of the current bucket", body = LeaderboardResponse))
)]
pub async fn current_bucket_top(
    State(state): State<SharedState>,
    Path(namespace): Path<String>,
) -> Result<Response, AppError> {
    validate_key_part("namespace", &namespace)?;
    let body = leaderboard_service::current_bucket_top_json(&state, &namespace).await;
    Ok(super::json_body(body))
}
