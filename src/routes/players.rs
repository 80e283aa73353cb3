use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        leaderboard::{FriendsRequest, HighScoreResponse, LeaderboardResponse, RankResponse, RemovedResponse},
        player::PlayerProfileDto,
        validation::validate_key_part,
    },
    error::AppError,
    services::{leaderboard_service, player_service},
    state::SharedState,
};

/// Player profile endpoints and per-player leaderboard queries.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games/{namespace}/players", put(store_player))
        .route(
            "/games/{namespace}/players/{player_id}",
            get(get_player).delete(delete_player),
        )
        .route(
            "/games/{namespace}/players/{player_id}/high-score",
            get(get_high_score),
        )
        .route("/games/{namespace}/players/{player_id}/rank", get(get_rank))
        .route(
            "/games/{namespace}/players/{player_id}/friends",
            post(score_of_friends),
        )
}

/// Return the stored profile blob of a player as is.
#[utoipa::path(
    get,
    path = "/games/{namespace}/players/{player_id}",
    tag = "players",
    params(
        ("namespace" = String, Path, description = "Game namespace"),
        ("player_id" = String, Path, description = "Player identifier")
    ),
    responses(
        (status = 200, description = "Stored profile", body = PlayerProfileDto),
        (status = 404, description = "No profile stored for this player")
    )
)]
pub async fn get_player(
    State(state): State<SharedState>,
    Path((namespace, player_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    validate_key_part("namespace", &namespace)?;
    validate_key_part("player id", &player_id)?;

    match player_service::get_player_data(&state, &namespace, &player_id).await? {
        Some(blob) => Ok(super::json_body(blob)),
        None => Err(AppError::NotFound(format!("player `{player_id}`"))),
    }
}

/// Store or replace a player profile.
#[utoipa::path(
    put,
    path = "/games/{namespace}/players",
    tag = "players",
    params(("namespace" = String, Path, description = "Game namespace")),
    request_body = PlayerProfileDto,
    responses(
        (status = 204, description = "Profile stored"),
        (status = 400, description = "Invalid profile")
    )
)]
pub async fn store_player(
    State(state): State<SharedState>,
    Path(namespace): Path<String>,
    Valid(Json(payload)): Valid<Json<PlayerProfileDto>>,
) -> Result<StatusCode, AppError> {
    validate_key_part("namespace", &namespace)?;
    validate_key_part("player id", &payload.player_id)?;
    player_service::store_player_data(&state, &namespace, payload.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a player profile. Leaderboard entries are kept.
#[utoipa::path(
    delete,
    path = "/games/{namespace}/players/{player_id}",
    tag = "players",
    params(
        ("namespace" = String, Path, description = "Game namespace"),
        ("player_id" = String, Path, description = "Player identifier")
    ),
    responses((status = 200, description = "Number of removed profiles", body = RemovedResponse))
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    Path((namespace, player_id)): Path<(String, String)>,
) -> Result<Json<RemovedResponse>, AppError> {
    validate_key_part("namespace", &namespace)?;
    validate_key_part("player id", &player_id)?;

    let removed = player_service::delete_player_data(&state, &namespace, &player_id).await?;
    Ok(Json(RemovedResponse { removed }))
}

/// Personal best recorded in the player's profile.
#[utoipa::path(
    get,
    path = "/games/{namespace}/players/{player_id}/high-score",
    tag = "players",
    params(
        ("namespace" = String, Path, description = "Game namespace"),
        ("player_id" = String, Path, description = "Player identifier")
    ),
    responses(
        (status = 200, description = "High score", body = HighScoreResponse),
        (status = 404, description = "No profile stored for this player")
    )
)]
pub async fn get_high_score(
    State(state): State<SharedState>,
    Path((namespace, player_id)): Path<(String, String)>,
) -> Result<Json<HighScoreResponse>, AppError> {
    validate_key_part("namespace", &namespace)?;
    validate_key_part("player id", &player_id)?;

    match player_service::get_high_score(&state, &namespace, &player_id).await? {
        Some(score) => Ok(Json(HighScoreResponse { score })),
        None => Err(AppError::NotFound(format!("player `{player_id}`"))),
    }
}

/// One-based global rank, -1 when the player has no score.
#[utoipa::path(
    get,
    path = "/games/{namespace}/players/{player_id}/rank",
    tag = "leaderboard",
    params(
        ("namespace" = String, Path, description = "Game namespace"),
        ("player_id" = String, Path, description = "Player identifier")
    ),
    responses((status = 200, description = "Global rank", body = RankResponse))
)]
pub async fn get_rank(
    State(state): State<SharedState>,
    Path((namespace, player_id)): Path<(String, String)>,
) -> Result<Json<RankResponse>, AppError> {
    validate_key_part("namespace", &namespace)?;
    validate_key_part("player id", &player_id)?;

    let rank = leaderboard_service::rank(&state, &namespace, &player_id).await;
    Ok(Json(RankResponse { rank }))
}

/// Scores of the player followed by each friend, in request order.
#[utoipa::path(
    post,
    path = "/games/{namespace}/players/{player_id}/friends",
    tag = "leaderboard",
    params(
        ("namespace" = String, Path, description = "Game namespace"),
        ("player_id" = String, Path, description = "Player identifier")
    ),
    request_body = FriendsRequest,
    responses((status = 200, description = "Player and friend scores", body = LeaderboardResponse))
)]
pub async fn score_of_friends(
    State(state): State<SharedState>,
    Path((namespace, player_id)): Path<(String, String)>,
    Valid(Json(payload)): Valid<Json<FriendsRequest>>,
) -> Result<Response, AppError> {
    validate_key_part("namespace", &namespace)?;
    validate_key_part("player id", &player_id)?;

    let body = leaderboard_service::score_of_friends_json(
        &state,
        &namespace,
        &player_id,
        &payload.friend_ids,
    )
    .await;
    Ok(super::json_body(body))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::ranked_store::{RankedStore, memory::MemoryRankedStore},
        services::{buckets::Clock, outcome_log::OutcomeSink, score_service},
        state::AppState,
    };

    async fn state_with_store() -> SharedState {
        let (outcomes, _rx) = OutcomeSink::channel(16);
        let state = AppState::with_parts(AppConfig::default(), Clock::System, outcomes);
        state
            .install_ranked_store(Arc::new(MemoryRankedStore::new()) as Arc<dyn RankedStore>)
            .await;
        state
    }

    fn profile(id: &str) -> PlayerProfileDto {
        serde_json::from_value(serde_json::json!({"playerId": id, "nickname": "ace"})).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn stored_profile_is_returned_verbatim() {
        let state = state_with_store().await;
        let status = store_player(
            State(state.clone()),
            Path("g".into()),
            Valid(Json(profile("p1"))),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let response = get_player(State(state), Path(("g".into(), "p1".into())))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["playerId"], "p1");
        assert_eq!(body["nickname"], "ace");
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let state = state_with_store().await;
        let err = get_player(State(state), Path(("g".into(), "ghost".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_namespace_is_rejected() {
        let state = state_with_store().await;
        let err = get_rank(State(state), Path(("  ".into(), "p1".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn blank_profile_id_is_rejected() {
        let state = state_with_store().await;
        let err = store_player(
            State(state.clone()),
            Path("g".into()),
            Valid(Json(profile("   "))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(
            player_service::get_player_data(&state, "g", "   ").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn rank_of_unknown_player_is_minus_one() {
        let state = state_with_store().await;
        let Json(response) = get_rank(State(state), Path(("g".into(), "ghost".into())))
            .await
            .unwrap();
        assert_eq!(response.rank, -1);
    }

    #[tokio::test]
    async fn friends_route_answers_wire_format() {
        let state = state_with_store().await;
        store_player(State(state.clone()), Path("g".into()), Valid(Json(profile("p1"))))
            .await
            .unwrap();
        score_service::submit_score(&state, "g", "p1", 42.0)
            .await
            .unwrap();

        let response = score_of_friends(
            State(state),
            Path(("g".into(), "p1".into())),
            Valid(Json(FriendsRequest {
                friend_ids: vec!["f1".into()],
            })),
        )
        .await
        .unwrap();
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"playerIds": ["p1", "f1"], "scores": [42.0, -1.0]})
        );
    }

    #[tokio::test]
    async fn deleting_profile_keeps_rank() {
        let state = state_with_store().await;
        store_player(State(state.clone()), Path("g".into()), Valid(Json(profile("p1"))))
            .await
            .unwrap();
        score_service::submit_score(&state, "g", "p1", 10.0)
            .await
            .unwrap();

        let Json(removed) = delete_player(State(state.clone()), Path(("g".into(), "p1".into())))
            .await
            .unwrap();
        assert_eq!(removed.removed, 1);

        let Json(rank) = get_rank(State(state), Path(("g".into(), "p1".into())))
            .await
            .unwrap();
        assert_eq!(rank.rank, 1);
    }
}
