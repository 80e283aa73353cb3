use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the leaderboard backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::players::get_player,
        crate::routes::players::store_player,
        crate::routes::players::delete_player,
        crate::routes::players::get_high_score,
        crate::routes::players::get_rank,
        crate::routes::players::score_of_friends,
        crate::routes::leaderboard::submit_score,
        crate::routes::leaderboard::delete_score,
        crate::routes::leaderboard::top,
        crate::routes::leaderboard::top_for_bucket,
        crate::routes::leaderboard::current_bucket_top,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::player::PlayerProfileDto,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::leaderboard::SubmitScoreRequest,
            crate::dto::leaderboard::SubmitScoreResponse,
            crate::dto::leaderboard::FriendsRequest,
            crate::dto::leaderboard::RankResponse,
            crate::dto::leaderboard::HighScoreResponse,
            crate::dto::leaderboard::RemovedResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "players", description = "Player profile storage"),
        (name = "leaderboard", description = "Score submission and ranked queries"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_game_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/games/{namespace}/scores",
            "/games/{namespace}/leaderboard/bucket",
            "/games/{namespace}/players/{player_id}/friends",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
