//! Read side of the leaderboards: top-N views, ranks and friends comparisons.
//!
//! Read paths prefer a degraded answer to an error. Store failures turn into an empty
//! response or the `-1` rank sentinel and are reported through the outcome log.

use futures::future::join_all;

use crate::{
    dto::leaderboard::LeaderboardResponse,
    error::ServiceError,
    services::outcome_log::OutcomeRecord,
    state::SharedState,
};

/// Rank reported for players without a global-view entry or when the store fails.
pub const UNKNOWN_RANK: i64 = -1;
/// Score reported for friends without a recorded score.
pub const MISSING_SCORE: f64 = -1.0;

/// Top `count` entries of the global view, highest first. Empty on store failure.
pub async fn top(state: &SharedState, namespace: &str, count: usize) -> LeaderboardResponse {
    top_of_set(state, "top", namespace, namespace.to_owned(), count).await
}

/// Top `count` entries of the bucket `days_old` days back.
///
/// Lookbacks outside the retention window answer an empty response.
pub async fn top_for_bucket(
    state: &SharedState,
    namespace: &str,
    count: usize,
    days_old: u32,
) -> LeaderboardResponse {
    if let Err(err) = check_bucket_window(state, days_old) {
        degraded(state, "top_for_bucket", namespace, &err);
        return LeaderboardResponse::default();
    }

    let key = state.calendar().key_for(namespace, days_old);
    top_of_set(state, "top_for_bucket", namespace, key, count).await
}

/// Top entries of the bucket currently receiving scores, sized by configuration.
pub async fn current_bucket_top(state: &SharedState, namespace: &str) -> LeaderboardResponse {
    let count = state.config().leaderboard.bucket_top_count;
    top_for_bucket(state, namespace, count, 0).await
}

/// Fail with [`ServiceError::InvalidRange`] when `days_old` is outside the retention window.
pub fn check_bucket_window(state: &SharedState, days_old: u32) -> Result<(), ServiceError> {
    let retention_days = state.config().leaderboard.retention_days;
    if days_old >= retention_days {
        return Err(ServiceError::InvalidRange {
            days_old,
            retention_days,
        });
    }
    Ok(())
}

/// One-based global rank of `player_id`, or [`UNKNOWN_RANK`].
pub async fn rank(state: &SharedState, namespace: &str, player_id: &str) -> i64 {
    let store = match state.require_ranked_store().await {
        Ok(store) => store,
        Err(err) => {
            degraded(state, "rank", namespace, &err);
            return UNKNOWN_RANK;
        }
    };

    match store
        .set_rank(namespace.to_owned(), player_id.to_owned())
        .await
    {
        Ok(Some(rank)) => i64::try_from(rank).map_or(UNKNOWN_RANK, |rank| rank + 1),
        Ok(None) => UNKNOWN_RANK,
        Err(err) => {
            degraded(state, "rank", namespace, &ServiceError::from(err));
            UNKNOWN_RANK
        }
    }
}

/// Global-view scores of `player_id` followed by each friend, in input order.
///
/// The querying player must have a score. Friends without one, or whose lookup fails, are
/// reported with [`MISSING_SCORE`].
pub async fn score_of_friends(
    state: &SharedState,
    namespace: &str,
    player_id: &str,
    friend_ids: &[String],
) -> Result<LeaderboardResponse, ServiceError> {
    let store = state.require_ranked_store().await?;

    let Some(player_score) = store
        .set_score(namespace.to_owned(), player_id.to_owned())
        .await?
    else {
        return Err(ServiceError::PlayerNotFound(player_id.to_owned()));
    };

    let lookups = friend_ids
        .iter()
        .map(|friend| store.set_score(namespace.to_owned(), friend.clone()));
    let friend_scores = join_all(lookups).await;

    let mut response = LeaderboardResponse::with_capacity(friend_ids.len() + 1);
    response.push(player_id, player_score);
    for (friend, lookup) in friend_ids.iter().zip(friend_scores) {
        let score = match lookup {
            Ok(score) => score.unwrap_or(MISSING_SCORE),
            Err(err) => {
                degraded(state, "score_of_friends", namespace, &ServiceError::from(err));
                MISSING_SCORE
            }
        };
        response.push(friend.as_str(), score);
    }
    Ok(response)
}

/// Serialized [`top`].
pub async fn top_json(state: &SharedState, namespace: &str, count: usize) -> String {
    top(state, namespace, count).await.to_wire()
}

/// Serialized [`top_for_bucket`].
pub async fn top_bucket_json(
    state: &SharedState,
    namespace: &str,
    count: usize,
    days_old: u32,
) -> String {
    top_for_bucket(state, namespace, count, days_old)
        .await
        .to_wire()
}

/// Serialized [`current_bucket_top`].
pub async fn current_bucket_top_json(state: &SharedState, namespace: &str) -> String {
    current_bucket_top(state, namespace).await.to_wire()
}

/// Serialized [`score_of_friends`]; a failed call serializes the empty response.
pub async fn score_of_friends_json(
    state: &SharedState,
    namespace: &str,
    player_id: &str,
    friend_ids: &[String],
) -> String {
    match score_of_friends(state, namespace, player_id, friend_ids).await {
        Ok(response) => response.to_wire(),
        Err(err) => {
            degraded(state, "score_of_friends", namespace, &err);
            LeaderboardResponse::default().to_wire()
        }
    }
}

async fn top_of_set(
    state: &SharedState,
    operation: &'static str,
    namespace: &str,
    set: String,
    count: usize,
) -> LeaderboardResponse {
    if count == 0 {
        return LeaderboardResponse::default();
    }

    let store = match state.require_ranked_store().await {
        Ok(store) => store,
        Err(err) => {
            degraded(state, operation, namespace, &err);
            return LeaderboardResponse::default();
        }
    };

    match store.set_top(set, count).await {
        Ok(entries) => entries.into(),
        Err(err) => {
            degraded(state, operation, namespace, &ServiceError::from(err));
            LeaderboardResponse::default()
        }
    }
}

fn degraded(state: &SharedState, operation: &'static str, namespace: &str, err: &ServiceError) {
    state.outcomes().record(OutcomeRecord::QueryDegraded {
        operation,
        namespace: namespace.to_owned(),
        reason: err.to_string(),
    });
}
