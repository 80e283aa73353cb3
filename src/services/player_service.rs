//! Player profile storage: the plain key/value side of the ranked store.

use std::sync::Arc;

use crate::{
    dao::{models::PlayerProfile, ranked_store::RankedStore},
    error::ServiceError,
    state::SharedState,
};

/// Return the raw stored profile blob, or `None` when the player has no profile.
pub async fn get_player_data(
    state: &SharedState,
    namespace: &str,
    player_id: &str,
) -> Result<Option<String>, ServiceError> {
    let store = state.require_ranked_store().await?;
    Ok(store
        .get(PlayerProfile::storage_key(namespace, player_id))
        .await?)
}

/// Store a profile under `namespace + profile.id`, replacing any previous blob.
pub async fn store_player_data(
    state: &SharedState,
    namespace: &str,
    profile: PlayerProfile,
) -> Result<(), ServiceError> {
    if !profile.high_score.is_finite() {
        return Err(ServiceError::InvalidInput(
            "high score must be a finite number".into(),
        ));
    }

    let store = state.require_ranked_store().await?;
    let encoded = profile.encode().map_err(ServiceError::Serialization)?;
    store
        .put(PlayerProfile::storage_key(namespace, &profile.id), encoded)
        .await?;
    Ok(())
}

/// Delete the profile blob and return how many keys were removed. Leaderboard views are not
/// touched; use [`crate::services::score_service::delete_score`] for the global view.
pub async fn delete_player_data(
    state: &SharedState,
    namespace: &str,
    player_id: &str,
) -> Result<u64, ServiceError> {
    let store = state.require_ranked_store().await?;
    Ok(store
        .delete(PlayerProfile::storage_key(namespace, player_id))
        .await?)
}

/// High score recorded in the player's profile, or `None` without a profile.
///
/// Read from the profile rather than the global view, so removing a player from the global
/// leaderboard does not erase their personal best.
pub async fn get_high_score(
    state: &SharedState,
    namespace: &str,
    player_id: &str,
) -> Result<Option<f64>, ServiceError> {
    let store = state.require_ranked_store().await?;
    let profile = load_profile(&store, namespace, player_id).await?;
    Ok(profile.map(|profile| profile.high_score))
}

pub(crate) async fn load_profile(
    store: &Arc<dyn RankedStore>,
    namespace: &str,
    player_id: &str,
) -> Result<Option<PlayerProfile>, ServiceError> {
    let key = PlayerProfile::storage_key(namespace, player_id);
    let Some(raw) = store.get(key.clone()).await? else {
        return Ok(None);
    };
    PlayerProfile::decode(&raw)
        .map(Some)
        .map_err(|source| ServiceError::CorruptProfile { key, source })
}
