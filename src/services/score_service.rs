//! Score submission: decides whether an incoming score becomes the new high score and fans
//! the accepted value out to the profile blob, the current time bucket and the global view.
//!
//! Submissions for one player are serialized in-process by [`SubmissionLocks`], so the
//! read-compare-write sequence cannot interleave locally. Two processes sharing a store can
//! still race on the profile blob (last writer wins there), but both leaderboard views are
//! written with `set_add_if_greater` and always converge to the highest submitted score.
//!
//! The fan-out writes target independent keys and are not transactional. The profile and the
//! current bucket are written first; the global view, which decides whether a later
//! submission is a no-op, is only raised once both succeeded. A failed submission therefore
//! leaves the comparison open and resubmitting the same score repairs every view.
//!
//! [`SubmissionLocks`]: crate::state::submissions::SubmissionLocks

use tracing::warn;

use crate::{
    dao::{models::PlayerProfile, storage::StorageResult},
    error::{FanOutTarget, ServiceError},
    services::{outcome_log::OutcomeRecord, player_service::load_profile},
    state::SharedState,
};

/// Result of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    /// The score became the new high score. `previous` is the global-view score it replaced.
    Accepted { previous: Option<f64> },
    /// The score did not beat `current`; nothing was written.
    Unchanged { current: f64 },
}

impl ScoreOutcome {
    /// Whether the submission changed any stored state.
    pub fn is_accepted(&self) -> bool {
        matches!(self, ScoreOutcome::Accepted { .. })
    }
}

/// Submit `score` for `player_id`, keeping it only if it beats the stored high score.
pub async fn submit_score(
    state: &SharedState,
    namespace: &str,
    player_id: &str,
    score: f64,
) -> Result<ScoreOutcome, ServiceError> {
    let result = apply_submission(state, namespace, player_id, score).await;
    match &result {
        Ok(ScoreOutcome::Accepted { previous }) => {
            state.outcomes().record(OutcomeRecord::ScoreAccepted {
                namespace: namespace.to_owned(),
                player_id: player_id.to_owned(),
                previous: *previous,
                score,
            });
        }
        Ok(ScoreOutcome::Unchanged { current }) => {
            state.outcomes().record(OutcomeRecord::ScoreUnchanged {
                namespace: namespace.to_owned(),
                player_id: player_id.to_owned(),
                current: *current,
                submitted: score,
            });
        }
        Err(err) => {
            state.outcomes().record(OutcomeRecord::ScoreRejected {
                namespace: namespace.to_owned(),
                player_id: player_id.to_owned(),
                score,
                reason: err.to_string(),
            });
        }
    }
    result
}

async fn apply_submission(
    state: &SharedState,
    namespace: &str,
    player_id: &str,
    score: f64,
) -> Result<ScoreOutcome, ServiceError> {
    if !score.is_finite() {
        return Err(ServiceError::InvalidInput(
            "score must be a finite number".into(),
        ));
    }

    let store = state.require_ranked_store().await?;
    let profile_key = PlayerProfile::storage_key(namespace, player_id);
    let _turn = state.submissions().acquire(profile_key.clone()).await;

    let current = store
        .set_score(namespace.to_owned(), player_id.to_owned())
        .await?;
    if let Some(current) = current.filter(|current| score <= *current) {
        return Ok(ScoreOutcome::Unchanged { current });
    }

    let Some(mut profile) = load_profile(&store, namespace, player_id).await? else {
        return Err(ServiceError::PlayerNotFound(player_id.to_owned()));
    };
    profile.high_score = score;
    let encoded = profile.encode().map_err(ServiceError::Serialization)?;

    let bucket_key = state.calendar().current_key(namespace);
    let (profile_write, bucket_write) = tokio::join!(
        store.put(profile_key, encoded),
        store.set_add_if_greater(bucket_key, player_id.to_owned(), score),
    );

    let mut failed = Vec::new();
    let mut first_error = None;
    let writes: [(FanOutTarget, StorageResult<()>); 2] = [
        (FanOutTarget::Profile, profile_write),
        (FanOutTarget::BucketView, bucket_write.map(drop)),
    ];
    for (target, write) in writes {
        if let Err(err) = write {
            warn!(%namespace, %player_id, %target, error = %err, "score fan-out write failed");
            failed.push(target);
            first_error.get_or_insert(err);
        }
    }
    if let Some(source) = first_error {
        return Err(ServiceError::FanOut { failed, source });
    }

    if let Err(source) = store
        .set_add_if_greater(namespace.to_owned(), player_id.to_owned(), score)
        .await
    {
        let target = FanOutTarget::GlobalView;
        warn!(%namespace, %player_id, %target, error = %source, "score fan-out write failed");
        return Err(ServiceError::FanOut {
            failed: vec![target],
            source,
        });
    }

    Ok(ScoreOutcome::Accepted { previous: current })
}

/// Remove `player_id` from the global view only. Time buckets and the profile keep their
/// values. Returns whether the player was present.
pub async fn delete_score(
    state: &SharedState,
    namespace: &str,
    player_id: &str,
) -> Result<bool, ServiceError> {
    let store = state.require_ranked_store().await?;
    let removed = store
        .set_remove(namespace.to_owned(), player_id.to_owned())
        .await?;

    state.outcomes().record(OutcomeRecord::ScoreDeleted {
        namespace: namespace.to_owned(),
        player_id: player_id.to_owned(),
        removed,
    });
    Ok(removed)
}
