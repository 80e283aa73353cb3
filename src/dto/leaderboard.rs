//! Leaderboard wire shapes: the ranked response assembled from store results and the request
//! payloads of the score routes.

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dao::models::RankedEntry;

/// Body returned in place of a response that could not be serialized.
pub const SERIALIZATION_ERROR_BODY: &str = "json error";
/// Entry count used when a top query does not specify one.
pub const DEFAULT_TOP_COUNT: usize = 10;
/// Largest entry count a single top query may request.
pub const MAX_TOP_COUNT: usize = 10_000;

/// Ranked player ids and their scores as two index-aligned arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    player_ids: Vec<String>,
    scores: Vec<f64>,
}

impl LeaderboardResponse {
    /// Empty response with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            player_ids: Vec::with_capacity(capacity),
            scores: Vec::with_capacity(capacity),
        }
    }

    /// Append one `(player, score)` pair.
    pub fn push(&mut self, player_id: impl Into<String>, score: f64) {
        self.player_ids.push(player_id.into());
        self.scores.push(score);
    }

    /// Player ids in response order.
    pub fn player_ids(&self) -> &[String] {
        &self.player_ids
    }

    /// Scores aligned with [`Self::player_ids`].
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.player_ids.len()
    }

    /// Whether the response holds no entry.
    pub fn is_empty(&self) -> bool {
        self.player_ids.is_empty()
    }

    /// Iterate over `(player, score)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.player_ids
            .iter()
            .map(String::as_str)
            .zip(self.scores.iter().copied())
    }

    /// Serialize to the JSON wire format, or [`SERIALIZATION_ERROR_BODY`] on failure.
    pub fn to_wire(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            warn!(error = %err, "failed to serialize leaderboard response");
            SERIALIZATION_ERROR_BODY.to_owned()
        })
    }
}

impl From<Vec<RankedEntry>> for LeaderboardResponse {
    fn from(entries: Vec<RankedEntry>) -> Self {
        let mut response = Self::with_capacity(entries.len());
        for entry in entries {
            response.push(entry.member, entry.score);
        }
        response
    }
}

/// Query string of the global top route.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct TopQuery {
    /// Number of entries to return (default 10).
    #[validate(range(min = 1, max = 10000))]
    pub count: Option<usize>,
}

impl TopQuery {
    /// Requested count or [`DEFAULT_TOP_COUNT`].
    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_TOP_COUNT)
    }
}

/// Query string of the bucketed top route.
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct BucketTopQuery {
    /// Number of entries to return (default 10).
    #[validate(range(min = 1, max = 10000))]
    pub count: Option<usize>,
    /// Age of the bucket in days; 0 is the current bucket.
    #[serde(default)]
    pub days_old: u32,
}

impl BucketTopQuery {
    /// Requested count or [`DEFAULT_TOP_COUNT`].
    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_TOP_COUNT)
    }
}

/// Score submission payload.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    /// Player the score belongs to.
    #[validate(length(min = 1))]
    pub player_id: String,
    /// Submitted score; must be finite.
    pub score: f64,
}

/// Result of a score submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitScoreResponse {
    /// Whether the score became the new high score.
    pub accepted: bool,
    /// High score before the submission, when one existed.
    pub previous: Option<f64>,
}

/// Friends leaderboard request.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendsRequest {
    /// Friends to compare against, in display order.
    #[validate(length(max = 1000))]
    pub friend_ids: Vec<String>,
}

/// Rank of a player, 1 being the best, -1 when unknown.
#[derive(Debug, Serialize, ToSchema)]
pub struct RankResponse {
    /// One-based rank or -1.
    pub rank: i64,
}

/// High score read from a player profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct HighScoreResponse {
    /// Stored personal best.
    pub score: f64,
}

/// Outcome of a removal.
#[derive(Debug, Serialize, ToSchema)]
pub struct RemovedResponse {
    /// Number of entries removed.
    pub removed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ranked_entries_keep_order_and_alignment() {
        let response = LeaderboardResponse::from(vec![
            RankedEntry::new("p2", 90.0),
            RankedEntry::new("p1", 12.5),
        ]);
        assert_eq!(response.player_ids(), ["p2", "p1"]);
        assert_eq!(response.scores(), [90.0, 12.5]);
        assert_eq!(
            response.entries().collect::<Vec<_>>(),
            vec![("p2", 90.0), ("p1", 12.5)]
        );
    }

    #[test]
    fn wire_format_has_exactly_two_fields() {
        let mut response = LeaderboardResponse::default();
        response.push("p1", 100.0);
        response.push("f1", -1.0);

        let wire: serde_json::Value = serde_json::from_str(&response.to_wire()).unwrap();
        assert_eq!(
            wire,
            json!({"playerIds": ["p1", "f1"], "scores": [100.0, -1.0]})
        );
    }

    #[test]
    fn empty_response_serializes_empty_arrays() {
        assert_eq!(
            LeaderboardResponse::default().to_wire(),
            r#"{"playerIds":[],"scores":[]}"#
        );
    }

    #[test]
    fn top_query_defaults_and_bounds() {
        let query = TopQuery { count: None };
        assert_eq!(query.count(), DEFAULT_TOP_COUNT);
        assert!(query.validate().is_ok());
        assert!(TopQuery { count: Some(0) }.validate().is_err());
        assert!(
            TopQuery {
                count: Some(MAX_TOP_COUNT + 1)
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn submit_request_requires_player_id() {
        let request: SubmitScoreRequest =
            serde_json::from_str(r#"{"playerId":"","score":3}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
