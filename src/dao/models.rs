use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Player profile blob persisted under `namespace + player id`.
///
/// Only `id` and `high_score` are interpreted by the backend. Every other field of the stored
/// payload is kept in `extra` so that re-storing a profile after a score update never drops
/// fields written by a client using a different schema version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    /// Player identifier, unique within a game namespace.
    #[serde(rename = "playerId")]
    pub id: String,
    /// Best score accepted for this player.
    #[serde(default)]
    pub high_score: f64,
    /// Opaque payload fields owned by the game client.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlayerProfile {
    /// Create an empty profile with a zero high score.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            high_score: 0.0,
            extra: Map::new(),
        }
    }

    /// Serialize the profile into its storage representation.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored profile blob.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Storage key of the profile blob inside `namespace`.
    pub fn storage_key(namespace: &str, player_id: &str) -> String {
        format!("{namespace}{player_id}")
    }
}

/// One `(member, score)` pair returned by a ranked set, highest scores first.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    /// Player identifier stored as the set member.
    pub member: String,
    /// Score attached to the member.
    pub score: f64,
}

impl RankedEntry {
    /// Build an entry from its parts.
    pub fn new(member: impl Into<String>, score: f64) -> Self {
        Self {
            member: member.into(),
            score,
        }
    }
}
