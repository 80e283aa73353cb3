use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::PlayerProfile;

/// Profile payload accepted and returned by the player routes.
///
/// `playerId` and `highScore` are interpreted by the backend; any other field is stored as-is.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfileDto {
    #[validate(length(min = 1))]
    pub player_id: String,
    #[serde(default)]
    pub high_score: f64,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl From<PlayerProfileDto> for PlayerProfile {
    fn from(value: PlayerProfileDto) -> Self {
        Self {
            id: value.player_id,
            high_score: value.high_score,
            extra: value.extra,
        }
    }
}
