use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::dao::storage::StorageError;

/// Store writes issued by an accepted score submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOutTarget {
    /// Player profile blob carrying the high score.
    Profile,
    /// Time-bucketed leaderboard (daily or weekly).
    BucketView,
    /// Global leaderboard.
    GlobalView,
}

impl std::fmt::Display for FanOutTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FanOutTarget::Profile => "profile",
            FanOutTarget::BucketView => "bucket view",
            FanOutTarget::GlobalView => "global view",
        };
        f.write_str(label)
    }
}

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Score or query issued for a player without a stored record.
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    /// A stored profile blob could not be decoded.
    #[error("stored profile `{key}` is not valid")]
    CorruptProfile {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// Some writes of an accepted score failed; the views may now disagree.
    #[error("score fan-out failed for {}", describe_targets(.failed))]
    FanOut {
        failed: Vec<FanOutTarget>,
        #[source]
        source: StorageError,
    },
    /// Bucket lookback outside the retention window.
    #[error("bucket {days_old} days old is outside the {retention_days}-day window")]
    InvalidRange { days_old: u32, retention_days: u32 },
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Encoding a payload failed.
    #[error("serialization failed")]
    Serialization(#[source] serde_json::Error),
}

fn describe_targets(targets: &[FanOutTarget]) -> String {
    targets
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::PlayerNotFound(player) => {
                AppError::NotFound(format!("player `{player}`"))
            }
            err @ ServiceError::FanOut { .. } => AppError::ServiceUnavailable(err.to_string()),
            err @ ServiceError::InvalidRange { .. } => AppError::BadRequest(err.to_string()),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            err @ (ServiceError::CorruptProfile { .. } | ServiceError::Serialization(_)) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_out_message_lists_every_failed_target() {
        let err = ServiceError::FanOut {
            failed: vec![FanOutTarget::Profile, FanOutTarget::GlobalView],
            source: StorageError::unavailable("down".into(), std::io::Error::other("down")),
        };
        assert_eq!(
            err.to_string(),
            "score fan-out failed for profile, global view"
        );
    }

    #[test]
    fn service_errors_map_to_http_statuses() {
        let not_found: AppError = ServiceError::PlayerNotFound("p1".into()).into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let range: AppError = ServiceError::InvalidRange {
            days_old: 9,
            retention_days: 7,
        }
        .into();
        assert_eq!(range.into_response().status(), StatusCode::BAD_REQUEST);

        let degraded: AppError = ServiceError::Degraded.into();
        assert_eq!(
            degraded.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
