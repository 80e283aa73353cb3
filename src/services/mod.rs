/// Time-bucket naming for the bucketed leaderboard views.
pub mod buckets;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Leaderboard queries: top-N, ranks and friends comparisons.
pub mod leaderboard_service;
/// Non-blocking outcome log.
pub mod outcome_log;
/// Player profile storage.
pub mod player_service;
/// Score submission and global-view removal.
pub mod score_service;
/// Ranked store connection supervisor driving degraded mode.
pub mod storage_supervisor;
