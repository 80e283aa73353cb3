use std::env;

use mongodb::options::ClientOptions;

use super::{
    connection::PingRetry,
    error::{MongoDaoError, MongoResult},
};

const DEFAULT_DATABASE: &str = "leaderboard";
const APP_NAME: &str = "leaderboard-back";
const URI_VAR: &str = "MONGO_URI";
const DATABASE_VAR: &str = "MONGO_DB";

/// Where the MongoDB ranked store lives and how patiently to connect to it.
#[derive(Clone)]
pub struct MongoConfig {
    /// Parsed driver options, tagged with the application name.
    pub options: ClientOptions,
    /// Database holding the `values` and `ranked_members` collections.
    pub database_name: String,
    /// Backoff used by the initial connection and by reconnects.
    pub ping_retry: PingRetry,
}

impl MongoConfig {
    /// Parse `uri`; the database defaults to `leaderboard`.
    pub async fn from_uri(uri: &str, database: Option<&str>) -> MongoResult<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|source| MongoDaoError::InvalidUri {
                uri: uri.to_owned(),
                source,
            })?;
        options.app_name.get_or_insert_with(|| APP_NAME.to_owned());

        Ok(Self {
            options,
            database_name: database
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(DEFAULT_DATABASE)
                .to_owned(),
            ping_retry: PingRetry::default(),
        })
    }

    /// Build the configuration from `MONGO_URI` (required) and `MONGO_DB`.
    pub async fn from_env() -> MongoResult<Self> {
        let uri = env::var(URI_VAR).map_err(|_| MongoDaoError::MissingEnvVar { var: URI_VAR })?;
        let database = env::var(DATABASE_VAR).ok();
        Self::from_uri(&uri, database.as_deref()).await
    }
}
