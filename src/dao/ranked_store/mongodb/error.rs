use mongodb::error::Error as MongoError;
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to read value `{key}`")]
    ReadValue {
        key: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to write value `{key}`")]
    WriteValue {
        key: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to update member `{member}` of ranked set `{set}`")]
    WriteMember {
        set: String,
        member: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to query ranked set `{set}`")]
    QuerySet {
        set: String,
        #[source]
        source: MongoError,
    },
}
