use std::time::Duration;

use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tokio::time::sleep;
use tracing::debug;

use super::error::{MongoDaoError, MongoResult};

/// Backoff applied while waiting for a fresh client to answer its first ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingRetry {
    /// Pings sent before giving up, the first one included.
    pub max_pings: u32,
    /// Wait after the first failed ping; doubled after each further failure.
    pub first_backoff: Duration,
    /// Upper bound of the wait between two pings.
    pub max_backoff: Duration,
}

impl Default for PingRetry {
    fn default() -> Self {
        Self {
            max_pings: 10,
            first_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
        }
    }
}

/// Build a client for `database_name` and return it once the server answers a ping.
pub async fn establish_connection(
    options: &ClientOptions,
    database_name: &str,
    retry: PingRetry,
) -> MongoResult<(Client, Database)> {
    let client = Client::with_options(options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(database_name);

    let mut backoff = retry.first_backoff;
    let mut ping = 0;
    loop {
        ping += 1;
        let err = match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => return Ok((client, database)),
            Err(err) => err,
        };
        if ping >= retry.max_pings {
            return Err(MongoDaoError::InitialPing {
                attempts: ping,
                source: err,
            });
        }
        debug!(ping, database = database_name, error = %err, ?backoff, "ranked store ping unanswered");
        sleep(backoff).await;
        backoff = (backoff * 2).min(retry.max_backoff);
    }
}
