use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{ranked_store::RankedStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Connect to the ranked store and keep the shared state in degraded mode while it is unreachable.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn RankedStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                state.install_ranked_store(store.clone()).await;
                info!("ranked store connection established; leaving degraded mode");
                delay = INITIAL_DELAY;

                loop {
                    match store.health_check().await {
                        Ok(()) => {
                            if state.is_degraded() {
                                info!("ranked store healthy again; leaving degraded mode");
                                state.update_degraded(false);
                            }
                            sleep(HEALTH_POLL_INTERVAL).await;
                        }
                        Err(_) => {
                            let mut attempt = 0;
                            let mut reconnect_delay = INITIAL_DELAY;
                            let mut reconnected = false;

                            while attempt < MAX_RECONNECT_ATTEMPTS {
                                match store.try_reconnect().await {
                                    Ok(()) => {
                                        info!(
                                            "ranked store reconnection succeeded after health check failure"
                                        );
                                        reconnected = true;
                                        break;
                                    }
                                    Err(reconnect_err) => {
                                        if attempt == 0 {
                                            warn!(
                                                attempt, error = %reconnect_err,
                                                "ranked store reconnect first attempt failed; entering degraded mode"
                                            );
                                            state.update_degraded(true);
                                        } else {
                                            warn!(attempt, error = %reconnect_err, "ranked store reconnect attempt failed");
                                        };
                                        attempt += 1;
                                        sleep(reconnect_delay).await;
                                        reconnect_delay = (reconnect_delay * 2).min(MAX_DELAY);
                                    }
                                }
                            }

                            if reconnected {
                                state.update_degraded(false);
                                sleep(HEALTH_POLL_INTERVAL).await;
                                continue;
                            } else {
                                warn!(
                                    "exhausted ranked store reconnect attempts; dropping the connection"
                                );
                                state.clear_ranked_store().await;
                                break;
                            }
                        }
                    }
                }

                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
            Err(err) => {
                warn!(error = %err, "ranked store connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::ranked_store::memory::MemoryRankedStore,
        services::{buckets::Clock, outcome_log::OutcomeSink},
        state::AppState,
    };

    #[tokio::test(start_paused = true)]
    async fn installs_store_after_failed_attempts() {
        let (outcomes, _rx) = OutcomeSink::channel(4);
        let state = AppState::with_parts(AppConfig::default(), Clock::System, outcomes);
        let attempts = Arc::new(AtomicU32::new(0));

        let supervisor = {
            let attempts = attempts.clone();
            tokio::spawn(run(state.clone(), move || {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(StorageError::unavailable(
                            "connection refused".into(),
                            std::io::Error::other("connection refused"),
                        ))
                    } else {
                        Ok(Arc::new(MemoryRankedStore::new()) as Arc<dyn RankedStore>)
                    }
                }
            }))
        };

        let mut watcher = state.degraded_watcher();
        watcher.wait_for(|degraded| !degraded).await.unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert!(state.ranked_store().await.is_some());
        supervisor.abort();
    }
}
