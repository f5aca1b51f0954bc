use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::error::{AppError, AppResult};

/// Namespaced Redis keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Resolved poster URL for a TMDB movie ID
    Poster(i64),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Poster(movie_id) => write!(f, "poster:{}", movie_id),
        }
    }
}

/// Parses `redis_url`. Nothing connects until the first command.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    Ok(Client::open(redis_url)?)
}

/// A serialized `SETEX` waiting for the writer task
struct PendingWrite {
    key: String,
    json: String,
    ttl_secs: u64,
}

/// Poster cache in Redis. Reads are awaited inline, writes are queued.
///
/// Clones share one writer task.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the writer task spawned by [`Cache::new`]
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Returns once every write queued before this call has been attempted
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Stopping poster cache writer");

        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Poster cache writer panicked");
        }
    }
}

impl Cache {
    /// Spawns the writer task; must be called inside a tokio runtime
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let writer = tokio::spawn(Self::run_writer(redis_client.clone(), write_rx, shutdown_rx));

        (
            Self {
                redis_client,
                write_tx,
            },
            CacheWriterHandle { shutdown_tx, writer },
        )
    }

    async fn run_writer(
        client: Client,
        mut queue: mpsc::UnboundedReceiver<PendingWrite>,
        mut shutdown: mpsc::Receiver<()>,
    ) {
        tracing::debug!("Poster cache writer running");

        loop {
            tokio::select! {
                next = queue.recv() => {
                    let Some(write) = next else {
                        // last Cache dropped
                        break;
                    };
                    if let Err(e) = Self::store(&client, write).await {
                        tracing::warn!(error = %e, "Poster cache write failed");
                    }
                }
                _ = shutdown.recv() => {
                    // Cache clones can outlive the handle; take only what is queued now
                    let mut flushed = 0usize;
                    while let Ok(write) = queue.try_recv() {
                        if let Err(e) = Self::store(&client, write).await {
                            tracing::warn!(error = %e, "Poster cache write failed during shutdown");
                        }
                        flushed += 1;
                    }
                    tracing::info!(flushed, "Poster cache writer drained");
                    break;
                }
            }
        }

        tracing::debug!("Poster cache writer exited");
    }

    async fn store(client: &Client, write: PendingWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(write.key, write.json, write.ttl_secs).await?;
        Ok(())
    }

    /// Looks `key` up and decodes its JSON value
    pub async fn get_from_cache<T: DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key.to_string()).await?;

        raw.map(|json| {
            serde_json::from_str(&json).map_err(|e| {
                AppError::Internal(format!("undecodable cache entry '{}': {}", key, e))
            })
        })
        .transpose()
    }

    /// Queues `value` under `key` for `ttl_secs`. Failures are logged, never returned.
    pub fn set_in_background<T: Serialize>(&self, key: &CacheKey, value: &T, ttl_secs: u64) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Skipping unserializable cache value");
                return;
            }
        };

        let write = PendingWrite {
            key: key.to_string(),
            json,
            ttl_secs,
        };

        if self.write_tx.send(write).is_err() {
            tracing::warn!(key = %key, "Poster cache writer has stopped, dropping write");
        }
    }
}
