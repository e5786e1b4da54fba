//! # Object-Store-Backed Board Store
//!
//! Persists each board as one JSON object in an external bucket, keyed by
//! the board's public key, with a [`MemoryStore`] in front as a
//! read-through cache. The bucket itself is expected to carry a 22-day
//! delete lifecycle; the freshness contract is still enforced here so a
//! misconfigured bucket can't resurrect dead boards.
//!
//! Bucket operations are retried with exponential backoff (1 s initial,
//! 5 s cap). That includes the non-idempotent `put`: repeating an identical
//! whole-board write is harmless under the protocol's semantics, so we
//! don't bother distinguishing.

use std::sync::Arc;

use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;

use crate::board::Board;
use crate::store::{BoardStore, MemoryStore, StoreError};

/// First retry delay after a failed bucket operation.
const INITIAL_RETRY_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

/// Ceiling on the delay between retries.
const MAX_RETRY_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5);

/// Total time budget for retrying one operation before giving up.
const MAX_RETRY_ELAPSED: std::time::Duration = std::time::Duration::from_secs(30);

fn storage_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: INITIAL_RETRY_INTERVAL,
        max_interval: MAX_RETRY_INTERVAL,
        max_elapsed_time: Some(MAX_RETRY_ELAPSED),
        ..ExponentialBackoff::default()
    }
}

/// Wire form of a board inside the bucket: content goes to base64 because
/// JSON has no bytes, timestamps go to RFC 3339 so a human poking at the
/// bucket can read them.
#[derive(Debug, Serialize, Deserialize)]
struct StoredBoard {
    content: String,
    signature: String,
    timestamp: DateTime<Utc>,
}

impl StoredBoard {
    fn encode(board: &Board) -> Self {
        Self {
            content: BASE64.encode(&board.content),
            signature: board.signature.clone(),
            timestamp: board.timestamp,
        }
    }

    fn decode(self) -> Result<Board, StoreError> {
        let content = BASE64
            .decode(&self.content)
            .map_err(|err| StoreError::Backend(format!("decoding stored board content: {err}")))?;
        Ok(Board {
            content,
            signature: self.signature,
            timestamp: self.timestamp,
        })
    }
}

/// Board store over an external object-storage bucket.
pub struct BucketStore {
    bucket: Arc<dyn ObjectStore>,
    cache: MemoryStore,
    time_now: fn() -> DateTime<Utc>,
}

impl BucketStore {
    /// Wraps `bucket` with an empty cache on the real clock.
    pub fn new(bucket: Arc<dyn ObjectStore>) -> Self {
        Self::with_time_source(bucket, Utc::now)
    }

    /// Same, reading time from `time_now` so tests can pin the clock.
    pub fn with_time_source(bucket: Arc<dyn ObjectStore>, time_now: fn() -> DateTime<Utc>) -> Self {
        Self {
            bucket,
            cache: MemoryStore::with_time_source(time_now),
            time_now,
        }
    }
}

#[async_trait]
impl BoardStore for BucketStore {
    async fn get(&self, key: &str) -> Result<Board, StoreError> {
        match self.cache.get(key).await {
            Ok(board) => return Ok(board),
            Err(StoreError::NotFound) => {}
            Err(err) => return Err(err),
        }

        let location = ObjectPath::from(key);
        let bucket = Arc::clone(&self.bucket);
        let bytes = with_retries("get board object", || {
            let bucket = Arc::clone(&bucket);
            let location = location.clone();
            async move { bucket.get(&location).await?.bytes().await }
        })
        .await?;

        let stored: StoredBoard = serde_json::from_slice(&bytes)
            .map_err(|err| StoreError::Backend(format!("decoding stored board JSON: {err}")))?;
        let board = stored.decode()?;

        // The bucket's lifecycle rule can lag expiry; never serve (or
        // cache) what it hasn't deleted yet.
        if board.expired_at((self.time_now)()) {
            return Err(StoreError::NotFound);
        }

        self.cache.put(key, board.clone()).await?;
        Ok(board)
    }

    async fn put(&self, key: &str, board: Board) -> Result<(), StoreError> {
        let body = serde_json::to_vec(&StoredBoard::encode(&board))
            .map_err(|err| StoreError::Backend(format!("encoding board JSON: {err}")))?;

        let location = ObjectPath::from(key);
        let bucket = Arc::clone(&self.bucket);
        with_retries("put board object", || {
            let bucket = Arc::clone(&bucket);
            let location = location.clone();
            let body = body.clone();
            async move { bucket.put(&location, body.into()).await }
        })
        .await?;

        self.cache.put(key, board).await
    }

    /// Only the cache needs reaping; stale objects in the bucket are the
    /// lifecycle rule's problem, and the read path filters them anyway.
    async fn reap_loop(&self, shutdown: watch::Receiver<bool>) {
        self.cache.reap_loop(shutdown).await;
    }
}

/// Runs `attempt` until it succeeds, the backoff budget runs dry, or the
/// backend reports the object missing — NotFound is an answer, not a
/// transient fault, and retrying it would only add latency to every 404.
async fn with_retries<T, F, Fut>(operation: &str, mut attempt: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, object_store::Error>>,
{
    let mut policy = storage_backoff();
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(object_store::Error::NotFound { .. }) => return Err(StoreError::NotFound),
            Err(err) => match policy.next_backoff() {
                Some(delay) => {
                    warn!(
                        operation,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "object store operation failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return Err(StoreError::Backend(format!(
                        "{operation}: retries exhausted: {err}"
                    )))
                }
            },
        }
    }
}
