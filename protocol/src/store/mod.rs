//! # Board Stores
//!
//! Pluggable persistence for boards. The trait is small on purpose: Spring
//! '83 needs point reads, whole-value writes, and a way to let expired
//! content go. Two implementations live here:
//!
//! - [`MemoryStore`] — process-local map. The default, and the cache tier
//!   for the bucket store.
//! - [`BucketStore`] — one JSON object per key in an external object-store
//!   bucket, fronted by a `MemoryStore` read-through cache.
//!
//! ## The freshness contract
//!
//! `get` MUST report [`StoreError::NotFound`] for any board older than 22
//! days, whether or not a reaper has swept it yet. Expiry is therefore
//! enforced at read time; the reap loop is a memory optimization, not a
//! correctness mechanism.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::board::Board;

pub mod bucket;
pub mod memory;

pub use bucket::BucketStore;
pub use memory::MemoryStore;

/// Failures from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No live board under the requested key — either none was ever stored,
    /// or what was stored has aged out.
    #[error("board not found")]
    NotFound,

    /// The backing storage failed. The string carries operator-facing
    /// context; it is never shown to clients.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Capability set every board store provides.
///
/// Implementations must be safe under concurrent readers and writers, and a
/// `get` that observes a key must see a board whose fields were written as
/// a unit — no torn state.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Fetches the live board for `key`, honoring the freshness contract.
    async fn get(&self, key: &str) -> Result<Board, StoreError>;

    /// Stores `board` under `key`, replacing any previous value whole.
    async fn put(&self, key: &str, board: Board) -> Result<(), StoreError>;

    /// Runs the store's expiry sweep until `shutdown` flips to `true` (or
    /// its sender drops). Called on its own task by the server; stores with
    /// an external expiration mechanism may make this cheap.
    async fn reap_loop(&self, shutdown: watch::Receiver<bool>);
}
