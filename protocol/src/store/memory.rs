//! # In-Memory Board Store
//!
//! A map behind a reader-writer lock. Readers run concurrently; writers and
//! the reaper take the lock exclusively, so a `get` can never observe a
//! half-written board. Doubles as the cache tier of the bucket store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::board::Board;
use crate::config;
use crate::store::{BoardStore, StoreError};

/// Process-local board storage.
pub struct MemoryStore {
    boards: RwLock<HashMap<String, Board>>,
    time_now: fn() -> DateTime<Utc>,
}

impl MemoryStore {
    /// An empty store on the real clock.
    pub fn new() -> Self {
        Self::with_time_source(Utc::now)
    }

    /// An empty store reading time from `time_now`. Lets tests pin the
    /// clock instead of sleeping 22 days.
    pub fn with_time_source(time_now: fn() -> DateTime<Utc>) -> Self {
        Self {
            boards: RwLock::new(HashMap::new()),
            time_now,
        }
    }

    /// Number of boards currently held, expired stragglers included.
    pub fn len(&self) -> usize {
        self.boards.read().len()
    }

    /// Whether the store holds nothing at all.
    pub fn is_empty(&self) -> bool {
        self.boards.read().is_empty()
    }

    /// Performs one reap sweep: takes the write lock, drops every expired
    /// board, and reports how many were removed. The sweep visits each
    /// current key exactly once, so its runtime is bounded by the map size.
    pub fn reap_once(&self) -> usize {
        let now = (self.time_now)();
        let mut boards = self.boards.write();
        let before = boards.len();
        boards.retain(|_, board| !board.expired_at(now));
        before - boards.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Board, StoreError> {
        let boards = self.boards.read();
        let board = boards.get(key).ok_or(StoreError::NotFound)?;

        // The reaper may be behind; aggressively treat outdated content as
        // already gone.
        if board.expired_at((self.time_now)()) {
            return Err(StoreError::NotFound);
        }

        Ok(board.clone())
    }

    async fn put(&self, key: &str, board: Board) -> Result<(), StoreError> {
        self.boards.write().insert(key.to_owned(), board);
        Ok(())
    }

    async fn reap_loop(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(config::REAP_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // An interval's first tick fires immediately; consume it so sweeps
        // start one full period after boot.
        ticker.tick().await;

        info!(
            interval_secs = config::REAP_INTERVAL.as_secs(),
            "board reaper started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.reap_once();
                    if removed > 0 {
                        info!(removed, "reaped expired boards");
                    } else {
                        debug!("reap sweep found nothing to remove");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("board reaper shutting down");
                        return;
                    }
                }
            }
        }
    }
}
