//! # Key Miner
//!
//! A conforming key's hex encoding must end in `83e` + `MMYY`, and the only
//! way to get one is to keep generating Ed25519 keypairs until the dice
//! land right. Seven fixed hex characters means roughly 16^7 ≈ 268 million
//! expected attempts, so the search runs one worker per hardware thread
//! and, depending on the machine, still takes minutes.
//!
//! Workers share exactly three things: a channel for the winning keypair,
//! an atomic "done" flag, and an atomic iteration counter. No locks. Each
//! worker checks the flag only at the top of its loop, so a few extra
//! keypairs may be generated after the first match — harmless, the
//! coordinator consumes only the first. The iteration total is therefore a
//! best-effort metric; never hang correctness off it.
//!
//! The suffix comparison works on raw bytes rather than hex-encoding every
//! candidate: encoding 32 bytes tens of millions of times is a
//! disproportionate cost next to a byte-slice compare.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;

use chrono::{DateTime, Utc};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use thiserror::Error;

use crate::config;
use crate::crypto::keys::BoardKeypair;

/// Miner failures. There's only one way to hold it wrong.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MinerError {
    /// The requested suffix is not hex, so no key can ever match it.
    #[error("target suffix must contain only hex characters")]
    InvalidSuffix,
}

/// A successfully mined keypair plus the approximate number of keypairs
/// generated across all workers to find it.
#[derive(Debug)]
pub struct MinedKey {
    pub keypair: BoardKeypair,
    pub iterations: u64,
}

/// Mines a key that expires at the far edge of the validity window: two
/// years out from `now`, the expiry month a fresh key should target.
pub fn generate_conforming_key(now: DateTime<Utc>) -> Result<MinedKey, MinerError> {
    mine_key_with_suffix(&key_suffix_with_expiry(now))
}

/// Mines a keypair whose public-key hex ends with `target_suffix`.
///
/// Broken out from [`generate_conforming_key`] so tests can run the full
/// machinery against a short suffix instead of burning minutes on a real
/// seven-character one.
pub fn mine_key_with_suffix(target_suffix: &str) -> Result<MinedKey, MinerError> {
    let (suffix_bytes, odd_chars) = hex_suffix_bytes(target_suffix)?;

    let workers = thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1);

    let done = AtomicBool::new(false);
    let total_iterations = AtomicU64::new(0);
    // Sized to the worker count so a sender can never block, even if
    // several workers find a match in the same instant.
    let (tx, rx) = mpsc::sync_channel::<BoardKeypair>(workers);

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let done = &done;
            let total_iterations = &total_iterations;
            let suffix_bytes = suffix_bytes.as_slice();

            scope.spawn(move || {
                let mut local_iterations: u64 = 0;
                loop {
                    if done.load(Ordering::Relaxed) {
                        total_iterations.fetch_add(local_iterations, Ordering::Relaxed);
                        return;
                    }
                    local_iterations += 1;

                    let signing_key = SigningKey::generate(&mut OsRng);
                    if !suffix_bytes_equal(
                        signing_key.verifying_key().as_bytes(),
                        suffix_bytes,
                        odd_chars,
                    ) {
                        continue;
                    }

                    let _ = tx.try_send(BoardKeypair::from_raw(signing_key));
                    done.store(true, Ordering::Relaxed);
                }
            });
        }
    });

    drop(tx);
    let keypair = rx.recv().expect("at least one worker sent a winning keypair");

    Ok(MinedKey {
        keypair,
        iterations: total_iterations.load(Ordering::Relaxed),
    })
}

/// The suffix a key must carry to expire in the month `key_lifetime` out
/// from `t`: the magic `83e` plus that month as `MMYY`.
fn key_suffix_with_expiry(t: DateTime<Utc>) -> String {
    let expiry = t + config::key_lifetime();
    format!("83e{}", expiry.format("%m%y"))
}

/// Decodes a hex string into bytes for tail comparison. The boolean flag
/// reports an odd number of hex characters, meaning the most significant
/// byte carries only half a byte of relevant information.
fn hex_suffix_bytes(s: &str) -> Result<(Vec<u8>, bool), MinerError> {
    let odd_chars = s.len() % 2 == 1;
    let padded = if odd_chars {
        format!("0{s}")
    } else {
        s.to_owned()
    };

    let bytes = hex::decode(padded).map_err(|_| MinerError::InvalidSuffix)?;
    Ok((bytes, odd_chars))
}

/// Byte-wise suffix comparison. With `odd_chars`, only the low nibble of
/// the boundary byte participates; the remaining bytes compare whole.
fn suffix_bytes_equal(b: &[u8], suffix: &[u8], odd_chars: bool) -> bool {
    if suffix.is_empty() {
        return true;
    }
    if suffix.len() > b.len() {
        return false;
    }

    let tail = &b[b.len() - suffix.len()..];
    if odd_chars {
        tail[0] & 0x0f == suffix[0] & 0x0f && tail[1..] == suffix[1..]
    } else {
        tail == suffix
    }
}
