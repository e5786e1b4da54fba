// Copyright (c) 2026 The Vernal Authors. MIT License.
// See LICENSE for details.

//! # Vernal Protocol — Core Library
//!
//! This is the beating heart of Vernal: a server implementation of
//! Spring '83, the small, federated publishing protocol where every author
//! owns exactly one 2217-byte board addressed by an Ed25519 public key.
//!
//! Spring '83 is refreshingly opinionated. Keys carry their own expiry date
//! in their final hex characters, boards die after 22 days of silence, and
//! the only authentication in the whole system is the signature a key leaves
//! on its own board. This crate enforces all of it and nothing else.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of a
//! board server:
//!
//! - **crypto** — Key parsing, signing, and verification. Don't roll your own.
//! - **board** — The board value type and its `<time>` tag rules.
//! - **denylist** — Keys the server refuses to serve, infernal key included.
//! - **store** — Pluggable board persistence: in-memory and object storage.
//! - **service** — The protocol decision tree for GETs and PUTs.
//! - **error** — The fixed taxonomy of protocol errors and their messages.
//! - **miner** — Brute-force search for keys with a conforming suffix.
//! - **config** — Protocol constants. All of them.
//!
//! Transport is deliberately absent: the service speaks in typed responses
//! and typed errors, and an HTTP adapter elsewhere does the translating.
//!
//! ## Design Philosophy
//!
//! 1. Correctness over performance (but we're still fast).
//! 2. Protocol errors have stable messages. Clients grep for them.
//! 3. Every public API is documented. Internal shame is documented too.

pub mod board;
pub mod config;
pub mod crypto;
pub mod denylist;
pub mod error;
pub mod miner;
pub mod service;
pub mod store;
pub mod test_board;

pub use board::Board;
pub use crypto::keys::{BoardKey, BoardKeypair, KeyError};
pub use denylist::{DenyList, MemoryDenyList};
pub use error::{ServerError, ServiceError};
pub use service::{BoardService, ServiceResponse};
pub use store::{BoardStore, StoreError};
