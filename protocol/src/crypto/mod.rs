//! # Cryptographic Primitives
//!
//! Key handling and signature plumbing for the protocol. Everything here is
//! a thin, typed wrapper over `ed25519-dalek` — the wrapping buys a single
//! place to audit signing operations, consistent error types, and the
//! Spring '83 key-format rules that raw Ed25519 knows nothing about.

pub mod keys;
pub mod signatures;

pub use keys::{BoardKey, BoardKeypair, KeyError};
pub use signatures::{decode_signature, SignatureDecodeError};
