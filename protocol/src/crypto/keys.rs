//! # Key Parsing & Validation
//!
//! Spring '83 keys are Ed25519 public keys with a twist: the hex encoding of
//! a valid key must end in `83e` followed by `MMYY`, a month and two-digit
//! year that set the key's expiry. Finding a keypair whose public half
//! happens to end that way takes millions of attempts (see the `miner`
//! module), which is the protocol's built-in challenge factor against
//! throwaway identities.
//!
//! ## Why Ed25519?
//!
//! - Deterministic signatures (no k-value footguns like ECDSA).
//! - 128-bit security level in 32+32 bytes. Compact and sufficient.
//! - Fast verification — important when every PUT costs one.
//!
//! ## Security considerations
//!
//! - We use OS-level RNG (`OsRng`) for key generation. If your OS RNG is
//!   broken, you have bigger problems than your board.
//! - Private key bytes are never logged. If you add logging to this module,
//!   you will be asked to leave.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH,
    SECRET_KEY_LENGTH, SIGNATURE_LENGTH,
};
use rand::rngs::OsRng;
use regex::Regex;
use thiserror::Error;

use crate::config;

/// Pattern every conforming key must match: 57 hex characters, the literal
/// magic `83e`, a month number, and a two-digit year.
///
/// See: <https://github.com/robinsloan/spring-83/blob/main/draft-20220629.md#key-format>
static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{57}83e(0[1-9]|1[0-2])(\d\d)$").expect("key regex is valid")
});

/// Errors from parsing or validating a key.
///
/// The three window failures are deliberately distinct — the server returns
/// a different message for each so that authors know whether to fix their
/// key or just wait.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The key does not conform to the required format at all: wrong length,
    /// non-hex characters, missing magic suffix, or not a valid curve point.
    #[error("key is invalid")]
    Invalid,

    /// The key's embedded `MMYY` expiry month is in the past.
    #[error("key is expired")]
    Expired,

    /// The key's embedded expiry month is more than two years out, so the
    /// key has not entered its validity window yet.
    #[error("key is not yet valid")]
    NotYetValid,

    /// A private key seed could not be decoded as 32 hex-encoded bytes.
    #[error("private key seed is invalid: expected {SECRET_KEY_LENGTH} hex-encoded bytes")]
    BadSeed,
}

// ---------------------------------------------------------------------------
// BoardKey
// ---------------------------------------------------------------------------

/// A Spring '83 public key. It can verify board content, but not sign it.
///
/// Constructed either checked ([`parse`](Self::parse), which enforces format
/// and the validity window) or unchecked ([`parse_unchecked`](Self::parse_unchecked),
/// for the miner and for well-known keys that are allowed to be stale).
#[derive(Clone)]
pub struct BoardKey {
    hex: String,
    verifying_key: VerifyingKey,
}

impl BoardKey {
    /// Parses a Spring '83 key and checks that it conforms to the various
    /// requirements imposed by the protocol: hex format, magic suffix, and
    /// the expiry window derived from the trailing `MMYY` digits.
    pub fn parse(key: &str, now: DateTime<Utc>) -> Result<Self, KeyError> {
        let caps = KEY_RE.captures(key).ok_or(KeyError::Invalid)?;

        let month: u32 = caps[1].parse().expect("month group is two digits");
        let year_2dig: i32 = caps[2].parse().expect("year group is two digits");

        // Two-digit years expand against the current century. Yes, this has
        // a year-2100 problem. The keys only live two years; we'll cope.
        let century = now.year() / 100 * 100;
        let year = year_2dig + century;

        let expiry_month = first_of_month(year, month);

        // Step forward a month, then back down a second, landing on the last
        // second of the expiry month — the last valid instant for the key.
        let expires_at = relative_month(expiry_month, 1) - chrono::Duration::seconds(1);
        if now > expires_at {
            return Err(KeyError::Expired);
        }

        let valid_at = expiry_month - config::key_lifetime();
        if valid_at > now {
            return Err(KeyError::NotYetValid);
        }

        Self::parse_unchecked(key)
    }

    /// Parses a key without checking the Spring '83 format or time window.
    /// Only hex decoding and curve-point validity are enforced.
    pub fn parse_unchecked(key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(key).map_err(|_| KeyError::Invalid)?;
        let arr: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| KeyError::Invalid)?;
        let verifying_key = VerifyingKey::from_bytes(&arr).map_err(|_| KeyError::Invalid)?;
        Ok(Self {
            hex: key.to_owned(),
            verifying_key,
        })
    }

    /// Produces a key from a raw Ed25519 public key. Unchecked: no claim is
    /// made that the result is a conforming Spring '83 key.
    pub fn from_raw(verifying_key: VerifyingKey) -> Self {
        Self {
            hex: hex::encode(verifying_key.as_bytes()),
            verifying_key,
        }
    }

    /// The key as 64 lowercase hex characters.
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// The raw 32 public key bytes.
    pub fn public_key_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.verifying_key.as_bytes()
    }

    /// Verifies a detached Ed25519 signature over `message`.
    ///
    /// Returns a plain boolean: callers want yes/no, and handing attackers a
    /// detailed failure oracle buys nobody anything.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let sig_bytes: [u8; SIGNATURE_LENGTH] = match signature.try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        let sig = DalekSignature::from_bytes(&sig_bytes);
        self.verifying_key.verify(message, &sig).is_ok()
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl fmt::Debug for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoardKey({})", self.hex)
    }
}

impl PartialEq for BoardKey {
    fn eq(&self, other: &Self) -> bool {
        self.hex == other.hex
    }
}

impl Eq for BoardKey {}

// ---------------------------------------------------------------------------
// BoardKeypair
// ---------------------------------------------------------------------------

/// A Spring '83 private/public keypair. Unlike [`BoardKey`], it can also
/// sign content.
///
/// Note that the 32-byte private key is what RFC 8032 calls a "seed", which
/// is the encoding Spring '83 and most Ed25519 tooling exchange.
#[derive(Clone)]
pub struct BoardKeypair {
    key: BoardKey,
    signing_key: SigningKey,
}

impl BoardKeypair {
    /// Generates a fresh keypair from the OS cryptographic RNG.
    ///
    /// The result is a perfectly good Ed25519 keypair and almost certainly
    /// *not* a conforming Spring '83 key — that's the miner's job.
    pub fn generate() -> Self {
        Self::from_raw(SigningKey::generate(&mut OsRng))
    }

    /// Parses a keypair from a hex-encoded 32-byte seed. The derived public
    /// key is not checked for Spring '83 conformance.
    pub fn from_seed_hex(private_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(private_key).map_err(|_| KeyError::BadSeed)?;
        let seed: [u8; SECRET_KEY_LENGTH] = bytes.try_into().map_err(|_| KeyError::BadSeed)?;
        Ok(Self::from_raw(SigningKey::from_bytes(&seed)))
    }

    /// Produces a keypair from raw Ed25519 signing key material. Unchecked.
    pub fn from_raw(signing_key: SigningKey) -> Self {
        Self {
            key: BoardKey::from_raw(signing_key.verifying_key()),
            signing_key,
        }
    }

    /// The public half of the keypair.
    pub fn public_key(&self) -> &BoardKey {
        &self.key
    }

    /// The public key as hex. Shorthand for `public_key().as_hex()`.
    pub fn public_hex(&self) -> &str {
        self.key.as_hex()
    }

    /// The private seed as hex. Handle with care: this is the only secret
    /// standing between an attacker and the board.
    pub fn seed_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Signs `message`, returning the 64-byte detached signature.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Signs `message` and hex-encodes the signature, the form it travels
    /// in over the `Spring-Signature` header.
    pub fn sign_hex(&self, message: &[u8]) -> String {
        hex::encode(self.sign(message))
    }

    /// Verifies a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.key.verify(message, signature)
    }
}

impl fmt::Debug for BoardKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print seed material, not even "partially". A partial leak is
        // still a leak, and grepping logs for hex is trivial.
        write!(f, "BoardKeypair(pub={})", self.key.as_hex())
    }
}

// ---------------------------------------------------------------------------
// Month Arithmetic
// ---------------------------------------------------------------------------

/// First second of the given (year, month) in UTC.
fn first_of_month(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("first second of a month is a valid UTC instant")
}

/// Steps `relative_months` whole months from `t`, landing on the first
/// second of the target month.
///
/// The seemingly obvious thing to do here would be calendar-date addition,
/// but that's a massive footgun: one month before Oct 31st is Oct 1st under
/// day-preserving arithmetic (because Sep 31st doesn't exist). Working on
/// (year, month-index) integers and normalizing the carry sidesteps the
/// whole class of bug.
pub(crate) fn relative_month(t: DateTime<Utc>, relative_months: i32) -> DateTime<Utc> {
    let month0 = t.month0() as i32 + relative_months;
    let year = t.year() + month0.div_euclid(12);
    let month = month0.rem_euclid(12) as u32 + 1;
    first_of_month(year, month)
}
