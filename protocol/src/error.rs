//! # Protocol Error Taxonomy
//!
//! Spring '83 has a fixed set of ways a request can be wrong, and clients
//! are entitled to stable, greppable messages for every one of them. The
//! messages below are part of the server's public behavior: do not reword
//! them, even when the grammar itches.
//!
//! Two taxonomies live side by side:
//!
//! - [`ServerError`] — protocol errors. Fixed status code, fixed message,
//!   surfaced verbatim to the client, never logged above info. These are
//!   the *user's* errors.
//! - [`ServiceError::Internal`] — everything else (store I/O, encoding,
//!   the genuinely unexpected). Logged at error severity with context;
//!   the client sees only the generic 500 message.

use thiserror::Error;

use crate::config::MAX_CONTENT_SIZE;

/// A protocol-level request failure: one variant per error kind the
/// protocol defines, each with its fixed user-facing message and status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServerError {
    #[error("Content is larger than the maximum allowed size of {} bytes.", MAX_CONTENT_SIZE)]
    ContentTooLarge,

    #[error("This key is denied.")]
    DeniedKey,

    #[error("An internal error has occurred. Please report this to the server operator.")]
    InternalError,

    #[error("The given key is expired. The last four digits `MMYY` represent a month and year number which is now allowed to exceed the current month and year.")]
    KeyExpired,

    #[error("The given key is invalid. It should be exactly 64 characters in length and be suffixed with `83eMMYY` where `MM` is a valid month number and `YY` are the last two digits of a year.")]
    KeyInvalid,

    #[error("The given key is not yet valid. The last four digits `MMYY` represent a month and year number which must be within two years of the current month and year.")]
    KeyNotYetValid,

    #[error("This request was made with Spring '83's test key, which is always rejected according to the specification.")]
    TestKey,

    #[error("Signature in the `Spring-Signature` header should be exactly {} bytes long.", ed25519_dalek::SIGNATURE_LENGTH)]
    SignatureBadLength,

    #[error("Payload contents could not be verified against the signature in the `Spring-Signature` header.")]
    SignatureInvalid,

    #[error("Missing `Spring-Signature` header which should contain a signature for the payload.")]
    SignatureMissing,

    #[error("Signature in the `Spring-Signature` header could not be decoded from hex to binary.")]
    SignatureUnparseable,

    #[error("Content <time> timestamp should not be in the future.")]
    TimestampInFuture,

    #[error("Expected content to contain a timestamp tag like `<time datetime=\"YYYY-MM-DDTHH:MM:SSZ\">`.")]
    TimestampMissing,

    #[error("Content <time> timestamp is older than the timestamp already registered under the given key.")]
    TimestampOlderThanCurrent,

    #[error("Content <time> timestamp should not be more than 22 days old.")]
    TimestampTooOld,

    #[error("Could not parse timestamp tag. Tag should in standard format and UTC like `<time datetime=\"YYYY-MM-DDTHH:MM:SSZ\">`.")]
    TimestampUnparseable,

    #[error("Board not found: {0:?}.")]
    BoardNotFound(String),

    #[error("Error parsing `If-Modified-Since` header value: {0:?}.")]
    IfModifiedSinceParse(String),
}

impl ServerError {
    /// The HTTP-like status code fixed for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ContentTooLarge => 413,
            Self::DeniedKey
            | Self::KeyExpired
            | Self::KeyInvalid
            | Self::KeyNotYetValid => 403,
            Self::InternalError => 500,
            Self::TestKey | Self::SignatureInvalid => 401,
            Self::SignatureBadLength
            | Self::SignatureMissing
            | Self::SignatureUnparseable
            | Self::TimestampInFuture
            | Self::TimestampMissing
            | Self::TimestampTooOld
            | Self::TimestampUnparseable
            | Self::IfModifiedSinceParse(_) => 400,
            Self::TimestampOlderThanCurrent => 409,
            Self::BoardNotFound(_) => 404,
        }
    }
}

/// What a service handler can return instead of a response.
///
/// The transport adapter matches on this: `Protocol` renders its own status
/// and message, `Internal` renders as a generic 500 after logging the
/// underlying cause. Cancellation and deadline expiry are the transport's
/// concern and never reach this type.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A protocol error with its fixed status and message.
    #[error(transparent)]
    Protocol(#[from] ServerError),

    /// A failure that is the server's fault, not the client's. The string
    /// is for the operator's logs; the client never sees it.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Convenience constructor for internal failures built from error chains.
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Internal(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable() {
        // Clients grep for these. The day one changes, it's a protocol break.
        assert_eq!(
            ServerError::ContentTooLarge.to_string(),
            "Content is larger than the maximum allowed size of 2217 bytes."
        );
        assert_eq!(
            ServerError::SignatureBadLength.to_string(),
            "Signature in the `Spring-Signature` header should be exactly 64 bytes long."
        );
        assert_eq!(
            ServerError::BoardNotFound("abc".to_owned()).to_string(),
            r#"Board not found: "abc"."#
        );
        assert_eq!(
            ServerError::IfModifiedSinceParse("yesterday-ish".to_owned()).to_string(),
            r#"Error parsing `If-Modified-Since` header value: "yesterday-ish"."#
        );
    }

    #[test]
    fn status_codes_match_kind() {
        assert_eq!(ServerError::ContentTooLarge.status_code(), 413);
        assert_eq!(ServerError::DeniedKey.status_code(), 403);
        assert_eq!(ServerError::TestKey.status_code(), 401);
        assert_eq!(ServerError::SignatureInvalid.status_code(), 401);
        assert_eq!(ServerError::TimestampOlderThanCurrent.status_code(), 409);
        assert_eq!(ServerError::BoardNotFound(String::new()).status_code(), 404);
        assert_eq!(ServerError::InternalError.status_code(), 500);
        assert_eq!(ServerError::TimestampInFuture.status_code(), 400);
    }
}
