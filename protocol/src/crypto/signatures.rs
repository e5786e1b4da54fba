//! # Wire Signature Handling
//!
//! Boards arrive with their signature hex-encoded in the `Spring-Signature`
//! header. This module turns that untrusted string into the fixed 64 bytes
//! Ed25519 expects, distinguishing the failure modes the protocol reports
//! separately: undecodable hex versus a decoded value of the wrong length.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey, SIGNATURE_LENGTH};
use thiserror::Error;

/// Failures while decoding a signature off the wire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureDecodeError {
    /// The header value is not valid hex.
    #[error("signature could not be decoded from hex to binary")]
    Unparseable,

    /// The hex decoded cleanly but not to exactly 64 bytes.
    #[error("signature should be exactly {SIGNATURE_LENGTH} bytes long")]
    BadLength,
}

/// Decodes a hex-encoded detached signature into its 64 raw bytes.
pub fn decode_signature(sig_hex: &str) -> Result<[u8; SIGNATURE_LENGTH], SignatureDecodeError> {
    let bytes = hex::decode(sig_hex).map_err(|_| SignatureDecodeError::Unparseable)?;
    bytes
        .try_into()
        .map_err(|_| SignatureDecodeError::BadLength)
}

/// Verifies a signature using raw byte components.
///
/// This is the "I got these bytes off the wire and need to check them"
/// variant: it parses the public key bytes, then does the verification.
/// Any parse failure is just `false` — no error oracle.
pub fn verify_raw(public_key_bytes: &[u8; 32], message: &[u8], signature: &[u8; SIGNATURE_LENGTH]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key_bytes) else {
        return false;
    };
    let sig = DalekSignature::from_bytes(signature);
    verifying_key.verify(message, &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::BoardKeypair;

    #[test]
    fn decode_valid_signature() {
        let keypair = BoardKeypair::generate();
        let sig_hex = keypair.sign_hex(b"content");
        assert_eq!(sig_hex.len(), 128);

        let decoded = decode_signature(&sig_hex).unwrap();
        assert_eq!(decoded, keypair.sign(b"content"));
    }

    #[test]
    fn decode_rejects_non_hex() {
        assert_eq!(
            decode_signature("zz not hex zz").unwrap_err(),
            SignatureDecodeError::Unparseable
        );
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert_eq!(
            decode_signature("deadbeef").unwrap_err(),
            SignatureDecodeError::BadLength
        );
    }

    #[test]
    fn verify_raw_round_trip() {
        let keypair = BoardKeypair::generate();
        let sig = keypair.sign(b"raw bytes off the wire");

        assert!(verify_raw(
            keypair.public_key().public_key_bytes(),
            b"raw bytes off the wire",
            &sig,
        ));
        assert!(!verify_raw(
            keypair.public_key().public_key_bytes(),
            b"tampered",
            &sig,
        ));
    }
}
