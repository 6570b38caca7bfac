//! Synthetic-IV Authenticated Encryption
//!
//! A deterministic AEAD built from a stream cipher used only as a keystream
//! generator and a keyed hash used both as the MAC and as the nonce source.
//! Callers never supply a nonce: the tag over the plaintext and associated
//! data is computed first and its leading bytes become the nonce.
//!
//! ```text
//! seal(aad, plaintext) -> body || tag
//! open(aad, body || tag) -> plaintext | AuthenticationFailed
//! ```
//!
//! # Wire Format
//!
//! `[ body: len(plaintext) ][ tag: OVERHEAD ]`. No length prefix, no version
//! byte. Associated data is never transmitted and must be supplied
//! identically to both sides.
//!
//! # Security
//!
//! Determinism:
//! - Identical (key, plaintext, aad) produce identical ciphertexts
//! - Equal ciphertexts reveal equal messages; this is inherent to SIV
//!
//! Authenticity:
//! - Tag covers plaintext then associated data, in that order
//! - Tag comparison is constant time
//! - On failure the candidate plaintext is wiped, never returned
//!
//! Key Handling:
//! - Subkeys are derived once per engine and zeroized on drop
//! - Key rotation means building a new engine
//!
//! # Example
//!
//! ```
//! use xsiv::XChaCha20Blake2bSiv;
//!
//! let engine = XChaCha20Blake2bSiv::new(&[0u8; 32])?;
//! let ciphertext = engine.seal(b"header", b"payload");
//! assert_eq!(engine.open(b"header", &ciphertext)?, b"payload");
//! assert!(engine.open(b"other header", &ciphertext).is_err());
//! # Ok::<(), xsiv::SivError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod siv;

pub use siv::{
    Blake2b256, HmacSha256, KeyMode, KeyedHash, Keystream, SUBKEY_SIZE, Siv, SivError, SubkeyPair,
    XChaCha20Blake2bSiv, XChaCha20HmacSha256Siv, XChaCha20Keystream,
};
