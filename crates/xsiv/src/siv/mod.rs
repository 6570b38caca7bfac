//! SIV: deterministic, nonce-misuse-resistant AEAD
//!
//! # Architecture
//!
//! ```text
//! Master Secret
//!        │
//!        ▼ KeyMode::Expand (keyed hash, counter || seed)
//!        ▼ KeyMode::Split  (halves)
//! SubkeyPair { mac_key, enc_key }
//!        │
//!        ▼ Seal
//! tag = KH(mac_key, plaintext || aad)
//! nonce = tag[..NONCE_SIZE]
//! body = plaintext ⊕ Keystream(enc_key, nonce)
//!        │
//!        ▼
//! body || tag
//! ```
//!
//! # Security Properties
//!
//! - Determinism: same (key, plaintext, aad) always gives the same ciphertext
//! - Misuse Resistance: no caller nonce to reuse
//! - Authenticity: tag checked in constant time before plaintext is released

pub mod engine;
pub mod error;
pub mod key_schedule;
pub mod primitives;

pub use engine::{Siv, XChaCha20Blake2bSiv, XChaCha20HmacSha256Siv};
pub use error::SivError;
pub use key_schedule::{KeyMode, SUBKEY_SIZE, SubkeyPair};
pub use primitives::{Blake2b256, HmacSha256, KeyedHash, Keystream, XChaCha20Keystream};
