//! Primitive capabilities consumed by the SIV engine
//!
//! The engine never names a concrete cipher or hash. It needs two narrow
//! capabilities:
//!
//! - [`KeyedHash`]: construct with a key, absorb bytes, emit a fixed digest
//! - [`Keystream`]: construct with a key and nonce, XOR keystream in place
//!
//! Sizes live on the traits as associated constants so the engine resolves
//! nonce and tag widths from the chosen primitives instead of literals.

use blake2::{
    Blake2bMac,
    digest::{Mac, consts::U32},
};
use chacha20::{
    XChaCha20,
    cipher::{KeyIvInit, StreamCipher},
};
use hmac::Hmac;
use sha2::Sha256;

use super::error::SivError;

/// Keyed cryptographic hash producing a fixed-size digest.
pub trait KeyedHash: Sized {
    /// Digest size in bytes
    const DIGEST_SIZE: usize;

    /// Largest key the hash accepts, in bytes
    const MAX_KEY_SIZE: usize;

    /// Start a new keyed hash computation.
    fn new_keyed(key: &[u8]) -> Result<Self, SivError>;

    /// Absorb more input.
    fn update(&mut self, data: &[u8]);

    /// Write the digest into `out`.
    ///
    /// `out` must be exactly [`Self::DIGEST_SIZE`] bytes.
    fn finalize_into(self, out: &mut [u8]);
}

/// Stream cipher used purely as a keystream generator.
pub trait Keystream: Sized {
    /// Key size in bytes
    const KEY_SIZE: usize;

    /// Nonce size in bytes
    const NONCE_SIZE: usize;

    /// Initialize the keystream at block zero.
    fn new_keystream(key: &[u8], nonce: &[u8]) -> Result<Self, SivError>;

    /// XOR the next `buf.len()` keystream bytes into `buf`.
    fn apply_keystream(&mut self, buf: &mut [u8]);
}

/// Keyed `BLAKE2b` with a 32-byte digest (RFC 7693 keyed mode).
pub struct Blake2b256(Blake2bMac<U32>);

impl KeyedHash for Blake2b256 {
    const DIGEST_SIZE: usize = 32;
    const MAX_KEY_SIZE: usize = 64;

    fn new_keyed(key: &[u8]) -> Result<Self, SivError> {
        <Blake2bMac<U32> as Mac>::new_from_slice(key).map(Self).map_err(|_| {
            SivError::primitive(format!("BLAKE2b rejected a {}-byte key", key.len()))
        })
    }

    fn update(&mut self, data: &[u8]) {
        Mac::update(&mut self.0, data);
    }

    fn finalize_into(self, out: &mut [u8]) {
        out.copy_from_slice(&Mac::finalize(self.0).into_bytes());
    }
}

/// `HMAC-SHA256`.
pub struct HmacSha256(Hmac<Sha256>);

impl KeyedHash for HmacSha256 {
    const DIGEST_SIZE: usize = 32;
    const MAX_KEY_SIZE: usize = usize::MAX;

    fn new_keyed(key: &[u8]) -> Result<Self, SivError> {
        let Ok(mac) = <Hmac<Sha256> as Mac>::new_from_slice(key) else {
            unreachable!("HMAC-SHA256 accepts any key size");
        };
        Ok(Self(mac))
    }

    fn update(&mut self, data: &[u8]) {
        Mac::update(&mut self.0, data);
    }

    fn finalize_into(self, out: &mut [u8]) {
        out.copy_from_slice(&Mac::finalize(self.0).into_bytes());
    }
}

/// `XChaCha20` keystream: 32-byte key, 24-byte extended nonce.
///
/// Panics if more than 256 GiB of keystream is requested under one nonce.
pub struct XChaCha20Keystream(XChaCha20);

impl Keystream for XChaCha20Keystream {
    const KEY_SIZE: usize = 32;
    const NONCE_SIZE: usize = 24;

    fn new_keystream(key: &[u8], nonce: &[u8]) -> Result<Self, SivError> {
        XChaCha20::new_from_slices(key, nonce).map(Self).map_err(|_| {
            SivError::primitive(format!(
                "XChaCha20 rejected key/nonce of {}/{} bytes",
                key.len(),
                nonce.len()
            ))
        })
    }

    fn apply_keystream(&mut self, buf: &mut [u8]) {
        StreamCipher::apply_keystream(&mut self.0, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest<H: KeyedHash>(key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
        let mut hash = H::new_keyed(key).unwrap();
        for part in parts {
            hash.update(part);
        }
        let mut out = vec![0u8; H::DIGEST_SIZE];
        hash.finalize_into(&mut out);
        out
    }

    #[test]
    fn hmac_sha256_matches_rfc4231_case_1() {
        let key = [0x0bu8; 20];
        let out = digest::<HmacSha256>(&key, &[b"Hi There"]);

        assert_eq!(
            hex::encode(out),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn incremental_updates_match_single_update() {
        let key = [0x11u8; 32];

        let split = digest::<Blake2b256>(&key, &[b"hello ", b"world"]);
        let whole = digest::<Blake2b256>(&key, &[b"hello world"]);
        assert_eq!(split, whole);

        let split = digest::<HmacSha256>(&key, &[b"hello ", b"world"]);
        let whole = digest::<HmacSha256>(&key, &[b"hello world"]);
        assert_eq!(split, whole);
    }

    #[test]
    fn blake2b_key_changes_digest() {
        let a = digest::<Blake2b256>(&[0u8; 32], &[b"message"]);
        let b = digest::<Blake2b256>(&[1u8; 32], &[b"message"]);
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn blake2b_rejects_oversized_key() {
        let result = Blake2b256::new_keyed(&[0u8; 65]);
        assert!(matches!(result, Err(SivError::Primitive { .. })));
    }

    #[test]
    fn keystream_is_an_involution() {
        let key = [0x42u8; 32];
        let nonce = [0x24u8; 24];
        let original = b"attack at dawn, bring snacks".to_vec();

        let mut buf = original.clone();
        XChaCha20Keystream::new_keystream(&key, &nonce).unwrap().apply_keystream(&mut buf);
        assert_ne!(buf, original);

        XChaCha20Keystream::new_keystream(&key, &nonce).unwrap().apply_keystream(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn keystream_depends_on_nonce() {
        let key = [0x42u8; 32];
        let mut a = [0u8; 64];
        let mut b = [0u8; 64];

        XChaCha20Keystream::new_keystream(&key, &[0u8; 24]).unwrap().apply_keystream(&mut a);
        XChaCha20Keystream::new_keystream(&key, &[1u8; 24]).unwrap().apply_keystream(&mut b);

        assert_ne!(a, b);
    }

    #[test]
    fn keystream_rejects_short_nonce() {
        let result = XChaCha20Keystream::new_keystream(&[0u8; 32], &[0u8; 12]);
        assert!(matches!(result, Err(SivError::Primitive { .. })));
    }
}
