//! Seal and open: MAC first, then derive the nonce from the tag
//!
//! Ciphertext layout (no length prefix, no version byte):
//!
//! ```text
//! ┌──────────────────────────────┬────────────────────┐
//! │ body: len(plaintext) bytes   │ tag: DIGEST_SIZE   │
//! └──────────────────────────────┴────────────────────┘
//! ```
//!
//! `tag = KH(mac_key, plaintext || associated_data)`, and the first
//! `NONCE_SIZE` bytes of the tag are the stream cipher nonce under `enc_key`.

use std::{fmt, marker::PhantomData};

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::{
    error::SivError,
    key_schedule::{KeyMode, SUBKEY_SIZE, SubkeyPair},
    primitives::{Blake2b256, HmacSha256, KeyedHash, Keystream, XChaCha20Keystream},
};

/// `XChaCha20-BLAKE2b-SIV`, the default pairing.
pub type XChaCha20Blake2bSiv = Siv<XChaCha20Keystream, Blake2b256>;

/// `XChaCha20-HMAC-SHA256-SIV`.
pub type XChaCha20HmacSha256Siv = Siv<XChaCha20Keystream, HmacSha256>;

/// Deterministic SIV AEAD over keystream `C` and keyed hash `H`.
///
/// Holds only its [`SubkeyPair`]. Every call builds fresh hash and cipher
/// state, so a shared reference can seal and open from many threads.
pub struct Siv<C, H> {
    keys: SubkeyPair,
    _primitives: PhantomData<fn() -> (C, H)>,
}

impl<C: Keystream, H: KeyedHash> Siv<C, H> {
    /// Callers never supply a nonce; it is implicit in the tag.
    pub const NONCE_SIZE: usize = 0;

    /// Bytes added to every plaintext: one full tag.
    pub const OVERHEAD: usize = H::DIGEST_SIZE;

    /// Create an engine from a [`KeyMode::Expand`] seed.
    pub fn new(secret: &[u8]) -> Result<Self, SivError> {
        Self::with_mode(KeyMode::Expand, secret)
    }

    /// Create an engine from a master secret in an explicit key mode.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `secret` does not match `mode`
    /// - `Primitive`: `C` and `H` cannot be combined into this construction
    pub fn with_mode(mode: KeyMode, secret: &[u8]) -> Result<Self, SivError> {
        check_primitives::<C, H>()?;
        let keys = SubkeyPair::derive::<H>(mode, secret)?;

        tracing::debug!(
            ?mode,
            tag_size = H::DIGEST_SIZE,
            nonce_size = C::NONCE_SIZE,
            "SIV engine ready"
        );

        Ok(Self { keys, _primitives: PhantomData })
    }

    /// Bytes added by [`seal`](Self::seal).
    pub fn overhead(&self) -> usize {
        Self::OVERHEAD
    }

    /// Ciphertext length for a plaintext of `plaintext_len` bytes.
    pub fn ciphertext_len(plaintext_len: usize) -> usize {
        plaintext_len + Self::OVERHEAD
    }

    /// Plaintext length carried by a ciphertext, or `None` if it is shorter
    /// than a tag.
    pub fn plaintext_len(ciphertext_len: usize) -> Option<usize> {
        ciphertext_len.checked_sub(Self::OVERHEAD)
    }

    /// Encrypt and authenticate into a freshly allocated buffer.
    pub fn seal(&self, associated_data: &[u8], plaintext: &[u8]) -> Vec<u8> {
        let mut ciphertext = vec![0u8; Self::ciphertext_len(plaintext.len())];
        self.seal_into(&mut ciphertext, associated_data, plaintext);
        ciphertext
    }

    /// Encrypt and authenticate into `dst`.
    ///
    /// # Panics
    ///
    /// If `dst.len() != plaintext.len() + OVERHEAD`. A wrongly sized output
    /// buffer is a bug at the call site.
    pub fn seal_into(&self, dst: &mut [u8], associated_data: &[u8], plaintext: &[u8]) {
        assert_eq!(
            dst.len(),
            Self::ciphertext_len(plaintext.len()),
            "seal: dst must be plaintext length plus {} bytes",
            Self::OVERHEAD
        );

        let (body, tag) = dst.split_at_mut(plaintext.len());
        let Ok(()) = self.seal_parts(body, tag, associated_data, plaintext) else {
            unreachable!("primitive sizes are validated at construction");
        };

        tracing::trace!(plaintext_len = plaintext.len(), aad_len = associated_data.len(), "sealed");
    }

    /// Verify and decrypt into a freshly allocated buffer.
    ///
    /// # Errors
    ///
    /// - `MalformedCiphertext`: shorter than one tag
    /// - `AuthenticationFailed`: tampered ciphertext, wrong associated data,
    ///   or wrong key. Reject the message.
    pub fn open(&self, associated_data: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, SivError> {
        let Some(msg_len) = Self::plaintext_len(ciphertext.len()) else {
            return Err(SivError::MalformedCiphertext {
                minimum: Self::OVERHEAD,
                actual: ciphertext.len(),
            });
        };

        let mut plaintext = vec![0u8; msg_len];
        self.open_into(&mut plaintext, associated_data, ciphertext)?;
        Ok(plaintext)
    }

    /// Verify and decrypt into `dst`.
    ///
    /// On any error `dst` holds zeros; unauthenticated plaintext is never
    /// left behind.
    ///
    /// # Errors
    ///
    /// - `MalformedCiphertext`: shorter than one tag
    /// - `InvalidBufferLength`: `dst` is not `ciphertext.len() - OVERHEAD`
    /// - `AuthenticationFailed`: tag mismatch
    pub fn open_into(
        &self,
        dst: &mut [u8],
        associated_data: &[u8],
        ciphertext: &[u8],
    ) -> Result<(), SivError> {
        let Some(msg_len) = Self::plaintext_len(ciphertext.len()) else {
            return Err(SivError::MalformedCiphertext {
                minimum: Self::OVERHEAD,
                actual: ciphertext.len(),
            });
        };
        if dst.len() != msg_len {
            return Err(SivError::InvalidBufferLength { expected: msg_len, actual: dst.len() });
        }

        let (body, tag) = ciphertext.split_at(msg_len);
        let result = self.open_parts(dst, associated_data, body, tag);
        if result.is_err() {
            dst.zeroize();
        }

        match &result {
            Ok(()) => tracing::trace!(plaintext_len = msg_len, "opened"),
            Err(e) => tracing::debug!(
                ciphertext_len = ciphertext.len(),
                aad_len = associated_data.len(),
                error = %e,
                "rejected ciphertext"
            ),
        }

        result
    }

    fn seal_parts(
        &self,
        body: &mut [u8],
        tag: &mut [u8],
        associated_data: &[u8],
        plaintext: &[u8],
    ) -> Result<(), SivError> {
        self.compute_tag(plaintext, associated_data, tag)?;

        body.copy_from_slice(plaintext);
        self.keystream(tag)?.apply_keystream(body);
        Ok(())
    }

    fn open_parts(
        &self,
        dst: &mut [u8],
        associated_data: &[u8],
        body: &[u8],
        supplied_tag: &[u8],
    ) -> Result<(), SivError> {
        dst.copy_from_slice(body);
        self.keystream(supplied_tag)?.apply_keystream(dst);

        let mut expected_tag = vec![0u8; H::DIGEST_SIZE];
        self.compute_tag(dst, associated_data, &mut expected_tag)?;

        if bool::from(expected_tag.as_slice().ct_eq(supplied_tag)) {
            Ok(())
        } else {
            Err(SivError::AuthenticationFailed)
        }
    }

    /// `KH(mac_key, plaintext || associated_data)`. Order is fixed.
    fn compute_tag(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
        out: &mut [u8],
    ) -> Result<(), SivError> {
        let mut hash = H::new_keyed(self.keys.mac_key())?;
        hash.update(plaintext);
        hash.update(associated_data);
        hash.finalize_into(out);
        Ok(())
    }

    /// Keystream under `enc_key` with the tag's leading bytes as nonce.
    fn keystream(&self, tag: &[u8]) -> Result<C, SivError> {
        C::new_keystream(self.keys.enc_key(), &tag[..C::NONCE_SIZE])
    }
}

impl<C, H> Clone for Siv<C, H> {
    fn clone(&self) -> Self {
        Self { keys: self.keys.clone(), _primitives: PhantomData }
    }
}

impl<C, H> fmt::Debug for Siv<C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Siv").field("keys", &self.keys).finish()
    }
}

/// Reject primitive pairings the construction cannot use.
fn check_primitives<C: Keystream, H: KeyedHash>() -> Result<(), SivError> {
    if H::DIGEST_SIZE < C::NONCE_SIZE {
        return Err(SivError::primitive(format!(
            "{}-byte tag cannot supply a {}-byte nonce",
            H::DIGEST_SIZE,
            C::NONCE_SIZE
        )));
    }
    if C::KEY_SIZE != SUBKEY_SIZE {
        return Err(SivError::primitive(format!(
            "stream cipher wants {}-byte keys, subkeys are {SUBKEY_SIZE} bytes",
            C::KEY_SIZE
        )));
    }
    if H::MAX_KEY_SIZE < SUBKEY_SIZE {
        return Err(SivError::primitive(format!(
            "keyed hash accepts at most {}-byte keys, subkeys are {SUBKEY_SIZE} bytes",
            H::MAX_KEY_SIZE
        )));
    }
    Ok(())
}
