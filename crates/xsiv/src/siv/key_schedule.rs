//! Key schedule: master secret to independent MAC and encryption subkeys
//!
//! Two explicit modes, never chosen by sniffing the secret length:
//!
//! ```text
//! Expand (32-byte seed)                 Split (64-byte secret)
//!
//! mac_key = KH(seed, BE256(0) || seed)  mac_key = secret[0..32]
//! enc_key = KH(seed, BE256(1) || seed)  enc_key = secret[32..64]
//! ```
//!
//! `KH` is the engine's keyed hash and `BE256(i)` is `i` as a 32-byte
//! big-endian integer. The counter comes before the seed.

use std::fmt;

use zeroize::Zeroize;

use super::{error::SivError, primitives::KeyedHash};

/// Size of each derived subkey in bytes
pub const SUBKEY_SIZE: usize = 32;

/// Width of the big-endian block counter in the expansion input
const COUNTER_WIDTH: usize = 32;

/// Counter for the MAC subkey block
const MAC_BLOCK: u64 = 0;

/// Counter for the encryption subkey block
const ENC_BLOCK: u64 = 1;

/// How a master secret becomes a [`SubkeyPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyMode {
    /// One subkey-sized seed, expanded with the keyed hash.
    #[default]
    Expand,
    /// A secret of two subkeys, split in half.
    Split,
}

impl KeyMode {
    /// Master secret length this mode accepts.
    pub const fn secret_len(self) -> usize {
        match self {
            Self::Expand => SUBKEY_SIZE,
            Self::Split => 2 * SUBKEY_SIZE,
        }
    }
}

/// The two subkeys an engine holds for its lifetime.
///
/// Both halves are zeroized on drop.
#[derive(Clone)]
pub struct SubkeyPair {
    enc_key: [u8; SUBKEY_SIZE],
    mac_key: [u8; SUBKEY_SIZE],
}

impl SubkeyPair {
    /// Derive subkeys from `secret` under `mode`.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `secret` is not [`KeyMode::secret_len`] bytes
    /// - `Primitive`: the keyed hash cannot serve as the expansion function
    pub fn derive<H: KeyedHash>(mode: KeyMode, secret: &[u8]) -> Result<Self, SivError> {
        if secret.len() != mode.secret_len() {
            return Err(SivError::InvalidKeyLength {
                expected: mode.secret_len(),
                actual: secret.len(),
            });
        }

        match mode {
            KeyMode::Split => {
                let mut mac_key = [0u8; SUBKEY_SIZE];
                let mut enc_key = [0u8; SUBKEY_SIZE];
                mac_key.copy_from_slice(&secret[..SUBKEY_SIZE]);
                enc_key.copy_from_slice(&secret[SUBKEY_SIZE..]);
                Ok(Self { enc_key, mac_key })
            },
            KeyMode::Expand => {
                let mac_key = expand_block::<H>(secret, MAC_BLOCK)?;
                let enc_key = expand_block::<H>(secret, ENC_BLOCK)?;
                Ok(Self { enc_key, mac_key })
            },
        }
    }

    /// Subkey for the stream cipher.
    pub fn enc_key(&self) -> &[u8; SUBKEY_SIZE] {
        &self.enc_key
    }

    /// Subkey for the keyed hash.
    pub fn mac_key(&self) -> &[u8; SUBKEY_SIZE] {
        &self.mac_key
    }
}

impl fmt::Debug for SubkeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubkeyPair")
            .field("enc_key", &"[REDACTED]")
            .field("mac_key", &"[REDACTED]")
            .finish()
    }
}

impl Drop for SubkeyPair {
    fn drop(&mut self) {
        self.enc_key.zeroize();
        self.mac_key.zeroize();
    }
}

/// One block of the counter-mode expansion: `KH(seed, BE256(index) || seed)`.
fn expand_block<H: KeyedHash>(seed: &[u8], index: u64) -> Result<[u8; SUBKEY_SIZE], SivError> {
    if H::DIGEST_SIZE < SUBKEY_SIZE {
        return Err(SivError::primitive(format!(
            "{}-byte digest is too short to expand {SUBKEY_SIZE}-byte subkeys",
            H::DIGEST_SIZE
        )));
    }

    let mut counter = [0u8; COUNTER_WIDTH];
    counter[COUNTER_WIDTH - 8..].copy_from_slice(&index.to_be_bytes());

    let mut hash = H::new_keyed(seed)?;
    hash.update(&counter);
    hash.update(seed);

    let mut digest = vec![0u8; H::DIGEST_SIZE];
    hash.finalize_into(&mut digest);

    let mut block = [0u8; SUBKEY_SIZE];
    block.copy_from_slice(&digest[..SUBKEY_SIZE]);
    digest.zeroize();

    Ok(block)
}
