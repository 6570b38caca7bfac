//! Fuzz target for SIV key schedule, seal, and open
//!
//! # Strategy
//!
//! - Arbitrary master secrets (empty, seed-sized, split-sized, arbitrary)
//! - Both key modes and both keyed hashes
//! - Seal/open with arbitrary plaintext and associated data
//! - Bit flips at arbitrary positions
//! - Open on attacker-controlled bytes
//!
//! # Invariants
//!
//! - Construction fails only with InvalidKeyLength
//! - Seal is deterministic and adds exactly one tag
//! - Seal/open roundtrip succeeds
//! - Any single bit flip fails authentication
//! - Open never panics on arbitrary input

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use xsiv::{Blake2b256, HmacSha256, KeyMode, KeyedHash, Keystream, Siv, SivError, XChaCha20Keystream};

#[derive(Debug, Clone, Arbitrary)]
struct SivScenario {
    secret: MasterSecret,
    split: bool,
    hmac: bool,
    operations: Vec<SivOperation>,
}

#[derive(Debug, Clone, Arbitrary)]
enum MasterSecret {
    Empty,
    Seed([u8; 32]),
    Split([u8; 64]),
    Arbitrary(Vec<u8>),
}

impl MasterSecret {
    fn as_bytes(&self) -> &[u8] {
        match self {
            MasterSecret::Empty => &[],
            MasterSecret::Seed(b) => b,
            MasterSecret::Split(b) => b,
            MasterSecret::Arbitrary(b) => b,
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum SivOperation {
    /// Seal then open with the same associated data
    Roundtrip { plaintext: Vec<u8>, aad: Vec<u8> },
    /// Seal, flip one bit, open
    FlipBit { plaintext: Vec<u8>, aad: Vec<u8>, position: u16, bit: u8 },
    /// Open attacker-supplied bytes
    OpenRaw { ciphertext: Vec<u8>, aad: Vec<u8> },
}

fn run<C: Keystream, H: KeyedHash>(
    mode: KeyMode,
    secret: &[u8],
    operations: &[SivOperation],
) {
    // INVARIANT 1: Construction fails only on length mismatch
    let engine = match Siv::<C, H>::with_mode(mode, secret) {
        Ok(engine) => engine,
        Err(SivError::InvalidKeyLength { expected, actual }) => {
            assert_eq!(expected, mode.secret_len());
            assert_ne!(actual, expected);
            return;
        },
        Err(e) => panic!("unexpected construction error: {e}"),
    };

    for op in operations {
        match op {
            SivOperation::Roundtrip { plaintext, aad } => {
                let ciphertext = engine.seal(aad, plaintext);

                // INVARIANT 2: Overhead is exactly one tag
                assert_eq!(ciphertext.len(), plaintext.len() + engine.overhead());

                // INVARIANT 3: Seal is deterministic
                assert_eq!(ciphertext, engine.seal(aad, plaintext), "seal must be deterministic");

                // INVARIANT 4: Roundtrip succeeds
                let decrypted = engine.open(aad, &ciphertext);
                assert_eq!(decrypted.as_deref(), Ok(plaintext.as_slice()));
            },

            SivOperation::FlipBit { plaintext, aad, position, bit } => {
                let mut ciphertext = engine.seal(aad, plaintext);
                let index = usize::from(*position) % ciphertext.len();
                ciphertext[index] ^= 1 << (bit % 8);

                // INVARIANT 5: Any flipped bit is rejected
                assert_eq!(
                    engine.open(aad, &ciphertext),
                    Err(SivError::AuthenticationFailed),
                    "bit flip must fail authentication"
                );
            },

            SivOperation::OpenRaw { ciphertext, aad } => {
                // INVARIANT 6: Open never panics, short input is malformed
                match engine.open(aad, ciphertext) {
                    Ok(_) | Err(SivError::AuthenticationFailed) => {},
                    Err(SivError::MalformedCiphertext { minimum, actual }) => {
                        assert!(actual < minimum);
                    },
                    Err(e) => panic!("unexpected open error: {e}"),
                }
            },
        }
    }
}

fuzz_target!(|scenario: SivScenario| {
    let mode = if scenario.split { KeyMode::Split } else { KeyMode::Expand };
    let secret = scenario.secret.as_bytes();

    if scenario.hmac {
        run::<XChaCha20Keystream, HmacSha256>(mode, secret, &scenario.operations);
    } else {
        run::<XChaCha20Keystream, Blake2b256>(mode, secret, &scenario.operations);
    }
});
