//! Scenario tests for SIV seal/open
//!
//! Fixed-input walkthroughs of the construction: zero keys in both key
//! modes, exhaustive bit flips, and divergence across associated data.

use std::collections::HashSet;

use proptest::prelude::*;
use xsiv::{KeyMode, SivError, XChaCha20Blake2bSiv};

/// Deterministic filler so scenarios are reproducible.
fn pattern(len: usize, salt: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(salt)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn zero_key_scenario(
        plaintext in prop::collection::vec(any::<u8>(), 64..=64),
        aad in prop::collection::vec(any::<u8>(), 16..=16),
    ) {
        prop_assume!(aad != [0u8; 16]);

        let engine = XChaCha20Blake2bSiv::with_mode(KeyMode::Split, &[0u8; 64]).unwrap();
        let ciphertext = engine.seal(&aad, &plaintext);

        prop_assert_eq!(engine.open(&aad, &ciphertext).unwrap(), plaintext);
        prop_assert_eq!(
            engine.open(&[0u8; 16], &ciphertext),
            Err(SivError::AuthenticationFailed)
        );

        let other = XChaCha20Blake2bSiv::new(&[0u8; 32]).unwrap();
        prop_assert_eq!(other.open(&aad, &ciphertext), Err(SivError::AuthenticationFailed));
    }
}

#[test]
fn zero_seed_expansion_scenario() {
    let engine = XChaCha20Blake2bSiv::new(&[0u8; 32]).unwrap();
    let plaintext = pattern(64, 1);
    let aad = pattern(16, 2);

    let ciphertext = engine.seal(&aad, &plaintext);
    assert_eq!(engine.open(&aad, &ciphertext).unwrap(), plaintext);
    assert_eq!(engine.open(&[0u8; 16], &ciphertext), Err(SivError::AuthenticationFailed));

    let split = XChaCha20Blake2bSiv::with_mode(KeyMode::Split, &[0u8; 64]).unwrap();
    assert_eq!(split.open(&aad, &ciphertext), Err(SivError::AuthenticationFailed));
}

#[test]
fn every_bit_flip_is_rejected() {
    let engine = XChaCha20Blake2bSiv::new(&pattern(32, 7)).unwrap();
    let plaintext = pattern(24, 3);
    let aad = b"header";

    let ciphertext = engine.seal(aad, &plaintext);

    for index in 0..ciphertext.len() {
        for bit in 0..8 {
            let mut tampered = ciphertext.clone();
            tampered[index] ^= 1 << bit;

            assert_eq!(
                engine.open(aad, &tampered),
                Err(SivError::AuthenticationFailed),
                "flip at byte {index} bit {bit} was accepted"
            );
        }
    }
}

#[test]
fn truncated_or_extended_ciphertext_is_rejected() {
    let engine = XChaCha20Blake2bSiv::new(&[0x33u8; 32]).unwrap();
    let ciphertext = engine.seal(b"", &pattern(40, 9));

    let truncated = &ciphertext[..ciphertext.len() - 1];
    assert_eq!(engine.open(b"", truncated), Err(SivError::AuthenticationFailed));

    let mut extended = ciphertext.clone();
    extended.push(0);
    assert_eq!(engine.open(b"", &extended), Err(SivError::AuthenticationFailed));
}

#[test]
fn changing_only_aad_changes_everything() {
    let engine = XChaCha20Blake2bSiv::new(&[0x44u8; 32]).unwrap();
    let plaintext = pattern(32, 5);

    let mut bodies = HashSet::new();
    for i in 0u16..500 {
        let ciphertext = engine.seal(&i.to_be_bytes(), &plaintext);
        bodies.insert(ciphertext[..plaintext.len()].to_vec());
    }

    assert_eq!(bodies.len(), 500, "nonce derived from tag must differ per aad");
}

#[test]
fn engine_shared_across_threads() {
    let engine = XChaCha20Blake2bSiv::new(&[0x55u8; 32]).unwrap();

    std::thread::scope(|scope| {
        for t in 0u8..4 {
            let engine = &engine;
            scope.spawn(move || {
                for i in 0u8..50 {
                    let plaintext = pattern(usize::from(i), t);
                    let ciphertext = engine.seal(&[t], &plaintext);
                    assert_eq!(engine.open(&[t], &ciphertext).unwrap(), plaintext);
                }
            });
        }
    });
}
