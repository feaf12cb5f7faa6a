//! Integration tests for the PdfVault crypto primitives.

use pdfvault::crypto::{
    decrypt_bytes, encrypt_bytes, generate_master_key, master_key_fingerprint,
    master_key_to_phrase, phrase_to_master_key, MasterKey, IV_LEN, KEY_LEN,
};
use pdfvault::errors::PdfVaultError;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// AES-GCM primitives
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = [0xABu8; KEY_LEN];
    let plaintext = b"%PDF-1.7 quarterly report";

    let (ciphertext, iv) = encrypt_bytes(&key, plaintext).expect("encrypt");
    assert_eq!(iv.len(), IV_LEN);
    // 16-byte GCM tag appended, IV kept separately.
    assert_eq!(ciphertext.len(), plaintext.len() + 16);

    let recovered = decrypt_bytes(&key, &ciphertext, &iv).expect("decrypt");
    assert_eq!(recovered, plaintext);
}

#[test]
fn each_encryption_uses_a_fresh_iv() {
    let key = [0xCDu8; KEY_LEN];
    let (ct1, iv1) = encrypt_bytes(&key, b"same").unwrap();
    let (ct2, iv2) = encrypt_bytes(&key, b"same").unwrap();
    assert_ne!(iv1, iv2);
    assert_ne!(ct1, ct2);
}

#[test]
fn wrong_key_is_authentication_failure() {
    let (ciphertext, iv) = encrypt_bytes(&[1u8; KEY_LEN], b"secret").unwrap();
    let err = decrypt_bytes(&[2u8; KEY_LEN], &ciphertext, &iv).unwrap_err();
    assert!(matches!(err, PdfVaultError::AuthenticationFailed));
}

#[test]
fn wrong_iv_is_authentication_failure() {
    let key = [3u8; KEY_LEN];
    let (ciphertext, mut iv) = encrypt_bytes(&key, b"secret").unwrap();
    iv[0] ^= 0x01;
    assert!(matches!(
        decrypt_bytes(&key, &ciphertext, &iv),
        Err(PdfVaultError::AuthenticationFailed)
    ));
    assert!(matches!(
        decrypt_bytes(&key, &ciphertext, &iv[..8]),
        Err(PdfVaultError::AuthenticationFailed)
    ));
}

// ---------------------------------------------------------------------------
// Recovery phrase
// ---------------------------------------------------------------------------

#[test]
fn phrase_has_stable_grouped_format() {
    let key = generate_master_key().unwrap();
    let phrase = master_key_to_phrase(&key);

    let groups: Vec<&str> = phrase.as_str().split('-').collect();
    assert_eq!(groups.len(), 8);
    for group in groups {
        assert_eq!(group.len(), 8);
        assert!(group
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }
}

#[test]
fn phrase_roundtrips_to_same_key() {
    let key = generate_master_key().unwrap();
    let phrase = master_key_to_phrase(&key);
    let restored = phrase_to_master_key(phrase.as_str()).unwrap();
    assert_eq!(restored.as_bytes(), key.as_bytes());
}

#[test]
fn phrase_decoding_ignores_formatting() {
    let key = MasterKey::from_bytes([0x5Au8; KEY_LEN]);
    let phrase = master_key_to_phrase(&key);

    let sloppy = format!("  {}\n", phrase.as_str().to_lowercase().replace('-', " "));
    let restored = phrase_to_master_key(&sloppy).unwrap();
    assert_eq!(
        master_key_fingerprint(&restored),
        master_key_fingerprint(&key)
    );
}

#[test]
fn malformed_phrase_is_rejected() {
    let too_long = "A".repeat(66);
    for input in ["not-a-valid-phrase", "", "ABCD-1234", too_long.as_str()] {
        assert!(
            matches!(
                phrase_to_master_key(input),
                Err(PdfVaultError::InvalidPhraseFormat)
            ),
            "accepted {input:?}"
        );
    }
}

// ---------------------------------------------------------------------------
// Fingerprints
// ---------------------------------------------------------------------------

#[test]
fn fingerprint_is_deterministic_and_distinguishes_keys() {
    let a = MasterKey::from_bytes([1u8; KEY_LEN]);
    let a_again = MasterKey::from_bytes([1u8; KEY_LEN]);
    let b = MasterKey::from_bytes([2u8; KEY_LEN]);

    let fp = master_key_fingerprint(&a);
    assert_eq!(fp.as_str().len(), 64);
    assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(fp, master_key_fingerprint(&a_again));
    assert_ne!(fp, master_key_fingerprint(&b));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

prop_compose! {
    fn arb_master_key()(bytes in any::<[u8; KEY_LEN]>()) -> MasterKey {
        MasterKey::from_bytes(bytes)
    }
}

proptest! {
    #[test]
    fn any_key_roundtrips_through_its_phrase(key in arb_master_key()) {
        let phrase = master_key_to_phrase(&key);
        prop_assert_eq!(phrase.as_str().len(), 71);

        let restored = phrase_to_master_key(phrase.as_str()).unwrap();
        prop_assert_eq!(restored.as_bytes(), key.as_bytes());
        prop_assert_eq!(master_key_fingerprint(&restored), master_key_fingerprint(&key));
    }

    #[test]
    fn lowercase_phrase_decodes_to_same_key(key in arb_master_key()) {
        let phrase = master_key_to_phrase(&key).as_str().to_lowercase();
        let restored = phrase_to_master_key(&phrase).unwrap();
        prop_assert_eq!(restored.as_bytes(), key.as_bytes());
    }
}
