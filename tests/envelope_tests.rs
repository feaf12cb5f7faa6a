//! Integration tests for the envelope codec and its sidecar files.

use pdfvault::crypto::{generate_master_key, master_key_to_phrase, phrase_to_master_key, MasterKey};
use pdfvault::envelope::{
    decrypt_from_storage, encrypt_for_storage, read_sidecar, sidecar_path, write_atomic,
    write_sidecar, EncryptedBlobMeta, ALGORITHM,
};
use pdfvault::errors::PdfVaultError;
use proptest::prelude::*;
use tempfile::TempDir;

fn master() -> MasterKey {
    generate_master_key().expect("generate master key")
}

fn assert_auth_failure(result: pdfvault::errors::Result<Vec<u8>>) {
    assert!(
        matches!(result, Err(PdfVaultError::AuthenticationFailed)),
        "expected AuthenticationFailed, got {result:?}"
    );
}

#[test]
fn hello_roundtrip_through_recovery_phrase() {
    let key = master();
    let phrase = master_key_to_phrase(&key);
    let restored = phrase_to_master_key(phrase.as_str()).unwrap();

    let (ct, meta) = encrypt_for_storage(b"hello", &key, "text/plain").unwrap();
    let plain = decrypt_from_storage(&ct, &meta, &restored).unwrap();
    assert_eq!(plain, b"hello");
}

#[test]
fn meta_records_algorithm_mime_and_ivs() {
    let (ct, meta) = encrypt_for_storage(b"%PDF", &master(), "application/pdf").unwrap();
    assert_eq!(meta.algorithm, ALGORITHM);
    assert_eq!(meta.mime_type, "application/pdf");
    assert_eq!(meta.file_iv.len(), 12);
    assert_eq!(meta.dek_iv.len(), 12);
    // 32-byte DEK plus tag.
    assert_eq!(meta.encrypted_dek.len(), 48);
    assert_ne!(ct.as_slice(), b"%PDF");
}

#[test]
fn same_plaintext_encrypts_differently() {
    let key = master();
    let (ct1, m1) = encrypt_for_storage(b"same bytes", &key, "text/plain").unwrap();
    let (ct2, m2) = encrypt_for_storage(b"same bytes", &key, "text/plain").unwrap();
    assert_ne!(ct1, ct2);
    assert_ne!(m1.encrypted_dek, m2.encrypted_dek);
}

#[test]
fn empty_plaintext_roundtrips() {
    let key = master();
    let (ct, meta) = encrypt_for_storage(b"", &key, "text/plain").unwrap();
    assert_eq!(decrypt_from_storage(&ct, &meta, &key).unwrap(), b"");
}

#[test]
fn wrong_master_key_is_rejected() {
    let (ct, meta) = encrypt_for_storage(b"hello", &master(), "text/plain").unwrap();
    assert_auth_failure(decrypt_from_storage(&ct, &meta, &master()));
}

#[test]
fn tampered_ciphertext_is_rejected() {
    let key = master();
    let (mut ct, meta) = encrypt_for_storage(b"hello world", &key, "text/plain").unwrap();
    ct[3] ^= 0x80;
    assert_auth_failure(decrypt_from_storage(&ct, &meta, &key));
}

#[test]
fn tampered_meta_fields_are_rejected() {
    let key = master();
    let (ct, meta) = encrypt_for_storage(b"hello world", &key, "text/plain").unwrap();

    let mut m = meta.clone();
    m.encrypted_dek[0] ^= 0x01;
    assert_auth_failure(decrypt_from_storage(&ct, &m, &key));

    let mut m = meta.clone();
    m.dek_iv[11] ^= 0x01;
    assert_auth_failure(decrypt_from_storage(&ct, &m, &key));

    let mut m = meta;
    m.file_iv[5] ^= 0x01;
    assert_auth_failure(decrypt_from_storage(&ct, &m, &key));
}

#[test]
fn unknown_algorithm_is_rejected() {
    let key = master();
    let (ct, mut meta) = encrypt_for_storage(b"hello", &key, "text/plain").unwrap();
    meta.algorithm = "XChaCha20-Poly1305".into();
    assert!(matches!(
        decrypt_from_storage(&ct, &meta, &key),
        Err(PdfVaultError::UnsupportedAlgorithm(_))
    ));
}

#[test]
fn meta_json_uses_wire_field_names() {
    let (_, meta) = encrypt_for_storage(b"x", &master(), "application/pdf").unwrap();
    let json = meta.to_json().unwrap();
    for field in ["encryptedDEK", "dekIV", "fileIV", "algorithm", "mimeType"] {
        assert!(json.contains(field), "missing {field} in {json}");
    }

    let parsed = EncryptedBlobMeta::from_json(&json).unwrap();
    assert_eq!(parsed, meta);
}

#[test]
fn malformed_meta_json_is_invalid_metadata() {
    assert!(matches!(
        EncryptedBlobMeta::from_json("{\"algorithm\": 1}"),
        Err(PdfVaultError::InvalidMetadata(_))
    ));
}

#[test]
fn sidecar_files_roundtrip_on_disk() {
    let dir = TempDir::new().unwrap();
    let key = master();
    let object = dir.path().join("report.pdf.enc");
    let meta_path = sidecar_path(&object, ".meta.json");
    assert_eq!(meta_path, dir.path().join("report.pdf.enc.meta.json"));

    let (ct, meta) = encrypt_for_storage(b"%PDF-1.4", &key, "application/pdf").unwrap();
    write_atomic(&object, &ct).unwrap();
    write_sidecar(&meta_path, &meta).unwrap();

    let stored_ct = std::fs::read(&object).unwrap();
    let stored_meta = read_sidecar(&meta_path).unwrap();
    assert_eq!(
        decrypt_from_storage(&stored_ct, &stored_meta, &key).unwrap(),
        b"%PDF-1.4"
    );
}

#[test]
fn missing_sidecar_is_invalid_metadata() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        read_sidecar(&dir.path().join("absent.meta.json")),
        Err(PdfVaultError::InvalidMetadata(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_payload_roundtrips(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let key = master();
        let (ct, meta) = encrypt_for_storage(&data, &key, "application/octet-stream").unwrap();
        prop_assert_eq!(decrypt_from_storage(&ct, &meta, &key).unwrap(), data);
    }

    #[test]
    fn any_single_bit_flip_is_detected(
        data in proptest::collection::vec(any::<u8>(), 1..512),
        pos in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let key = master();
        let (mut ct, meta) = encrypt_for_storage(&data, &key, "text/plain").unwrap();
        let i = pos.index(ct.len());
        ct[i] ^= 1 << bit;
        prop_assert!(matches!(
            decrypt_from_storage(&ct, &meta, &key),
            Err(PdfVaultError::AuthenticationFailed)
        ));
    }

    #[test]
    fn any_meta_bit_flip_is_detected(
        field in 0usize..3,
        pos in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let key = master();
        let (ct, mut meta) = encrypt_for_storage(b"hello", &key, "text/plain").unwrap();
        let target = match field {
            0 => &mut meta.encrypted_dek,
            1 => &mut meta.dek_iv,
            _ => &mut meta.file_iv,
        };
        let i = pos.index(target.len());
        target[i] ^= 1 << bit;
        prop_assert!(matches!(
            decrypt_from_storage(&ct, &meta, &key),
            Err(PdfVaultError::AuthenticationFailed)
        ));
    }
}
