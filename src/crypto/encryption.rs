//! AES-256-GCM authenticated encryption with a detached IV.
//!
//! Each call to `encrypt_bytes` generates a fresh random 96-bit IV and
//! returns it next to the ciphertext instead of prepending it: the
//! metadata bundle stores IVs in their own fields.
//!
//! The returned ciphertext always ends with the 16-byte GCM tag.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{PdfVaultError, Result};

/// Size of the AES-256-GCM IV in bytes (96 bits).
pub const IV_LEN: usize = 12;

/// A 96-bit AES-GCM initialization vector.
pub type Iv = [u8; IV_LEN];

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns `(ciphertext, iv)`. The IV is random per call and must be
/// stored alongside the ciphertext.
pub fn encrypt_bytes(key: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Iv)> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| PdfVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| PdfVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(&nonce);
    Ok((ciphertext, iv))
}

/// Decrypt data produced by `encrypt_bytes`.
///
/// Any failure (wrong key, wrong IV, tampered bytes) collapses into
/// `AuthenticationFailed`. No partial plaintext is ever returned.
pub fn decrypt_bytes(key: &[u8], ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
    if iv.len() != IV_LEN {
        return Err(PdfVaultError::AuthenticationFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| PdfVaultError::AuthenticationFailed)?;

    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| PdfVaultError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let key = [0x42u8; 32];
        let (ct, iv) = encrypt_bytes(&key, b"hello").unwrap();
        assert_eq!(ct.len(), 5 + 16);
        assert_eq!(decrypt_bytes(&key, &ct, &iv).unwrap(), b"hello");
    }

    #[test]
    fn ivs_differ_between_calls() {
        let key = [0x42u8; 32];
        let (_, iv1) = encrypt_bytes(&key, b"same").unwrap();
        let (_, iv2) = encrypt_bytes(&key, b"same").unwrap();
        assert_ne!(iv1, iv2);
    }

    #[test]
    fn wrong_iv_length_is_authentication_failure() {
        let key = [0x42u8; 32];
        let (ct, _) = encrypt_bytes(&key, b"data").unwrap();
        let err = decrypt_bytes(&key, &ct, &[0u8; 8]).unwrap_err();
        assert!(matches!(err, PdfVaultError::AuthenticationFailed));
    }

    #[test]
    fn short_key_is_rejected_on_encrypt() {
        let err = encrypt_bytes(&[0u8; 16], b"data").unwrap_err();
        assert!(matches!(err, PdfVaultError::EncryptionFailed(_)));
    }
}
