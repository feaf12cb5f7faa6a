//! Symmetric primitives for PdfVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption with detached IVs (`encryption`)
//! - Master, data and device key types plus fingerprints (`keys`)
//! - Recovery phrase encoding and decoding (`phrase`)
//! - Base64 helpers for the metadata bundle (`encoding`)

pub mod encoding;
pub mod encryption;
pub mod keys;
pub mod phrase;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{generate_master_key, master_key_to_phrase, ...};
pub use encoding::{base64_decode, base64_encode};
pub use encryption::{decrypt_bytes, encrypt_bytes, Iv, IV_LEN};
pub use keys::{
    generate_master_key, master_key_fingerprint, DeviceKey, KeyFingerprint, MasterKey, KEY_LEN,
};
pub use phrase::{master_key_to_phrase, phrase_to_master_key, RecoveryPhrase};
