//! Key types with secure memory handling.
//!
//! Three 256-bit AES-GCM keys live here:
//! - **MasterKey**: long-lived, user-scoped. Its raw bytes can be
//!   exported for phrase encoding and wrapping, never persisted unwrapped.
//! - **DataKey**: one-time per-object key used by the envelope codec.
//! - **DeviceKey**: per-device wrapping key. It has no public accessor
//!   for its raw bytes; it can only wrap and unwrap a `MasterKey`. The
//!   non-exportability is enforced by this API, not by the platform.
//!
//! All key types zero their memory on drop.

use std::fmt;

use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::encryption::{decrypt_bytes, encrypt_bytes, Iv};
use crate::errors::{PdfVaultError, Result};

/// Length of every symmetric key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Fill a fresh key buffer from the operating system RNG.
fn random_key_bytes() -> Result<[u8; KEY_LEN]> {
    let mut bytes = [0u8; KEY_LEN];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| PdfVaultError::EncryptionFailed(format!("OS RNG unavailable: {e}")))?;
    Ok(bytes)
}

// ---------------------------------------------------------------------------
// MasterKey
// ---------------------------------------------------------------------------

/// The user's long-lived master key.
///
/// Used only to wrap per-object data keys, never to encrypt file content
/// directly.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Generate a new random master key.
    pub fn generate() -> Result<Self> {
        let mut bytes = random_key_bytes()?;
        let key = Self { bytes };
        bytes.zeroize();
        Ok(key)
    }

    /// Import a master key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Export the raw key bytes.
    ///
    /// The returned reference should be used immediately and never
    /// written anywhere unwrapped.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// SHA-256 fingerprint of the raw key, for equality checks only.
    pub fn fingerprint(&self) -> KeyFingerprint {
        KeyFingerprint(hex::encode(Sha256::digest(self.bytes)))
    }

    /// Encrypt `plaintext` under this key with a fresh IV.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<(Vec<u8>, Iv)> {
        encrypt_bytes(&self.bytes, plaintext)
    }

    /// Decrypt `ciphertext` produced by [`MasterKey::encrypt`].
    pub fn decrypt(&self, ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        decrypt_bytes(&self.bytes, ciphertext, iv)
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("fingerprint", &self.fingerprint().short())
            .finish()
    }
}

/// Generate a new random master key.
pub fn generate_master_key() -> Result<MasterKey> {
    MasterKey::generate()
}

/// Compute the fingerprint of a master key.
pub fn master_key_fingerprint(key: &MasterKey) -> KeyFingerprint {
    key.fingerprint()
}

// ---------------------------------------------------------------------------
// DataKey
// ---------------------------------------------------------------------------

/// One-time data encryption key (DEK) for a single stored object.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct DataKey {
    bytes: [u8; KEY_LEN],
}

impl DataKey {
    pub(crate) fn generate() -> Result<Self> {
        let mut bytes = random_key_bytes()?;
        let key = Self { bytes };
        bytes.zeroize();
        Ok(key)
    }

    /// Import a DEK recovered from an envelope.
    ///
    /// A DEK of the wrong length can only come from metadata that does
    /// not belong to this ciphertext, so it is reported as an
    /// authentication failure.
    pub(crate) fn from_slice(raw: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = raw
            .try_into()
            .map_err(|_| PdfVaultError::AuthenticationFailed)?;
        Ok(Self { bytes })
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    pub(crate) fn encrypt(&self, plaintext: &[u8]) -> Result<(Vec<u8>, Iv)> {
        encrypt_bytes(&self.bytes, plaintext)
    }

    pub(crate) fn decrypt(&self, ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        decrypt_bytes(&self.bytes, ciphertext, iv)
    }
}

// ---------------------------------------------------------------------------
// DeviceKey
// ---------------------------------------------------------------------------

/// Per-device wrapping key.
///
/// Only usable for [`DeviceKey::wrap`] and [`DeviceKey::unwrap`]. The key
/// vault is the single place that reads its material, and only to
/// persist it in device-local storage.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DeviceKey {
    bytes: [u8; KEY_LEN],
}

impl DeviceKey {
    pub(crate) fn generate() -> Result<Self> {
        let mut bytes = random_key_bytes()?;
        let key = Self { bytes };
        bytes.zeroize();
        Ok(key)
    }

    /// Rebuild a device key from its stored material.
    pub(crate) fn from_stored(material: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = material.try_into().map_err(|_| {
            PdfVaultError::VaultIntegrity(format!(
                "device key must be {KEY_LEN} bytes, found {}",
                material.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Material for device-local persistence. Not part of the public API.
    pub(crate) fn stored_material(&self) -> &[u8] {
        &self.bytes
    }

    /// Wrap a master key: encrypt its raw export under this device key.
    pub fn wrap(&self, master_key: &MasterKey) -> Result<(Vec<u8>, Iv)> {
        encrypt_bytes(&self.bytes, master_key.as_bytes())
    }

    /// Unwrap a master key previously produced by [`DeviceKey::wrap`].
    pub fn unwrap(&self, wrapped: &[u8], iv: &[u8]) -> Result<MasterKey> {
        let mut raw = decrypt_bytes(&self.bytes, wrapped, iv)?;
        let bytes: std::result::Result<[u8; KEY_LEN], _> = raw.as_slice().try_into();
        raw.zeroize();
        let bytes = bytes.map_err(|_| {
            PdfVaultError::VaultIntegrity("unwrapped master key has the wrong length".into())
        })?;
        Ok(MasterKey::from_bytes(bytes))
    }
}

impl fmt::Debug for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeviceKey(<non-exportable>)")
    }
}

// ---------------------------------------------------------------------------
// KeyFingerprint
// ---------------------------------------------------------------------------

/// Lower-case hex SHA-256 digest of a master key's raw bytes.
#[derive(Debug, Clone, Eq)]
pub struct KeyFingerprint(String);

impl KeyFingerprint {
    /// Wrap an externally stored fingerprint string.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 16 hex characters, for logs and compact display.
    pub fn short(&self) -> &str {
        self.0.get(..16).unwrap_or(&self.0)
    }
}

impl PartialEq for KeyFingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl fmt::Display for KeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
