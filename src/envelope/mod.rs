//! Envelope encryption for objects handed to external storage.
//!
//! Every object gets its own one-time data key (DEK):
//!
//! 1. encrypt the plaintext under the DEK (`fileIV`),
//! 2. encrypt the DEK's raw bytes under the master key (`dekIV`),
//! 3. return the ciphertext plus an [`EncryptedBlobMeta`] bundle.
//!
//! The master key never touches bulk content. The codec is stateless and
//! never reads or writes the key vault.

pub mod meta;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::crypto::keys::{DataKey, MasterKey};
use crate::errors::{PdfVaultError, Result};

pub use meta::{EncryptedBlobMeta, ALGORITHM};

/// Fallback MIME type when nothing better is known.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Encrypt `plain_bytes` for storage under a fresh data key.
///
/// Returns the ciphertext and the metadata bundle to persist next to it.
pub fn encrypt_for_storage(
    plain_bytes: &[u8],
    master_key: &MasterKey,
    mime_type: &str,
) -> Result<(Vec<u8>, EncryptedBlobMeta)> {
    let data_key = DataKey::generate()?;

    let (encrypted_bytes, file_iv) = data_key.encrypt(plain_bytes)?;
    let (encrypted_dek, dek_iv) = master_key.encrypt(data_key.as_bytes())?;

    debug!(
        size = plain_bytes.len(),
        mime_type,
        "Encrypted object for storage"
    );

    Ok((
        encrypted_bytes,
        EncryptedBlobMeta {
            encrypted_dek,
            dek_iv: dek_iv.to_vec(),
            file_iv: file_iv.to_vec(),
            algorithm: ALGORITHM.to_string(),
            mime_type: mime_type.to_string(),
        },
    ))
}

/// Decrypt an object previously produced by [`encrypt_for_storage`].
///
/// Fails with `AuthenticationFailed` on a wrong master key or any
/// tampering with the ciphertext, the wrapped DEK or either IV.
pub fn decrypt_from_storage(
    encrypted_bytes: &[u8],
    meta: &EncryptedBlobMeta,
    master_key: &MasterKey,
) -> Result<Vec<u8>> {
    meta.check_algorithm()?;

    let data_key = {
        let raw = zeroize::Zeroizing::new(master_key.decrypt(&meta.encrypted_dek, &meta.dek_iv)?);
        DataKey::from_slice(&raw)?
    };

    let plain = data_key.decrypt(encrypted_bytes, &meta.file_iv)?;

    debug!(
        size = plain.len(),
        mime_type = meta.mime_type.as_str(),
        "Decrypted object from storage"
    );

    Ok(plain)
}

// ---------------------------------------------------------------------------
// Sidecar files
// ---------------------------------------------------------------------------

/// Path of the metadata sidecar for an object: `<object><suffix>`.
pub fn sidecar_path(object_path: &Path, suffix: &str) -> PathBuf {
    let mut name = object_path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Write bytes to disk **atomically**.
///
/// Writes to a temp file in the same directory, then renames it over the
/// target, so readers never see a half-written object.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Write a metadata bundle next to its object.
pub fn write_sidecar(path: &Path, meta: &EncryptedBlobMeta) -> Result<()> {
    write_atomic(path, meta.to_json()?.as_bytes())
}

/// Read a metadata bundle from disk.
pub fn read_sidecar(path: &Path) -> Result<EncryptedBlobMeta> {
    if !path.exists() {
        return Err(PdfVaultError::InvalidMetadata(format!(
            "metadata file not found at {}",
            path.display()
        )));
    }
    let json = fs::read_to_string(path)?;
    EncryptedBlobMeta::from_json(&json)
}

/// Guess a MIME type from a file extension.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("json") => "application/json",
        Some("zip") => "application/zip",
        _ => DEFAULT_MIME_TYPE,
    }
}
