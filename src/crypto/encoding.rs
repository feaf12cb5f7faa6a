//! Base64 helpers for binary fields in the metadata bundle.
//!
//! Standard alphabet with padding, so bundles stay readable by any
//! `atob`-style decoder.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use crate::errors::{PdfVaultError, Result};

/// Encode bytes as standard padded base64.
pub fn base64_encode(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decode standard padded base64.
pub fn base64_decode(encoded: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded)
        .map_err(|e| PdfVaultError::InvalidMetadata(format!("invalid base64: {e}")))
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

pub(crate) fn serialize_base64<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&base64_encode(data))
}

pub(crate) fn deserialize_base64<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        assert_eq!(base64_encode(b"hello"), "aGVsbG8=");
        assert_eq!(base64_decode("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn invalid_input_is_metadata_error() {
        assert!(matches!(
            base64_decode("not base64!!"),
            Err(PdfVaultError::InvalidMetadata(_))
        ));
    }
}
