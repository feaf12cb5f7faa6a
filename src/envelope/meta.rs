//! The metadata bundle stored next to every ciphertext object.
//!
//! Serialized as JSON with the field names external collaborators
//! already persist:
//!
//! ```json
//! {
//!   "encryptedDEK": "<base64>",
//!   "dekIV": "<base64>",
//!   "fileIV": "<base64>",
//!   "algorithm": "AES-GCM-256",
//!   "mimeType": "application/pdf"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::crypto::encoding::{deserialize_base64, serialize_base64};
use crate::errors::{PdfVaultError, Result};

/// The only algorithm tag this version writes or accepts.
pub const ALGORITHM: &str = "AES-GCM-256";

/// Everything needed, together with the master key, to decrypt one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBlobMeta {
    /// The object's data key, encrypted under the master key.
    #[serde(
        rename = "encryptedDEK",
        serialize_with = "serialize_base64",
        deserialize_with = "deserialize_base64"
    )]
    pub encrypted_dek: Vec<u8>,

    /// IV used to encrypt the data key.
    #[serde(
        rename = "dekIV",
        serialize_with = "serialize_base64",
        deserialize_with = "deserialize_base64"
    )]
    pub dek_iv: Vec<u8>,

    /// IV used to encrypt the object content.
    #[serde(
        rename = "fileIV",
        serialize_with = "serialize_base64",
        deserialize_with = "deserialize_base64"
    )]
    pub file_iv: Vec<u8>,

    /// Always `"AES-GCM-256"`.
    pub algorithm: String,

    /// MIME type of the plaintext, carried through untouched.
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl EncryptedBlobMeta {
    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PdfVaultError::SerializationError(format!("metadata: {e}")))
    }

    /// Parse the JSON wire format.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PdfVaultError::InvalidMetadata(format!("metadata JSON: {e}")))
    }

    /// Reject bundles written for an algorithm we do not implement.
    pub(crate) fn check_algorithm(&self) -> Result<()> {
        if self.algorithm == ALGORITHM {
            Ok(())
        } else {
            Err(PdfVaultError::UnsupportedAlgorithm(self.algorithm.clone()))
        }
    }
}
