//! Records persisted in the device key vault.
//!
//! The vault holds at most two rows, keyed by fixed identifiers:
//!
//! | id                   | material                     | iv        |
//! |----------------------|------------------------------|-----------|
//! | `device-key`         | device wrapping key          | NULL      |
//! | `wrapped-master-key` | master key wrapped by device | 12 bytes  |

use chrono::{DateTime, Utc};

use crate::crypto::encryption::{Iv, IV_LEN};
use crate::errors::{PdfVaultError, Result};

/// Record id of the per-device wrapping key.
pub const DEVICE_KEY_ID: &str = "device-key";

/// Record id of the wrapped master key.
pub const WRAPPED_MASTER_KEY_ID: &str = "wrapped-master-key";

/// The master key encrypted under the device key.
///
/// Only meaningful next to the device key that produced it.
#[derive(Debug, Clone)]
pub struct WrappedMasterKeyRecord {
    pub wrapped_key_bytes: Vec<u8>,
    pub iv: Iv,
    pub created_at: DateTime<Utc>,
}

impl WrappedMasterKeyRecord {
    /// Rebuild a record from the raw columns of the `keys` table.
    pub(crate) fn from_columns(
        material: Vec<u8>,
        iv: Option<Vec<u8>>,
        created_at: &str,
    ) -> Result<Self> {
        let iv = iv.ok_or_else(|| {
            PdfVaultError::VaultIntegrity("wrapped master key record has no IV".into())
        })?;
        let iv: Iv = iv.as_slice().try_into().map_err(|_| {
            PdfVaultError::VaultIntegrity(format!(
                "wrapped master key IV must be {IV_LEN} bytes, found {}",
                iv.len()
            ))
        })?;

        let created_at = DateTime::parse_from_rfc3339(created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                PdfVaultError::VaultIntegrity(format!(
                    "wrapped master key has an invalid timestamp '{created_at}': {e}"
                ))
            })?;

        Ok(Self {
            wrapped_key_bytes: material,
            iv,
            created_at,
        })
    }
}
