//! Master key lifecycle on this device.
//!
//! `KeyManager` is a thin layer over the [`KeyVault`] with no state of
//! its own. It also absorbs the degraded case where the vault cannot be
//! opened at all: reads then report "no key" and writes fail with
//! `VaultUnavailable`.

use std::path::Path;

use tracing::{info, warn};

use crate::crypto::keys::MasterKey;
use crate::crypto::phrase::{master_key_to_phrase, phrase_to_master_key, RecoveryPhrase};
use crate::errors::{PdfVaultError, Result};
use crate::vault::KeyVault;

/// A freshly created master key and its recovery phrase.
///
/// The phrase must be shown to the user now; it is not stored anywhere.
#[derive(Debug)]
pub struct NewMasterKey {
    pub key: MasterKey,
    pub phrase: RecoveryPhrase,
}

/// Entry point for master key custody on this device.
pub struct KeyManager {
    vault: Option<KeyVault>,
    unavailable_reason: Option<String>,
}

impl KeyManager {
    /// Open the key vault at `path`.
    ///
    /// Never fails: if the vault cannot be opened the manager runs in
    /// degraded mode.
    pub fn open(path: &Path) -> Self {
        match KeyVault::open(path) {
            Ok(vault) => Self::from_vault(vault),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Key vault unavailable");
                Self {
                    vault: None,
                    unavailable_reason: Some(e.to_string()),
                }
            }
        }
    }

    /// Wrap an already opened vault.
    pub fn from_vault(vault: KeyVault) -> Self {
        Self {
            vault: Some(vault),
            unavailable_reason: None,
        }
    }

    /// Returns `true` if the vault could be opened.
    pub fn is_available(&self) -> bool {
        self.vault.is_some()
    }

    /// Returns `true` if a master key is stored on this device.
    ///
    /// Storage failures read as "no key".
    pub fn has_master_key(&self) -> bool {
        match &self.vault {
            Some(vault) => vault.has_stored_master_key().unwrap_or_else(|e| {
                warn!(error = %e, "Could not check for a stored master key");
                false
            }),
            None => false,
        }
    }

    /// Like [`KeyManager::has_master_key`] but storage failures are
    /// returned instead of reading as "no key".
    ///
    /// An unavailable vault still reports `false`.
    pub fn check_master_key(&self) -> Result<bool> {
        match &self.vault {
            Some(vault) => vault.has_stored_master_key(),
            None => Ok(false),
        }
    }

    /// Load the stored master key, or `None` if this device is not set up.
    ///
    /// An unavailable vault reads as `None`. Integrity and authentication
    /// failures are returned as errors, never as "absent".
    pub fn stored_master_key(&mut self) -> Result<Option<MasterKey>> {
        let Some(vault) = self.vault.as_mut() else {
            return Ok(None);
        };

        match vault.load_master_key() {
            Err(PdfVaultError::VaultUnavailable(reason)) => {
                warn!(%reason, "Could not read the stored master key");
                Ok(None)
            }
            other => other,
        }
    }

    /// Like [`KeyManager::stored_master_key`] but absence is an error.
    pub fn require_master_key(&mut self) -> Result<MasterKey> {
        self.stored_master_key()?.ok_or(PdfVaultError::NoMasterKey)
    }

    /// Generate a new master key, store it, and derive its recovery phrase.
    pub fn create_and_store_master_key(&mut self) -> Result<NewMasterKey> {
        let vault = self.vault_for_write()?;

        let key = MasterKey::generate()?;
        vault.save_master_key(&key)?;
        let phrase = master_key_to_phrase(&key);

        let fingerprint = key.fingerprint();
        info!(key = fingerprint.short(), "Created new master key");
        Ok(NewMasterKey { key, phrase })
    }

    /// Decode `phrase` and store the resulting key, replacing any local key.
    pub fn restore_master_key_from_phrase(&mut self, phrase: &str) -> Result<MasterKey> {
        let key = phrase_to_master_key(phrase)?;
        self.vault_for_write()?.save_master_key(&key)?;

        let fingerprint = key.fingerprint();
        info!(key = fingerprint.short(), "Restored master key from recovery phrase");
        Ok(key)
    }

    /// Erase all local key material.
    pub fn remove_stored_master_key(&mut self) -> Result<()> {
        self.vault_for_write()?.clear_stored_master_key()
    }

    fn vault_for_write(&mut self) -> Result<&mut KeyVault> {
        let reason = self.unavailable_reason.clone();
        self.vault.as_mut().ok_or_else(|| {
            PdfVaultError::VaultUnavailable(reason.unwrap_or_else(|| "key vault not open".into()))
        })
    }
}
