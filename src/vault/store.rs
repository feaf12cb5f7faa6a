//! SQLite-backed key vault.
//!
//! `KeyVault` keeps the master key on this device in a form that is
//! useless elsewhere: wrapped under a per-device key that is generated
//! once, lazily, on the first write.
//!
//! Every multi-step operation runs inside a single `IMMEDIATE`
//! transaction, so a reader never sees a wrapped master key without the
//! device key that produced it, and an interrupted write leaves either
//! the old state or the new one.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

use super::records::{WrappedMasterKeyRecord, DEVICE_KEY_ID, WRAPPED_MASTER_KEY_ID};
use crate::crypto::keys::{DeviceKey, MasterKey};
use crate::errors::{PdfVaultError, Result};

/// How long a connection waits on another process's write lock.
pub(crate) const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Map a storage error into `VaultUnavailable` with some context.
fn unavailable(context: &'static str) -> impl FnOnce(rusqlite::Error) -> PdfVaultError {
    move |e| PdfVaultError::VaultUnavailable(format!("{context}: {e}"))
}

/// The device key vault handle.
pub struct KeyVault {
    conn: Connection,

    /// Database location, `None` for in-memory vaults.
    path: Option<PathBuf>,
}

impl KeyVault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open (or create) the vault database at `path`.
    ///
    /// The parent directory is created if needed and the database file
    /// is restricted to the owner on Unix.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    PdfVaultError::VaultUnavailable(format!(
                        "cannot create vault directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let conn = Connection::open(path).map_err(unavailable("open key vault"))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(unavailable("set key vault busy timeout"))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, perms).map_err(|e| {
                PdfVaultError::VaultUnavailable(format!("failed to restrict vault permissions: {e}"))
            })?;
        }

        Self::init_schema(&conn)?;
        debug!(path = %path.display(), "Opened key vault");

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a vault that lives only as long as this handle.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(unavailable("open key vault"))?;
        Self::init_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS keys (
                id         TEXT PRIMARY KEY,
                material   BLOB NOT NULL,
                iv         BLOB,
                created_at TEXT NOT NULL
            );",
        )
        .map_err(unavailable("initialize key vault"))
    }

    // ------------------------------------------------------------------
    // Device key
    // ------------------------------------------------------------------

    /// Return this device's wrapping key, creating it on first use.
    ///
    /// Idempotent: later calls return the stored key.
    pub fn get_or_create_device_key(&mut self) -> Result<DeviceKey> {
        let tx = self.begin_write()?;
        let key = Self::get_or_create_device_key_in(&tx)?;
        tx.commit().map_err(unavailable("commit device key"))?;
        Ok(key)
    }

    fn get_or_create_device_key_in(tx: &Transaction<'_>) -> Result<DeviceKey> {
        if let Some(existing) = Self::read_device_key(tx)? {
            return Ok(existing);
        }

        let key = DeviceKey::generate()?;
        tx.execute(
            "INSERT INTO keys (id, material, iv, created_at) VALUES (?1, ?2, NULL, ?3)",
            params![DEVICE_KEY_ID, key.stored_material(), Utc::now().to_rfc3339()],
        )
        .map_err(unavailable("store device key"))?;

        info!("Provisioned new device key");
        Ok(key)
    }

    fn read_device_key(conn: &Connection) -> Result<Option<DeviceKey>> {
        let material: Option<Vec<u8>> = conn
            .query_row(
                "SELECT material FROM keys WHERE id = ?1",
                params![DEVICE_KEY_ID],
                |row| row.get(0),
            )
            .optional()
            .map_err(unavailable("read device key"))?;

        material.map(|m| DeviceKey::from_stored(&m)).transpose()
    }

    // ------------------------------------------------------------------
    // Master key
    // ------------------------------------------------------------------

    /// Wrap `master_key` under the device key and store it.
    ///
    /// Replaces any previously stored master key. The device key is
    /// created in the same transaction if this is the first write.
    pub fn save_master_key(&mut self, master_key: &MasterKey) -> Result<()> {
        let tx = self.begin_write()?;

        let device_key = Self::get_or_create_device_key_in(&tx)?;
        let (wrapped, iv) = device_key.wrap(master_key)?;

        tx.execute(
            "INSERT OR REPLACE INTO keys (id, material, iv, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                WRAPPED_MASTER_KEY_ID,
                wrapped,
                iv.as_slice(),
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(unavailable("store wrapped master key"))?;

        tx.commit().map_err(unavailable("commit wrapped master key"))?;

        let fingerprint = master_key.fingerprint();
        info!(key = fingerprint.short(), "Master key saved to device vault");
        Ok(())
    }

    /// Load and unwrap the stored master key.
    ///
    /// Returns `Ok(None)` when no master key has been stored on this
    /// device. A wrapped record without its device key is reported as
    /// `VaultIntegrity`: the record can never be unwrapped again and the
    /// user has to recover from their phrase.
    pub fn load_master_key(&mut self) -> Result<Option<MasterKey>> {
        let tx = self
            .conn
            .transaction()
            .map_err(unavailable("begin read transaction"))?;

        let Some(record) = Self::read_wrapped_record(&tx)? else {
            return Ok(None);
        };

        let Some(device_key) = Self::read_device_key(&tx)? else {
            warn!("Wrapped master key found without a device key");
            return Err(PdfVaultError::VaultIntegrity(
                "wrapped master key present but the device key is missing; restore from your recovery phrase".into(),
            ));
        };

        tx.finish().map_err(unavailable("end read transaction"))?;

        let key = device_key.unwrap(&record.wrapped_key_bytes, &record.iv)?;
        let fingerprint = key.fingerprint();
        debug!(key = fingerprint.short(), "Master key loaded from device vault");
        Ok(Some(key))
    }

    /// Read the wrapped master key record without unwrapping it.
    pub fn wrapped_master_key_record(&self) -> Result<Option<WrappedMasterKeyRecord>> {
        Self::read_wrapped_record(&self.conn)
    }

    fn read_wrapped_record(conn: &Connection) -> Result<Option<WrappedMasterKeyRecord>> {
        let row: Option<(Vec<u8>, Option<Vec<u8>>, String)> = conn
            .query_row(
                "SELECT material, iv, created_at FROM keys WHERE id = ?1",
                params![WRAPPED_MASTER_KEY_ID],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(unavailable("read wrapped master key"))?;

        row.map(|(material, iv, created_at)| {
            WrappedMasterKeyRecord::from_columns(material, iv, &created_at)
        })
        .transpose()
    }

    /// Returns `true` if a wrapped master key record exists.
    ///
    /// Existence check only; nothing is unwrapped.
    pub fn has_stored_master_key(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM keys WHERE id = ?1",
                params![WRAPPED_MASTER_KEY_ID],
                |row| row.get(0),
            )
            .map_err(unavailable("check wrapped master key"))?;
        Ok(count > 0)
    }

    /// Delete both the wrapped master key and the device key.
    ///
    /// The next write provisions a fresh device key.
    pub fn clear_stored_master_key(&mut self) -> Result<()> {
        let tx = self.begin_write()?;
        tx.execute(
            "DELETE FROM keys WHERE id IN (?1, ?2)",
            params![WRAPPED_MASTER_KEY_ID, DEVICE_KEY_ID],
        )
        .map_err(unavailable("clear key vault"))?;
        tx.commit().map_err(unavailable("commit key vault clear"))?;

        info!("Cleared device vault");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the database path, or `None` for an in-memory vault.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn begin_write(&mut self) -> Result<Transaction<'_>> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(unavailable("begin write transaction"))
    }
}
