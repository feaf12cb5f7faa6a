//! Backup acknowledgement: "the user has saved the phrase for this key".
//!
//! Stores a single fingerprint in a small SQLite preferences database.
//! Confirmation is fingerprint-specific: a different master key is never
//! considered backed up by an older confirmation.
//!
//! Designed for graceful degradation: if the preferences database cannot
//! be opened, every read reports "not confirmed" and every write is a
//! no-op. Callers treat `false` as "ask the user again".

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::crypto::keys::{KeyFingerprint, MasterKey};
use crate::crypto::phrase::phrase_to_master_key;
use crate::errors::{PdfVaultError, Result};
use crate::vault::store::BUSY_TIMEOUT;

/// Preference name holding the last confirmed fingerprint.
pub const BACKUP_ACK_KEY: &str = "pdf-vault-backup-ack-fingerprint-v1";

/// Local backup-confirmation flag.
pub struct BackupAck {
    conn: Option<Connection>,
}

impl BackupAck {
    /// Open (or create) the preferences database at `path`.
    ///
    /// Never fails; an unusable path yields a disabled tracker.
    pub fn open(path: &Path) -> Self {
        let conn = Self::try_open(path);
        if conn.is_none() {
            warn!(path = %path.display(), "Preferences store unavailable, backup confirmation disabled");
        }
        Self { conn }
    }

    /// A tracker backed by a throwaway in-memory database.
    pub fn open_in_memory() -> Self {
        let conn = Connection::open_in_memory()
            .ok()
            .filter(|c| Self::init_schema(c).is_ok());
        Self { conn }
    }

    /// A tracker with no storage at all.
    pub fn disabled() -> Self {
        Self { conn: None }
    }

    fn try_open(path: &Path) -> Option<Connection> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).ok()?;
            }
        }

        let conn = Connection::open(path).ok()?;
        conn.busy_timeout(BUSY_TIMEOUT).ok()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            if let Err(e) = std::fs::set_permissions(path, perms) {
                warn!(path = %path.display(), error = %e, "Could not restrict preferences permissions");
            }
        }

        Self::init_schema(&conn).ok()?;
        Some(conn)
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS prefs (
                name  TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    /// Returns `true` if persistent storage is available.
    pub fn is_available(&self) -> bool {
        self.conn.is_some()
    }

    /// The fingerprint whose phrase was last confirmed, if any.
    pub fn confirmed_fingerprint(&self) -> Option<KeyFingerprint> {
        let conn = self.conn.as_ref()?;
        conn.query_row(
            "SELECT value FROM prefs WHERE name = ?1",
            params![BACKUP_ACK_KEY],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .ok()
        .flatten()
        .map(KeyFingerprint::from_hex)
    }

    /// Returns `true` only if the stored fingerprint equals `fingerprint`.
    pub fn is_backup_confirmed_for(&self, fingerprint: &KeyFingerprint) -> bool {
        self.confirmed_fingerprint()
            .is_some_and(|stored| &stored == fingerprint)
    }

    /// Record that the phrase for `fingerprint` has been saved.
    pub fn set_backup_confirmed_for(&self, fingerprint: &KeyFingerprint) {
        let Some(conn) = &self.conn else { return };
        match conn.execute(
            "INSERT OR REPLACE INTO prefs (name, value) VALUES (?1, ?2)",
            params![BACKUP_ACK_KEY, fingerprint.as_str()],
        ) {
            Ok(_) => debug!(key = fingerprint.short(), "Backup confirmed"),
            Err(e) => warn!(error = %e, "Could not record backup confirmation"),
        }
    }

    /// Forget any recorded confirmation.
    pub fn clear_backup_confirmed(&self) {
        let Some(conn) = &self.conn else { return };
        if let Err(e) = conn.execute(
            "DELETE FROM prefs WHERE name = ?1",
            params![BACKUP_ACK_KEY],
        ) {
            warn!(error = %e, "Could not clear backup confirmation");
        }
    }

    /// Confirm a backup by having the user re-enter their phrase.
    ///
    /// The acknowledgement is recorded only if `phrase` decodes to the
    /// `active` key.
    pub fn confirm_phrase(&self, phrase: &str, active: &MasterKey) -> Result<KeyFingerprint> {
        let entered = phrase_to_master_key(phrase)?.fingerprint();
        let expected = active.fingerprint();
        if entered != expected {
            return Err(PdfVaultError::PhraseMismatch);
        }
        self.set_backup_confirmed_for(&expected);
        Ok(expected)
    }
}
