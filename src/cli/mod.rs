//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::audit;
use crate::backup_ack::BackupAck;
use crate::config::Settings;
use crate::crypto::keys::KeyFingerprint;
use crate::errors::{PdfVaultError, Result};
use crate::lifecycle::KeyManager;

/// Environment variable consulted for a recovery phrase before prompting.
pub const PHRASE_ENV: &str = "PDFVAULT_PHRASE";

/// PdfVault CLI: client-side encryption for documents in untrusted storage.
#[derive(Parser)]
#[command(
    name = "pdfvault",
    about = "Client-side envelope encryption with recoverable master keys",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory for the key vault (overrides .pdfvault.toml)
    #[arg(long, global = true, env = "PDFVAULT_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Enable debug logging (or set PDFVAULT_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a master key on this device and show its recovery phrase
    Init {
        /// Replace an existing master key
        #[arg(long)]
        force: bool,
    },

    /// Restore the master key from a recovery phrase
    Restore {
        /// Recovery phrase (omit for a hidden prompt)
        phrase: Option<String>,
    },

    /// Show key and backup status for this device
    Status,

    /// Print the fingerprint of the active master key
    Fingerprint,

    /// Encrypt a file for upload (writes ciphertext + metadata)
    Encrypt {
        /// File to encrypt
        input: String,

        /// Ciphertext path (default: <input>.enc)
        #[arg(short, long)]
        output: Option<String>,

        /// MIME type to record (default: guessed from the extension)
        #[arg(long)]
        mime: Option<String>,

        /// Overwrite existing output files
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt a downloaded file using its metadata
    Decrypt {
        /// Ciphertext file
        input: String,

        /// Metadata file (default: <input>.meta.json)
        #[arg(short, long)]
        meta: Option<String>,

        /// Plaintext path (default: <input> without .enc)
        #[arg(short, long)]
        output: Option<String>,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
    },

    /// Erase all key material stored on this device
    Forget {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Manage the recovery phrase backup confirmation
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// View the audit log of key lifecycle events
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

/// Backup subcommands.
#[derive(clap::Subcommand)]
pub enum BackupAction {
    /// Confirm the recovery phrase is saved by entering it again
    Confirm {
        /// Recovery phrase (omit for a hidden prompt)
        phrase: Option<String>,
    },

    /// Show whether the active key's phrase is confirmed
    Status,

    /// Forget the confirmation
    Clear,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolved locations and settings for one command invocation.
pub struct Context {
    pub project_dir: PathBuf,
    pub settings: Settings,
}

impl Context {
    /// Load `.pdfvault.toml` from the current directory and apply CLI
    /// overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        Self::load(&project_dir, cli.data_dir.as_deref())
    }

    /// Load settings from `project_dir`, optionally overriding the data dir.
    pub fn load(project_dir: &Path, data_dir: Option<&str>) -> Result<Self> {
        let mut settings = Settings::load(project_dir)?;
        if let Some(dir) = data_dir {
            settings.data_dir = dir.to_string();
        }
        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            settings,
        })
    }

    /// The directory holding all local databases.
    pub fn data_dir(&self) -> PathBuf {
        self.settings.data_path(&self.project_dir)
    }

    /// Open the master key manager (degraded if the vault is unusable).
    pub fn key_manager(&self) -> KeyManager {
        KeyManager::open(&self.settings.key_db_path(&self.project_dir))
    }

    /// Open the backup acknowledgement tracker (disabled if unusable).
    pub fn backup_ack(&self) -> BackupAck {
        BackupAck::open(&self.settings.prefs_db_path(&self.project_dir))
    }

    /// Record a lifecycle event; never fails.
    pub fn audit(&self, op: &str, fingerprint: Option<&KeyFingerprint>, details: Option<&str>) {
        audit::log_audit(&self.data_dir(), op, fingerprint, details);
    }
}

/// Get a recovery phrase, trying in order:
/// 1. `PDFVAULT_PHRASE` env var (scripted restores)
/// 2. Hidden interactive prompt
///
/// Returns `Zeroizing<String>` so the phrase is wiped from memory on drop.
pub fn prompt_phrase(prompt: &str) -> Result<Zeroizing<String>> {
    if let Ok(phrase) = std::env::var(PHRASE_ENV) {
        if !phrase.trim().is_empty() {
            return Ok(Zeroizing::new(phrase));
        }
    }

    let phrase = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| PdfVaultError::CommandFailed(format!("phrase prompt: {e}")))?;
    Ok(Zeroizing::new(phrase))
}

/// Use the phrase given on the command line, or prompt for one.
pub fn phrase_from_arg_or_prompt(arg: Option<&str>, prompt: &str) -> Result<Zeroizing<String>> {
    match arg {
        Some(p) => Ok(Zeroizing::new(p.to_string())),
        None => prompt_phrase(prompt),
    }
}
