use thiserror::Error;

/// All errors that can occur in PdfVault.
#[derive(Debug, Error)]
pub enum PdfVaultError {
    // --- Crypto errors ---
    #[error("Invalid recovery phrase: expected 64 hex digits (8 groups of 8)")]
    InvalidPhraseFormat,

    #[error("Authentication failed: wrong key or tampered data")]
    AuthenticationFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Envelope errors ---
    #[error("Invalid encryption metadata: {0}")]
    InvalidMetadata(String),

    #[error("Unsupported algorithm '{0}' (expected AES-GCM-256)")]
    UnsupportedAlgorithm(String),

    // --- Key vault errors ---
    #[error("Key vault unavailable: {0}")]
    VaultUnavailable(String),

    #[error("Key vault integrity error: {0}")]
    VaultIntegrity(String),

    #[error("No master key on this device; run `pdfvault init` or `pdfvault restore`")]
    NoMasterKey,

    #[error("A master key is already stored on this device (use --force to replace it)")]
    MasterKeyExists,

    #[error("Recovery phrase does not match the active master key")]
    PhraseMismatch,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    AuditError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for PdfVault results.
pub type Result<T> = std::result::Result<T, PdfVaultError>;
