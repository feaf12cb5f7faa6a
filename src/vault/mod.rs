//! Local key vault: device-scoped custody of the master key.
//!
//! This module provides:
//! - Record types and fixed record ids (`records`)
//! - The SQLite-backed `KeyVault` with transactional writes (`store`)

pub mod records;
pub mod store;

// Re-export the most commonly used items.
pub use records::{WrappedMasterKeyRecord, DEVICE_KEY_ID, WRAPPED_MASTER_KEY_ID};
pub use store::KeyVault;
