//! PdfVault: client-side envelope encryption for documents kept in
//! untrusted object storage.
//!
//! Every object gets its own data key, wrapped by a user master key. The
//! master key is custodied per device in a local vault (wrapped by a
//! non-exportable device key) and can be recreated anywhere from its
//! recovery phrase.

pub mod audit;
pub mod backup_ack;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod errors;
pub mod lifecycle;
pub mod vault;
