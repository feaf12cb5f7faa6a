pub mod audit_cmd;
pub mod backup;
pub mod completions;
pub mod decrypt;
pub mod encrypt;
pub mod fingerprint;
pub mod forget;
pub mod init;
pub mod restore;
pub mod status;
pub mod version;
