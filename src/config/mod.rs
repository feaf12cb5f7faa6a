//! Project configuration loaded from `.pdfvault.toml`.

pub mod settings;

pub use settings::Settings;
