use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{PdfVaultError, Result};

/// Project-level configuration, loaded from `.pdfvault.toml`.
///
/// Every field has a sensible default so PdfVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding the local databases.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File name of the device key vault inside `data_dir`.
    #[serde(default = "default_key_db")]
    pub key_db: String,

    /// File name of the preferences store (backup acknowledgement).
    #[serde(default = "default_prefs_db")]
    pub prefs_db: String,

    /// MIME type recorded when none is given and the extension is unknown.
    #[serde(default = "default_mime_type")]
    pub default_mime_type: String,

    /// Suffix appended to an encrypted object's path for its metadata file.
    #[serde(default = "default_meta_suffix")]
    pub meta_suffix: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_dir() -> String {
    ".pdfvault".to_string()
}

fn default_key_db() -> String {
    "keys.db".to_string()
}

fn default_prefs_db() -> String {
    "prefs.db".to_string()
}

fn default_mime_type() -> String {
    crate::envelope::DEFAULT_MIME_TYPE.to_string()
}

fn default_meta_suffix() -> String {
    ".meta.json".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key_db: default_key_db(),
            prefs_db: default_prefs_db(),
            default_mime_type: default_mime_type(),
            meta_suffix: default_meta_suffix(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".pdfvault.toml";

    /// Load settings from `<project_dir>/.pdfvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PdfVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path of the data directory.
    ///
    /// An absolute `data_dir` is used as-is.
    pub fn data_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_dir)
    }

    /// Full path of the device key vault database.
    ///
    /// Example: `project_dir/.pdfvault/keys.db`
    pub fn key_db_path(&self, project_dir: &Path) -> PathBuf {
        self.data_path(project_dir).join(&self.key_db)
    }

    /// Full path of the preferences database.
    pub fn prefs_db_path(&self, project_dir: &Path) -> PathBuf {
        self.data_path(project_dir).join(&self.prefs_db)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.data_dir, ".pdfvault");
        assert_eq!(s.key_db, "keys.db");
        assert_eq!(s.prefs_db, "prefs.db");
        assert_eq!(s.default_mime_type, "application/octet-stream");
        assert_eq!(s.meta_suffix, ".meta.json");
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, ".pdfvault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
data_dir = "keys"
key_db = "device.db"
prefs_db = "ui.db"
default_mime_type = "application/pdf"
meta_suffix = ".envelope"
"#;
        fs::write(tmp.path().join(".pdfvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, "keys");
        assert_eq!(settings.key_db, "device.db");
        assert_eq!(settings.prefs_db, "ui.db");
        assert_eq!(settings.default_mime_type, "application/pdf");
        assert_eq!(settings.meta_suffix, ".envelope");
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pdfvault.toml"), "data_dir = \"custom\"\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, "custom");
        assert_eq!(settings.key_db, "keys.db");
        assert_eq!(settings.meta_suffix, ".meta.json");
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pdfvault.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(PdfVaultError::ConfigError(_))));
    }

    #[test]
    fn db_paths_are_inside_data_dir() {
        let s = Settings::default();
        let project = Path::new("/home/user/docs");
        assert_eq!(
            s.key_db_path(project),
            PathBuf::from("/home/user/docs/.pdfvault/keys.db")
        );
        assert_eq!(
            s.prefs_db_path(project),
            PathBuf::from("/home/user/docs/.pdfvault/prefs.db")
        );
    }

    #[test]
    fn absolute_data_dir_is_respected() {
        let s = Settings {
            data_dir: "/var/lib/pdfvault".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            s.key_db_path(Path::new("/home/user/docs")),
            PathBuf::from("/var/lib/pdfvault/keys.db")
        );
    }
}
