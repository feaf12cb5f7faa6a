//! `pdfvault encrypt`: envelope-encrypt a file for upload.
//!
//! Writes `<output>` (ciphertext) and `<output>.meta.json` (metadata
//! bundle). Both are needed, together with the master key, to decrypt.

use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::envelope::{
    encrypt_for_storage, guess_mime_type, sidecar_path, write_atomic, write_sidecar,
    DEFAULT_MIME_TYPE,
};
use crate::errors::{PdfVaultError, Result};

/// Default suffix for ciphertext files.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Execute the `encrypt` command.
pub fn execute(
    cli: &Cli,
    input: &str,
    output_path: Option<&str>,
    mime: Option<&str>,
    force: bool,
) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let input = Path::new(input);

    let out = output_path.map_or_else(|| sidecar_path(input, ENCRYPTED_SUFFIX), PathBuf::from);
    let meta_path = sidecar_path(&out, &ctx.settings.meta_suffix);

    if !force {
        for path in [&out, &meta_path] {
            if path.exists() {
                return Err(PdfVaultError::CommandFailed(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
        }
    }

    let key = ctx.key_manager().require_master_key()?;

    let mime_type = match mime {
        Some(m) => m.to_string(),
        None => match guess_mime_type(input) {
            DEFAULT_MIME_TYPE => ctx.settings.default_mime_type.clone(),
            guessed => guessed.to_string(),
        },
    };

    let plain = Zeroizing::new(fs::read(input)?);
    let (ciphertext, meta) = encrypt_for_storage(&plain, &key, &mime_type)?;

    write_atomic(&out, &ciphertext)?;
    write_sidecar(&meta_path, &meta)?;

    output::success(&format!(
        "Encrypted {} ({mime_type}) to {}",
        input.display(),
        out.display()
    ));
    output::info(&format!("Metadata written to {}", meta_path.display()));

    Ok(())
}
