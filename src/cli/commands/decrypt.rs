//! `pdfvault decrypt`: decrypt a downloaded object with its metadata.
//!
//! All-or-nothing: the plaintext file is only written once the whole
//! object has authenticated.

use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use super::encrypt::ENCRYPTED_SUFFIX;
use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::envelope::{decrypt_from_storage, read_sidecar, sidecar_path, write_atomic};
use crate::errors::{PdfVaultError, Result};

/// Execute the `decrypt` command.
pub fn execute(
    cli: &Cli,
    input: &str,
    meta: Option<&str>,
    output_path: Option<&str>,
    force: bool,
) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let input = Path::new(input);

    let out = match output_path {
        Some(p) => PathBuf::from(p),
        None => default_output(input)?,
    };
    if out.exists() && !force {
        return Err(PdfVaultError::CommandFailed(format!(
            "{} already exists (use --force to overwrite)",
            out.display()
        )));
    }

    let meta_path = meta.map_or_else(
        || sidecar_path(input, &ctx.settings.meta_suffix),
        PathBuf::from,
    );
    let meta = read_sidecar(&meta_path)?;

    let key = ctx.key_manager().require_master_key()?;

    let ciphertext = fs::read(input)?;
    let plain = Zeroizing::new(decrypt_from_storage(&ciphertext, &meta, &key)?);

    write_atomic(&out, &plain)?;

    output::success(&format!(
        "Decrypted {} ({}) to {}",
        input.display(),
        meta.mime_type,
        out.display()
    ));

    Ok(())
}

/// Strip the `.enc` suffix to get the default plaintext path.
fn default_output(input: &Path) -> Result<PathBuf> {
    input
        .to_str()
        .and_then(|s| s.strip_suffix(ENCRYPTED_SUFFIX))
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            PdfVaultError::CommandFailed(format!(
                "cannot infer an output name for {}, use --output",
                input.display()
            ))
        })
}
