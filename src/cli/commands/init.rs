//! `pdfvault init`: create a master key and show its recovery phrase.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PdfVaultError, Result};

/// Execute the `init` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let mut keys = ctx.key_manager();

    // 1. Refuse to silently replace an existing key.
    if keys.check_master_key()? {
        if !force {
            output::tip("Run `pdfvault status` to see the active key.");
            return Err(PdfVaultError::MasterKeyExists);
        }
        output::warning(
            "Replacing the stored master key. Files encrypted with it need its old phrase.",
        );
    }

    // 2. Generate, wrap and store the key.
    let created = keys.create_and_store_master_key()?;
    let fingerprint = created.key.fingerprint();

    // 3. Audit log.
    ctx.audit("create", Some(&fingerprint), None);

    // 4. Show the phrase exactly once.
    output::success(&format!(
        "Master key {} created and stored on this device.",
        fingerprint.short()
    ));
    output::print_phrase(&created.phrase);
    output::warning("Write this phrase down now. It will not be shown again.");
    output::tip("Run `pdfvault backup confirm` once it is stored safely.");

    Ok(())
}
