//! `pdfvault forget`: erase all key material stored on this device.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PdfVaultError, Result};

/// Execute the `forget` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let mut keys = ctx.key_manager();

    let fingerprint = keys.stored_master_key().ok().flatten().map(|k| k.fingerprint());

    // Unless --force is set, ask for confirmation before erasing.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Erase the master key from this device? You will need your recovery phrase to decrypt files again.")
            .default(false)
            .interact()
            .map_err(|e| PdfVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    keys.remove_stored_master_key()?;
    ctx.backup_ack().clear_backup_confirmed();

    ctx.audit("remove", fingerprint.as_ref(), Some("device vault cleared"));
    output::success("Key material erased from this device.");

    Ok(())
}
