//! `pdfvault backup`: manage the recovery phrase backup confirmation.
//!
//! Subcommands:
//! - `pdfvault backup confirm`  re-enter the phrase to confirm it is saved
//! - `pdfvault backup status`   show whether the active key is confirmed
//! - `pdfvault backup clear`    forget the confirmation

use crate::cli::output;
use crate::cli::{phrase_from_arg_or_prompt, Cli, Context};
use crate::errors::Result;

/// Execute `pdfvault backup confirm`.
pub fn execute_confirm(cli: &Cli, phrase: Option<&str>) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let key = ctx.key_manager().require_master_key()?;
    let ack = ctx.backup_ack();

    let phrase = phrase_from_arg_or_prompt(phrase, "Re-enter your recovery phrase")?;
    let fingerprint = ack.confirm_phrase(&phrase, &key)?;

    if !ack.is_available() {
        output::warning("Preferences store unavailable, the confirmation was not saved.");
        return Ok(());
    }

    ctx.audit("backup-confirm", Some(&fingerprint), None);
    output::success("Recovery phrase confirmed.");
    Ok(())
}

/// Execute `pdfvault backup status`.
pub fn execute_status(cli: &Cli) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let key = ctx.key_manager().require_master_key()?;

    if ctx.backup_ack().is_backup_confirmed_for(&key.fingerprint()) {
        output::success("Recovery phrase backup is confirmed for the active key.");
    } else {
        output::warning("Recovery phrase backup is NOT confirmed for the active key.");
        output::tip("Run `pdfvault backup confirm` after saving your recovery phrase.");
    }
    Ok(())
}

/// Execute `pdfvault backup clear`.
pub fn execute_clear(cli: &Cli) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    ctx.backup_ack().clear_backup_confirmed();
    ctx.audit("backup-clear", None, None);
    output::success("Backup confirmation cleared.");
    Ok(())
}
