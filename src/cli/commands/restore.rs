//! `pdfvault restore`: re-establish the master key from a recovery phrase.

use crate::cli::output;
use crate::cli::{phrase_from_arg_or_prompt, Cli, Context};
use crate::errors::Result;

/// Execute the `restore` command.
pub fn execute(cli: &Cli, phrase: Option<&str>) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let mut keys = ctx.key_manager();

    // Remember what was there so we can warn about replacing it.
    let previous = keys.stored_master_key().ok().flatten().map(|k| k.fingerprint());

    let phrase = phrase_from_arg_or_prompt(phrase, "Enter recovery phrase")?;
    let key = keys.restore_master_key_from_phrase(&phrase)?;
    let fingerprint = key.fingerprint();

    if previous.as_ref().is_some_and(|p| p != &fingerprint) {
        output::warning("A different master key was stored on this device and has been replaced.");
    }

    // Typing the phrase back in proves it has been kept.
    ctx.backup_ack().set_backup_confirmed_for(&fingerprint);

    ctx.audit("restore", Some(&fingerprint), None);
    output::success(&format!("Master key {} restored.", fingerprint.short()));

    Ok(())
}
