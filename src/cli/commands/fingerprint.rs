//! `pdfvault fingerprint`: print the active master key's fingerprint.

use crate::cli::{Cli, Context};
use crate::errors::Result;

/// Execute the `fingerprint` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let key = ctx.key_manager().require_master_key()?;
    println!("{}", key.fingerprint());
    Ok(())
}
