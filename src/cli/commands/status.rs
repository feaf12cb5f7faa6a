//! `pdfvault status`: show key custody and backup state for this device.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let mut keys = ctx.key_manager();
    let ack = ctx.backup_ack();

    let mut rows = vec![("Data directory", ctx.data_dir().display().to_string())];

    if !keys.is_available() {
        rows.push(("Key vault", "unavailable".to_string()));
        output::print_status_table(&rows);
        return Ok(());
    }

    match keys.stored_master_key()? {
        Some(key) => {
            let fingerprint = key.fingerprint();
            let backup = if !ack.is_available() {
                "unknown (preferences unavailable)".to_string()
            } else if ack.is_backup_confirmed_for(&fingerprint) {
                "confirmed".to_string()
            } else {
                "NOT confirmed".to_string()
            };

            rows.push(("Master key", "stored".to_string()));
            rows.push(("Fingerprint", fingerprint.short().to_string()));
            rows.push(("Phrase backup", backup.clone()));
            output::print_status_table(&rows);

            if backup == "NOT confirmed" {
                output::tip("Run `pdfvault backup confirm` after saving your recovery phrase.");
            }
        }
        None => {
            rows.push(("Master key", "not set up".to_string()));
            output::print_status_table(&rows);
            output::tip("Run `pdfvault init` or `pdfvault restore` to set up this device.");
        }
    }

    Ok(())
}
