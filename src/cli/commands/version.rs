//! `pdfvault version`: print version and envelope format details.

use console::style;

use crate::envelope::ALGORITHM;
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    println!("pdfvault {}", env!("CARGO_PKG_VERSION"));
    println!("{} {ALGORITHM}", style("envelope:").dim());
    Ok(())
}
