//! `pdfvault audit`: display the key lifecycle audit log.
//!
//! Usage:
//!   pdfvault audit               # last 50 entries
//!   pdfvault audit --last 20
//!   pdfvault audit --since 7d    # entries from the last 7 days

use chrono::{DateTime, TimeDelta, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PdfVaultError, Result};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let ctx = Context::from_cli(cli)?;
    let data_dir = ctx.data_dir();

    if !AuditLog::db_path(&data_dir).exists() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let audit = AuditLog::open(&data_dir)
        .ok_or_else(|| PdfVaultError::AuditError("failed to open audit database".into()))?;

    let since = since.map(parse_since).transpose()?;
    let entries = audit.query(last, since)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);
    Ok(())
}

/// Turn "7d", "24h" or "30m" into the matching point in the past.
fn parse_since(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid =
        || PdfVaultError::CommandFailed(format!("invalid duration '{input}', use e.g. 7d, 24h or 30m"));

    let unit_at = input.char_indices().last().map_or(0, |(i, _)| i);
    let (num, unit) = input.split_at(unit_at);
    let num: i64 = num.parse().map_err(|_| invalid())?;

    let duration = match unit {
        "d" => TimeDelta::try_days(num),
        "h" => TimeDelta::try_hours(num),
        "m" => TimeDelta::try_minutes(num),
        _ => return Err(invalid()),
    };

    duration
        .and_then(|d| Utc::now().checked_sub_signed(d))
        .ok_or_else(invalid)
}

fn print_audit_table(entries: &[AuditEntry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Fingerprint", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.fingerprint.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!("{}", style(format!("{} audit entries:", entries.len())).bold());
    println!("{table}");
}

fn colorize_operation(op: &str) -> String {
    match op {
        "create" => style(op).green().to_string(),
        "restore" => style(op).cyan().to_string(),
        "remove" => style(op).red().to_string(),
        "backup-confirm" | "backup-clear" => style(op).yellow().to_string(),
        _ => op.to_string(),
    }
}
