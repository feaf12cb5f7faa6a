use clap::Parser;
use tracing_subscriber::EnvFilter;

use pdfvault::cli::commands;
use pdfvault::cli::{BackupAction, Cli, Commands};

/// Env var holding a `tracing` filter directive (e.g. `pdfvault=debug`).
const LOG_ENV: &str = "PDFVAULT_LOG";

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pdfvault=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { force } => commands::init::execute(&cli, force),
        Commands::Restore { ref phrase } => commands::restore::execute(&cli, phrase.as_deref()),
        Commands::Status => commands::status::execute(&cli),
        Commands::Fingerprint => commands::fingerprint::execute(&cli),
        Commands::Encrypt {
            ref input,
            ref output,
            ref mime,
            force,
        } => commands::encrypt::execute(&cli, input, output.as_deref(), mime.as_deref(), force),
        Commands::Decrypt {
            ref input,
            ref meta,
            ref output,
            force,
        } => commands::decrypt::execute(&cli, input, meta.as_deref(), output.as_deref(), force),
        Commands::Forget { force } => commands::forget::execute(&cli, force),
        Commands::Backup { ref action } => match action {
            BackupAction::Confirm { ref phrase } => {
                commands::backup::execute_confirm(&cli, phrase.as_deref())
            }
            BackupAction::Status => commands::backup::execute_status(&cli),
            BackupAction::Clear => commands::backup::execute_clear(&cli),
        },
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Version => commands::version::execute(),
        Commands::Completions { ref shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        pdfvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
