use std::io::IsTerminal as _;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod cmd;
mod error;
mod io;
mod report;

pub use cli::{Cli, Command, PathOrStdin};
use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let code = match dispatch(&cli) {
        Ok(()) => 0,
        Err(e) => {
            // The verdict is already on stdout.
            if !matches!(e, CliError::Inconsistent) {
                eprintln!("{}", e.message());
            }
            e.exit_code()
        }
    };
    std::process::exit(code);
}

/// Logs go to stderr, colored only on a terminal. `--verbose` and `--quiet`
/// take precedence over `RUST_LOG`, which defaults to `warn`.
fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn dispatch(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Compare {
            reference,
            target,
            mode,
            ignore_field,
            config,
            report,
            traceparent,
        } => cmd::compare::run(
            reference,
            target,
            (*mode).into(),
            ignore_field,
            config.as_deref(),
            report.as_deref(),
            traceparent.as_deref(),
            cli.max_file_size,
        ),
        Command::Vocab { vocabulary, value } => cmd::vocab::run(*vocabulary, value),
    }
}
