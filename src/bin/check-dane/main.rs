mod args;
mod output;

use std::process;

use clap::Parser;
use clap::error::ErrorKind;
use danecheck_lib::{Finding, Severity, StatusReport, check};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Format};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
            _ => config_error(&err.to_string()),
        },
    };
    init_tracing(cli.debug);

    let format = cli.format;
    if let Err(err) = output::ensure_supported(format) {
        config_error(&err.to_string());
    }

    let options = cli.into_options();
    let mut report = StatusReport::new(options.debug);
    if check(&options, &mut report).is_err() {
        tracing::debug!(severity = %report.severity(), "check halted");
    }
    exit_with(report, format)
}

/// Logs go to stderr; stdout is reserved for the monitoring output.
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Reports invalid invocation as UNKNOWN before any network activity.
fn config_error(message: &str) -> ! {
    let line = message
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("invalid arguments");
    let line = line.strip_prefix("error: ").unwrap_or(line);
    let mut report = StatusReport::new(false);
    let _ = report.fatal(Finding::unknown(line));
    exit_with(report, Format::Nagios)
}

fn exit_with(report: StatusReport, format: Format) -> ! {
    let code = match output::emit(report, format) {
        Ok(code) => code,
        Err(err) => {
            println!("DANE UNKNOWN - {err:#}||");
            Severity::Unknown.exit_code()
        }
    };
    process::exit(code)
}
