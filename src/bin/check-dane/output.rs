use std::io::{self, Write};

use anyhow::{Context, Result};
#[cfg(not(feature = "with-serde"))]
use anyhow::bail;
use danecheck_lib::StatusReport;

use crate::args::Format;

/// Fails for formats this build cannot produce.
pub fn ensure_supported(format: Format) -> Result<()> {
    match format {
        Format::Nagios => Ok(()),
        #[cfg(feature = "with-serde")]
        Format::Json => Ok(()),
        #[cfg(not(feature = "with-serde"))]
        Format::Json => bail!("format=json requires the 'with-serde' feature"),
    }
}

/// Prints the report on stdout and returns the process exit code.
pub fn emit(report: StatusReport, format: Format) -> Result<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Nagios => report.finalize(&mut out).context("write report"),
        Format::Json => {
            ensure_supported(format)?;
            #[cfg(feature = "with-serde")]
            {
                let json = report.to_json().context("serialize report")?;
                writeln!(out, "{json}").context("write report")?;
            }
            out.flush().context("write report")?;
            Ok(report.exit_code())
        }
    }
}
