use std::io::{self, Write};

use super::{Finding, Severity};

pub const PRODUCT: &str = "DANE";

const RAW_DELIMITER: &str = "---";

/// One line (or block) printed after the summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailLine {
    Text(String),
    /// Opaque output, rendered between delimiter lines.
    Raw(Vec<u8>),
}

/// Marker returned once a terminal finding has been recorded.
///
/// Components propagate it with `?`; the caller then finalizes the report.
#[must_use = "a halted check must be finalized"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halt(());

pub type CheckResult<T> = Result<T, Halt>;

/// Single-owner accumulator for everything a run has found.
///
/// `severity` only moves up in [`Severity::priority`]; lower or equal findings
/// end up in the detail lines instead of the headline.
#[derive(Debug, Clone)]
pub struct StatusReport {
    product: String,
    severity: Severity,
    headline: Option<String>,
    details: Vec<DetailLine>,
    debug: bool,
}

impl StatusReport {
    pub fn new(debug: bool) -> Self {
        Self::with_product(PRODUCT, debug)
    }

    pub fn with_product(product: impl Into<String>, debug: bool) -> Self {
        Self {
            product: product.into(),
            severity: Severity::Ok,
            headline: None,
            details: Vec::new(),
            debug,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn headline(&self) -> Option<&str> {
        self.headline.as_deref()
    }

    pub fn details(&self) -> &[DetailLine] {
        &self.details
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn exit_code(&self) -> i32 {
        self.severity.exit_code()
    }

    pub fn record(&mut self, finding: Finding) {
        tracing::debug!(
            severity = %finding.severity,
            message = finding.text().unwrap_or(""),
            "finding recorded"
        );
        let text = finding.text().map(single_line);

        if finding.severity.outranks(self.severity) {
            self.severity = finding.severity;
            self.headline = text;
        } else if let Some(text) = text {
            if self.headline.is_none() && finding.severity == self.severity {
                self.headline = Some(text);
            } else {
                self.details.push(DetailLine::Text(format!(
                    "{}: {}",
                    finding.severity.label(),
                    text
                )));
            }
        }

        if let Some(detail) = finding.detail {
            self.raw(detail);
        }
    }

    pub fn ok(&mut self, message: impl Into<String>) {
        self.record(Finding::ok(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.record(Finding::warning(message));
    }

    pub fn critical(&mut self, message: impl Into<String>) {
        self.record(Finding::critical(message));
    }

    pub fn unknown(&mut self, message: impl Into<String>) {
        self.record(Finding::unknown(message));
    }

    /// Records `finding` and signals that the run must stop here.
    pub fn fatal(&mut self, finding: Finding) -> Halt {
        self.record(finding);
        Halt(())
    }

    /// Informational line, always kept.
    pub fn info(&mut self, text: impl Into<String>) {
        self.details.push(DetailLine::Text(text.into()));
    }

    /// Informational line, kept only when debug output was requested.
    pub fn debug(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!("{text}");
        if self.debug {
            self.details.push(DetailLine::Text(text));
        }
    }

    pub fn raw(&mut self, bytes: impl Into<Vec<u8>>) {
        let bytes = bytes.into();
        if !bytes.is_empty() {
            self.details.push(DetailLine::Raw(bytes));
        }
    }

    pub fn summary_line(&self) -> String {
        match &self.headline {
            Some(headline) => format!("{} {} - {}||", self.product, self.severity, headline),
            None => format!("{} {}||", self.product, self.severity),
        }
    }

    pub fn render(&self) -> String {
        let mut out = self.summary_line();
        out.push('\n');
        for line in &self.details {
            match line {
                DetailLine::Text(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
                DetailLine::Raw(bytes) => {
                    let text = String::from_utf8_lossy(bytes);
                    out.push_str(RAW_DELIMITER);
                    out.push('\n');
                    out.push_str(text.trim_end_matches(['\r', '\n']));
                    out.push('\n');
                    out.push_str(RAW_DELIMITER);
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Writes the report and hands back the exit status the process must use.
    pub fn finalize<W: Write>(self, out: &mut W) -> io::Result<i32> {
        out.write_all(self.render().as_bytes())?;
        out.flush()?;
        Ok(self.exit_code())
    }

    #[cfg(feature = "with-serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        let details = self
            .details
            .iter()
            .map(|line| match line {
                DetailLine::Text(text) => JsonDetail {
                    kind: "text",
                    text: text.clone(),
                },
                DetailLine::Raw(bytes) => JsonDetail {
                    kind: "raw",
                    text: String::from_utf8_lossy(bytes).into_owned(),
                },
            })
            .collect();
        serde_json::to_string_pretty(&JsonReport {
            product: &self.product,
            severity: self.severity,
            exit_code: self.exit_code(),
            headline: self.headline.as_deref(),
            details,
        })
    }
}

fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(feature = "with-serde")]
#[derive(serde::Serialize)]
struct JsonReport<'a> {
    product: &'a str,
    severity: Severity,
    exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    headline: Option<&'a str>,
    details: Vec<JsonDetail>,
}

#[cfg(feature = "with-serde")]
#[derive(serde::Serialize)]
struct JsonDetail {
    kind: &'static str,
    text: String,
}
