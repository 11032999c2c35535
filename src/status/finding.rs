use super::Severity;

/// One observation produced by a component during a run.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: Option<String>,
    /// Raw block attached to the finding, typically captured subprocess output.
    pub detail: Option<Vec<u8>>,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: Some(message.into()),
            detail: None,
        }
    }

    pub fn bare(severity: Severity) -> Self {
        Self {
            severity,
            message: None,
            detail: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Severity::Ok, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Severity::Unknown, message)
    }

    pub fn with_detail(mut self, detail: impl Into<Vec<u8>>) -> Self {
        let detail = detail.into();
        self.detail = if detail.is_empty() { None } else { Some(detail) };
        self
    }

    /// Message text, with empty strings treated as absent.
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().filter(|msg| !msg.trim().is_empty())
    }
}
