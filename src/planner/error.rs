use thiserror::Error;

/// Invalid run configuration, detected before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("host is empty")]
    EmptyHost,
    #[error("host {host} IDNA conversion failed")]
    IdnaConversion {
        host: String,
        #[source]
        source: idna::Errors,
    },
    #[error("invalid host {host}: {reason}")]
    InvalidHost { host: String, reason: String },
    #[error("port is required")]
    MissingPort,
    #[error("invalid port {port}")]
    InvalidPort { port: u16 },
    #[error("mail exchange mode requires port 25, got {port}")]
    MxPort { port: u16 },
    #[error("mail exchange mode requires STARTTLS smtp, got {protocol}")]
    MxStarttls { protocol: String },
    #[error("mail exchange mode cannot be combined with a connect override")]
    MxConnectOverride,
    #[error("unsupported STARTTLS protocol {protocol}")]
    UnsupportedStarttls { protocol: String },
}

impl ConfigError {
    pub(crate) fn idna(host: impl Into<String>, source: idna::Errors) -> Self {
        Self::IdnaConversion {
            host: host.into(),
            source,
        }
    }

    pub(crate) fn invalid_host(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHost {
            host: host.into(),
            reason: reason.into(),
        }
    }
}
