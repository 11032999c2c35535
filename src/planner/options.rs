use crate::dane::{STARTTLS_PROTOCOLS, ValidatorOptions};
use crate::dns::{AddressFamily, ResolverConfig};

use super::host::normalize_host;
use super::{ConfigError, ConnectAddress};

pub const MX_PORT: u16 = 25;
pub const MX_STARTTLS: &str = "smtp";

/// Raw run configuration as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub host: String,
    /// Service port; optional only in mail exchange mode.
    pub port: Option<u16>,
    pub connect_host: Option<String>,
    pub connect_port: Option<u16>,
    pub mx: bool,
    pub s2s: bool,
    pub starttls: Option<String>,
    pub family: AddressFamily,
    pub resolver: ResolverConfig,
    pub validator: ValidatorOptions,
    pub debug: bool,
}

/// How the destination of each target is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Resolve the host and connect to each of its addresses.
    Direct,
    /// Authenticate the host but connect to an explicit destination.
    Connect { address: ConnectAddress, port: u16 },
    /// Fan out to every mail exchange of the host.
    MailExchange,
}

/// Validated, immutable plan for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckPlan {
    pub host: String,
    pub port: u16,
    pub mode: Mode,
    pub starttls: Option<String>,
    pub s2s: bool,
    pub family: AddressFamily,
}

impl CheckOptions {
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn plan(&self) -> Result<CheckPlan, ConfigError> {
        let host = normalize_host(&self.host)?;
        let starttls = self.starttls_protocol()?;

        if self.mx {
            let port = self.port.unwrap_or(MX_PORT);
            if port != MX_PORT {
                return Err(ConfigError::MxPort { port });
            }
            if let Some(protocol) = starttls.filter(|p| p != MX_STARTTLS) {
                return Err(ConfigError::MxStarttls { protocol });
            }
            if self.connect_host.is_some() || self.connect_port.is_some() {
                return Err(ConfigError::MxConnectOverride);
            }
            return Ok(CheckPlan {
                host,
                port,
                mode: Mode::MailExchange,
                starttls: Some(MX_STARTTLS.to_string()),
                s2s: true,
                family: self.family,
            });
        }

        let port = checked_port(self.port.ok_or(ConfigError::MissingPort)?)?;
        let mode = match (&self.connect_host, self.connect_port) {
            (None, None) => Mode::Direct,
            (connect_host, connect_port) => {
                let address = match connect_host {
                    Some(connect_host) => ConnectAddress::parse(connect_host)?,
                    None => ConnectAddress::Host(host.clone()),
                };
                let port = checked_port(connect_port.unwrap_or(port))?;
                Mode::Connect { address, port }
            }
        };

        Ok(CheckPlan {
            host,
            port,
            mode,
            starttls,
            s2s: self.s2s,
            family: self.family,
        })
    }

    fn starttls_protocol(&self) -> Result<Option<String>, ConfigError> {
        let Some(protocol) = self
            .starttls
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        else {
            return Ok(None);
        };
        let protocol = protocol.to_ascii_lowercase();
        if !STARTTLS_PROTOCOLS.contains(&protocol.as_str()) {
            return Err(ConfigError::UnsupportedStarttls { protocol });
        }
        Ok(Some(protocol))
    }
}

fn checked_port(port: u16) -> Result<u16, ConfigError> {
    if port == 0 {
        return Err(ConfigError::InvalidPort { port });
    }
    Ok(port)
}
