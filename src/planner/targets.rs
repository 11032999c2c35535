use std::fmt;
use std::net::IpAddr;

use crate::dns::{DnsLookup, NameResolver};
use crate::status::{CheckResult, StatusReport};

use super::host::normalize_host;
use super::{CheckPlan, ConfigError, Mode};

/// Network destination of a target, as handed to the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectAddress {
    Ip(IpAddr),
    Host(String),
}

impl ConnectAddress {
    /// Accepts an address literal (IPv6 optionally bracketed) or a host name.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        let unbracketed = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);
        if let Ok(ip) = unbracketed.parse::<IpAddr>() {
            return Ok(Self::Ip(ip));
        }
        normalize_host(trimmed).map(Self::Host)
    }
}

impl fmt::Display for ConnectAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectAddress::Ip(IpAddr::V6(ip)) => write!(f, "[{ip}]"),
            ConnectAddress::Ip(IpAddr::V4(ip)) => write!(f, "{ip}"),
            ConnectAddress::Host(host) => f.write_str(host),
        }
    }
}

impl From<IpAddr> for ConnectAddress {
    fn from(ip: IpAddr) -> Self {
        Self::Ip(ip)
    }
}

/// One endpoint to verify. `hostname` is the DANE authentication name and
/// may differ from the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub hostname: String,
    pub address: ConnectAddress,
    pub port: u16,
}

impl Target {
    pub fn new(hostname: impl Into<String>, address: impl Into<ConnectAddress>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            address: address.into(),
            port,
        }
    }

    /// `address:port`, IPv6 literals bracketed.
    pub fn destination(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Targets sharing one TLSA record set, keyed by `hostname` and `port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroup {
    pub hostname: String,
    pub port: u16,
    pub targets: Vec<Target>,
}

pub struct TargetPlanner<'p> {
    plan: &'p CheckPlan,
}

impl<'p> TargetPlanner<'p> {
    pub fn new(plan: &'p CheckPlan) -> Self {
        Self { plan }
    }

    pub fn plan_targets<L: DnsLookup>(
        &self,
        resolver: &NameResolver<'_, L>,
        report: &mut StatusReport,
    ) -> CheckResult<Vec<TargetGroup>> {
        let plan = self.plan;
        match &plan.mode {
            Mode::Connect { address, port } => {
                report.debug(format!(
                    "authenticating {} at {address}:{port}",
                    plan.host
                ));
                Ok(vec![TargetGroup {
                    hostname: plan.host.clone(),
                    port: plan.port,
                    targets: vec![Target::new(plan.host.clone(), address.clone(), *port)],
                }])
            }
            Mode::Direct => Ok(vec![self.address_group(resolver, report, &plan.host)?]),
            Mode::MailExchange => {
                let exchanges = resolver.resolve_mx(report, &plan.host)?;
                let mut groups = Vec::with_capacity(exchanges.len());
                for exchange in &exchanges {
                    groups.push(self.address_group(resolver, report, exchange)?);
                }
                Ok(groups)
            }
        }
    }

    fn address_group<L: DnsLookup>(
        &self,
        resolver: &NameResolver<'_, L>,
        report: &mut StatusReport,
        hostname: &str,
    ) -> CheckResult<TargetGroup> {
        let port = self.plan.port;
        let targets = resolver
            .resolve_address(report, hostname, self.plan.family)?
            .into_iter()
            .map(|ip| Target::new(hostname, ip, port))
            .collect();
        Ok(TargetGroup {
            hostname: hostname.to_string(),
            port,
            targets,
        })
    }
}
