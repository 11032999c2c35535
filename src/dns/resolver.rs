use std::net::IpAddr;

use crate::status::{CheckResult, Finding, StatusReport};

use super::{AddressFamily, DnsError, DnsLookup, QueryKind, RecordData, ResolverConfig, TlsaRecord};

/// DNS lookups with the DNSSEC requirement applied uniformly to every answer.
pub struct NameResolver<'a, L> {
    lookup: L,
    config: &'a ResolverConfig,
}

impl<'a, L: DnsLookup> NameResolver<'a, L> {
    pub fn new(lookup: L, config: &'a ResolverConfig) -> Self {
        Self { lookup, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        self.config
    }

    /// One query. `Ok(None)` means nothing was found; a missing AD bit is
    /// recorded as CRITICAL without stopping the run.
    pub fn resolve(
        &self,
        report: &mut StatusReport,
        name: &str,
        kind: QueryKind,
    ) -> CheckResult<Option<Vec<RecordData>>> {
        report.debug(format!("querying {name} {kind}"));
        let answer = match self.lookup.query(name, kind) {
            Ok(answer) => answer,
            Err(err) => return Err(report.fatal(lookup_failure(&err))),
        };

        if self.config.dnssec_required && !answer.authenticated {
            report.critical(format!("DNS response for {name} {kind} not DNSSEC validated"));
        }

        if !answer.exists || answer.is_empty() {
            report.debug(format!("no {kind} record for {name}"));
            return Ok(None);
        }
        Ok(Some(answer.records))
    }

    /// TLSA records at `_<port>._tcp.<hostname>`, in answer order.
    pub fn resolve_tlsa(
        &self,
        report: &mut StatusReport,
        hostname: &str,
        port: u16,
    ) -> CheckResult<Vec<TlsaRecord>> {
        let qname = tlsa_name(hostname, port);
        let records: Vec<TlsaRecord> = self
            .resolve(report, &qname, QueryKind::Tlsa)?
            .unwrap_or_default()
            .into_iter()
            .filter_map(|record| match record {
                RecordData::Tlsa(tlsa) => Some(tlsa),
                _ => None,
            })
            .collect();

        if records.is_empty() {
            return Err(report.fatal(Finding::critical(format!(
                "No DNS TLSA record found for {qname}"
            ))));
        }
        for record in &records {
            report.debug(format!("{qname} TLSA {record}"));
        }
        Ok(records)
    }

    /// Mail exchangers for `hostname`, by preference, without duplicates.
    /// Falls back to the host itself when it has no MX record.
    pub fn resolve_mx(&self, report: &mut StatusReport, hostname: &str) -> CheckResult<Vec<String>> {
        let Some(records) = self.resolve(report, hostname, QueryKind::Mx)? else {
            report.debug(format!("{hostname} has no MX record, using it directly"));
            return Ok(vec![hostname.to_string()]);
        };

        let mut exchanges: Vec<(u16, String)> = records
            .into_iter()
            .filter_map(|record| match record {
                RecordData::Exchange {
                    preference,
                    exchange,
                } => Some((preference, exchange)),
                _ => None,
            })
            .collect();
        exchanges.sort_by_key(|(preference, _)| *preference);

        let mut hosts: Vec<String> = Vec::new();
        for (_, exchange) in exchanges {
            let host = normalize_exchange(&exchange);
            if host.is_empty() {
                return Err(report.fatal(Finding::critical(format!(
                    "invalid domain configuration: {hostname} has a root MX record"
                ))));
            }
            if !hosts.contains(&host) {
                hosts.push(host);
            }
        }

        if hosts.is_empty() {
            return Ok(vec![hostname.to_string()]);
        }
        report.debug(format!("{hostname} MX: {}", hosts.join(", ")));
        Ok(hosts)
    }

    /// IPv4 addresses first, then IPv6, each in answer order.
    pub fn resolve_address(
        &self,
        report: &mut StatusReport,
        hostname: &str,
        family: AddressFamily,
    ) -> CheckResult<Vec<IpAddr>> {
        let mut addresses = Vec::new();
        let kinds = [
            (QueryKind::A, family.wants_v4()),
            (QueryKind::Aaaa, family.wants_v6()),
        ];
        for (kind, wanted) in kinds {
            if !wanted {
                continue;
            }
            if let Some(records) = self.resolve(report, hostname, kind)? {
                addresses.extend(records.into_iter().filter_map(|record| match record {
                    RecordData::Address(ip) => Some(ip),
                    _ => None,
                }));
            }
        }

        if addresses.is_empty() {
            return Err(report.fatal(Finding::critical(format!(
                "No address found for {hostname}"
            ))));
        }
        Ok(addresses)
    }
}

pub fn tlsa_name(hostname: &str, port: u16) -> String {
    format!("_{port}._tcp.{}", hostname.trim_end_matches('.'))
}

pub(crate) fn normalize_exchange(exchange: &str) -> String {
    exchange.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn lookup_failure(err: &DnsError) -> Finding {
    if err.is_timeout() {
        Finding::critical(err.to_string())
    } else {
        Finding::critical(format!("DNS resolution failed: {err}"))
    }
}
