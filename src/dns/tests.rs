use std::cell::RefCell;
use std::collections::HashMap;
use std::net::IpAddr;

use trust_dns_proto::op::ResponseCode;

use super::{
    AddressFamily, Answer, DnsError, DnsLookup, NameResolver, QueryKind, RecordData,
    ResolverConfig, TlsaRecord, tlsa_name,
};
use crate::status::{DetailLine, Severity, StatusReport};

type QueryResult = Result<Answer, DnsError>;
type QueryFn = dyn Fn(&str, QueryKind) -> QueryResult;

pub(crate) struct StubLookup {
    pub on_query: Box<QueryFn>,
    pub calls: RefCell<Vec<(String, QueryKind)>>,
}

impl StubLookup {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(&str, QueryKind) -> QueryResult + 'static,
    {
        Self {
            on_query: Box::new(f),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Signed zone: listed names answer with the given records, everything
    /// else is an authenticated NXDOMAIN.
    pub(crate) fn zone(entries: Vec<(&str, QueryKind, Vec<RecordData>)>) -> Self {
        let table: HashMap<(String, QueryKind), Vec<RecordData>> = entries
            .into_iter()
            .map(|(name, kind, records)| ((name.to_string(), kind), records))
            .collect();
        Self::new(move |name, kind| {
            Ok(match table.get(&(name.to_string(), kind)) {
                Some(records) => Answer::found(records.clone(), true),
                None => Answer::nxdomain(true),
            })
        })
    }

    pub(crate) fn queried(&self, kind: QueryKind) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub(crate) fn query_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl DnsLookup for StubLookup {
    fn query(&self, name: &str, kind: QueryKind) -> QueryResult {
        self.calls.borrow_mut().push((name.to_string(), kind));
        (self.on_query)(name, kind)
    }
}

pub(crate) fn addr(s: &str) -> RecordData {
    RecordData::Address(s.parse::<IpAddr>().expect("ip literal"))
}

pub(crate) fn mx(preference: u16, exchange: &str) -> RecordData {
    RecordData::Exchange {
        preference,
        exchange: exchange.to_string(),
    }
}

pub(crate) fn tlsa(usage: u8) -> RecordData {
    RecordData::Tlsa(TlsaRecord::new(usage, 1, 1, vec![0x5a; 4]))
}

fn strict() -> ResolverConfig {
    ResolverConfig::default()
}

fn texts(report: &StatusReport) -> Vec<String> {
    report
        .details()
        .iter()
        .filter_map(|line| match line {
            DetailLine::Text(text) => Some(text.clone()),
            DetailLine::Raw(_) => None,
        })
        .collect()
}

#[test]
fn tlsa_name_uses_port_and_tcp_label() {
    assert_eq!(tlsa_name("example.com", 443), "_443._tcp.example.com");
    assert_eq!(tlsa_name("mx.example.com.", 25), "_25._tcp.mx.example.com");
}

#[test]
fn rrdata_is_presentation_form() {
    let record = TlsaRecord::new(3, 1, 1, vec![0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(record.rrdata(), "3 1 1 deadbeef");
    assert!(!record.is_pkix());
    assert!(TlsaRecord::new(1, 0, 0, Vec::new()).is_pkix());
}

#[test]
fn address_lists_ipv4_before_ipv6() {
    let stub = StubLookup::zone(vec![
        ("example.com", QueryKind::Aaaa, vec![addr("2001:db8::2"), addr("2001:db8::1")]),
        ("example.com", QueryKind::A, vec![addr("192.0.2.7"), addr("192.0.2.3")]),
    ]);
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    let addresses = resolver
        .resolve_address(&mut report, "example.com", AddressFamily::Any)
        .expect("addresses");
    let rendered: Vec<String> = addresses.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec!["192.0.2.7", "192.0.2.3", "2001:db8::2", "2001:db8::1"]
    );
    assert_eq!(report.severity(), Severity::Ok);
}

#[test]
fn address_with_only_one_family_is_fine() {
    let stub = StubLookup::zone(vec![(
        "v6only.example.com",
        QueryKind::Aaaa,
        vec![addr("2001:db8::53")],
    )]);
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    let addresses = resolver
        .resolve_address(&mut report, "v6only.example.com", AddressFamily::Any)
        .expect("addresses");
    assert_eq!(addresses.len(), 1);
    assert_eq!(report.severity(), Severity::Ok);
}

#[test]
fn no_address_in_either_family_is_critical() {
    let stub = StubLookup::zone(Vec::new());
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    let halted = resolver.resolve_address(&mut report, "example.com", AddressFamily::Any);
    assert!(halted.is_err());
    assert_eq!(report.severity(), Severity::Critical);
    assert_eq!(report.headline(), Some("No address found for example.com"));
    assert_eq!(stub.query_count(), 2);
}

#[test]
fn family_restriction_skips_other_query() {
    let stub = StubLookup::zone(vec![
        ("example.com", QueryKind::A, vec![addr("192.0.2.1")]),
        ("example.com", QueryKind::Aaaa, vec![addr("2001:db8::1")]),
    ]);
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    let addresses = resolver
        .resolve_address(&mut report, "example.com", AddressFamily::V6Only)
        .expect("addresses");
    assert_eq!(addresses, vec!["2001:db8::1".parse::<IpAddr>().expect("ip")]);
    assert!(stub.queried(QueryKind::A).is_empty());
}

#[test]
fn mx_without_records_falls_back_to_host() {
    let stub = StubLookup::zone(Vec::new());
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    let hosts = resolver.resolve_mx(&mut report, "example.com").expect("hosts");
    assert_eq!(hosts, vec!["example.com".to_string()]);
}

#[test]
fn mx_exchanges_are_sorted_deduplicated_and_trimmed() {
    let stub = StubLookup::zone(vec![(
        "example.com",
        QueryKind::Mx,
        vec![
            mx(20, "mx2.example.com."),
            mx(10, "MX1.example.com."),
            mx(30, "mx1.example.com."),
        ],
    )]);
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    let hosts = resolver.resolve_mx(&mut report, "example.com").expect("hosts");
    assert_eq!(hosts, vec!["mx1.example.com", "mx2.example.com"]);
}

#[test]
fn root_mx_is_critical() {
    let stub = StubLookup::zone(vec![("example.com", QueryKind::Mx, vec![mx(0, ".")])]);
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    assert!(resolver.resolve_mx(&mut report, "example.com").is_err());
    assert_eq!(report.severity(), Severity::Critical);
    assert!(
        report
            .headline()
            .is_some_and(|h| h.contains("invalid domain configuration"))
    );
}

#[test]
fn missing_tlsa_is_fatal() {
    let stub = StubLookup::zone(Vec::new());
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    assert!(resolver.resolve_tlsa(&mut report, "example.com", 443).is_err());
    assert_eq!(
        report.headline(),
        Some("No DNS TLSA record found for _443._tcp.example.com")
    );
    assert_eq!(report.exit_code(), 2);
    assert_eq!(stub.queried(QueryKind::Tlsa), vec!["_443._tcp.example.com"]);
}

#[test]
fn tlsa_records_keep_answer_order() {
    let stub = StubLookup::zone(vec![(
        "_25._tcp.mx.example.com",
        QueryKind::Tlsa,
        vec![tlsa(3), tlsa(2)],
    )]);
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    let records = resolver
        .resolve_tlsa(&mut report, "mx.example.com", 25)
        .expect("records");
    let usages: Vec<u8> = records.iter().map(|r| r.usage).collect();
    assert_eq!(usages, vec![3, 2]);
}

#[test]
fn unauthenticated_answer_is_critical_but_returned() {
    let stub = StubLookup::new(|_, _| {
        Ok(Answer::found(
            vec![RecordData::Tlsa(TlsaRecord::new(3, 1, 1, vec![1]))],
            false,
        ))
    });
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    let records = resolver
        .resolve_tlsa(&mut report, "example.com", 443)
        .expect("records are still returned");
    assert_eq!(records.len(), 1);
    assert_eq!(report.severity(), Severity::Critical);
    assert_eq!(
        report.headline(),
        Some("DNS response for _443._tcp.example.com TLSA not DNSSEC validated")
    );
}

#[test]
fn unauthenticated_nxdomain_is_flagged_too() {
    let stub = StubLookup::new(|_, _| Ok(Answer::nxdomain(false)));
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    assert!(resolver.resolve_tlsa(&mut report, "example.com", 443).is_err());
    assert_eq!(
        report.headline(),
        Some("DNS response for _443._tcp.example.com TLSA not DNSSEC validated")
    );
    assert_eq!(
        texts(&report),
        vec!["CRITICAL: No DNS TLSA record found for _443._tcp.example.com"]
    );
}

#[test]
fn dnssec_check_can_be_disabled() {
    let stub = StubLookup::new(|_, _| Ok(Answer::found(vec![addr("192.0.2.1")], false)));
    let config = ResolverConfig {
        dnssec_required: false,
        ..ResolverConfig::default()
    };
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    let found = resolver
        .resolve(&mut report, "example.com", QueryKind::A)
        .expect("answer");
    assert!(found.is_some());
    assert_eq!(report.severity(), Severity::Ok);
}

#[test]
fn empty_answer_is_absent_not_error() {
    let stub = StubLookup::new(|_, _| Ok(Answer::found(Vec::new(), true)));
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    let found = resolver
        .resolve(&mut report, "example.com", QueryKind::Mx)
        .expect("not an error");
    assert!(found.is_none());
    assert_eq!(report.severity(), Severity::Ok);
}

#[test]
fn timeout_is_fatal_critical() {
    let stub = StubLookup::new(|name, kind| Err(DnsError::timeout(name, kind)));
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    assert!(resolver.resolve(&mut report, "example.com", QueryKind::A).is_err());
    assert_eq!(report.severity(), Severity::Critical);
    assert_eq!(report.headline(), Some("DNS query for example.com A timed out"));
}

#[test]
fn server_failure_is_fatal_critical() {
    let stub = StubLookup::new(|name, kind| Err(DnsError::rcode(name, kind, ResponseCode::ServFail)));
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    assert!(resolver.resolve_mx(&mut report, "example.com").is_err());
    assert!(
        report
            .headline()
            .is_some_and(|h| h.starts_with("DNS resolution failed: DNS query for example.com MX"))
    );
}

#[test]
fn truncated_answer_is_a_resolution_failure() {
    let stub = StubLookup::new(|name, kind| Err(DnsError::truncated(name, kind)));
    let config = strict();
    let resolver = NameResolver::new(&stub, &config);
    let mut report = StatusReport::new(false);

    assert!(resolver.resolve_tlsa(&mut report, "mx.example.com", 25).is_err());
    assert_eq!(
        report.headline(),
        Some("DNS resolution failed: DNS response for _25._tcp.mx.example.com TLSA truncated")
    );
}
