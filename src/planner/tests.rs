use std::net::IpAddr;

use super::{CheckOptions, ConfigError, ConnectAddress, Mode, Target, TargetPlanner};
use crate::dns::tests::{StubLookup, addr, mx};
use crate::dns::{AddressFamily, NameResolver, QueryKind, ResolverConfig};
use crate::status::{Severity, StatusReport};

fn ip(s: &str) -> IpAddr {
    s.parse().expect("ip literal")
}

#[test]
fn direct_plan_keeps_options() {
    let mut options = CheckOptions::new("Example.COM.", Some(443));
    options.starttls = Some("IMAP".into());
    let plan = options.plan().expect("plan");
    assert_eq!(plan.host, "example.com");
    assert_eq!(plan.port, 443);
    assert_eq!(plan.mode, Mode::Direct);
    assert_eq!(plan.starttls.as_deref(), Some("imap"));
    assert!(!plan.s2s);
}

#[test]
fn port_is_required_outside_mx_mode() {
    let options = CheckOptions::new("example.com", None);
    assert!(matches!(options.plan(), Err(ConfigError::MissingPort)));
}

#[test]
fn port_zero_is_rejected() {
    let options = CheckOptions::new("example.com", Some(0));
    assert!(matches!(options.plan(), Err(ConfigError::InvalidPort { port: 0 })));
}

#[test]
fn unknown_starttls_protocol_is_rejected() {
    let mut options = CheckOptions::new("example.com", Some(443));
    options.starttls = Some("gopher".into());
    let err = options.plan().unwrap_err();
    assert_eq!(err.to_string(), "unsupported STARTTLS protocol gopher");
}

#[test]
fn mx_mode_forces_s2s_and_smtp() {
    let mut options = CheckOptions::new("example.com", None);
    options.mx = true;
    let plan = options.plan().expect("plan");
    assert_eq!(plan.port, 25);
    assert_eq!(plan.mode, Mode::MailExchange);
    assert_eq!(plan.starttls.as_deref(), Some("smtp"));
    assert!(plan.s2s);
}

#[test]
fn mx_mode_rejects_other_port() {
    let mut options = CheckOptions::new("example.com", Some(465));
    options.mx = true;
    let err = options.plan().unwrap_err();
    assert!(matches!(err, ConfigError::MxPort { port: 465 }));
    assert!(err.to_string().contains("requires port 25"));
}

#[test]
fn mx_mode_rejects_other_starttls() {
    let mut options = CheckOptions::new("example.com", Some(25));
    options.mx = true;
    options.starttls = Some("imap".into());
    assert!(matches!(
        options.plan(),
        Err(ConfigError::MxStarttls { protocol }) if protocol == "imap"
    ));
}

#[test]
fn mx_mode_rejects_connect_override() {
    let mut options = CheckOptions::new("example.com", None);
    options.mx = true;
    options.connect_port = Some(2525);
    assert!(matches!(options.plan(), Err(ConfigError::MxConnectOverride)));
}

#[test]
fn connect_port_alone_targets_host() {
    let mut options = CheckOptions::new("example.com", Some(443));
    options.connect_port = Some(8443);
    let plan = options.plan().expect("plan");
    assert_eq!(
        plan.mode,
        Mode::Connect {
            address: ConnectAddress::Host("example.com".into()),
            port: 8443,
        }
    );
}

#[test]
fn connect_host_accepts_bracketed_ipv6() {
    let mut options = CheckOptions::new("example.com", Some(443));
    options.connect_host = Some("[2001:db8::1]".into());
    let plan = options.plan().expect("plan");
    assert_eq!(
        plan.mode,
        Mode::Connect {
            address: ConnectAddress::Ip(ip("2001:db8::1")),
            port: 443,
        }
    );
}

#[test]
fn destination_brackets_ipv6() {
    let v6 = Target::new("example.com", ip("2001:db8::1"), 443);
    let v4 = Target::new("example.com", ip("192.0.2.1"), 443);
    let named = Target::new("example.com", ConnectAddress::Host("lb.example.net".into()), 8443);
    assert_eq!(v6.destination(), "[2001:db8::1]:443");
    assert_eq!(v4.destination(), "192.0.2.1:443");
    assert_eq!(named.destination(), "lb.example.net:8443");
}

#[test]
fn direct_mode_pairs_each_address_with_port() {
    let stub = StubLookup::zone(vec![
        ("example.com", QueryKind::A, vec![addr("192.0.2.1")]),
        ("example.com", QueryKind::Aaaa, vec![addr("2001:db8::1")]),
    ]);
    let config = ResolverConfig::default();
    let resolver = NameResolver::new(&stub, &config);
    let plan = CheckOptions::new("example.com", Some(443)).plan().expect("plan");
    let mut report = StatusReport::new(false);

    let groups = TargetPlanner::new(&plan)
        .plan_targets(&resolver, &mut report)
        .expect("groups");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].hostname, "example.com");
    assert_eq!(groups[0].port, 443);
    let destinations: Vec<String> = groups[0].targets.iter().map(Target::destination).collect();
    assert_eq!(destinations, vec!["192.0.2.1:443", "[2001:db8::1]:443"]);
}

#[test]
fn connect_mode_skips_dns() {
    let stub = StubLookup::zone(Vec::new());
    let config = ResolverConfig::default();
    let resolver = NameResolver::new(&stub, &config);
    let mut options = CheckOptions::new("example.com", Some(443));
    options.connect_host = Some("192.0.2.9".into());
    options.connect_port = Some(8443);
    let plan = options.plan().expect("plan");
    let mut report = StatusReport::new(false);

    let groups = TargetPlanner::new(&plan)
        .plan_targets(&resolver, &mut report)
        .expect("groups");
    assert_eq!(stub.query_count(), 0);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].port, 443);
    assert_eq!(groups[0].targets[0].hostname, "example.com");
    assert_eq!(groups[0].targets[0].destination(), "192.0.2.9:8443");
}

#[test]
fn mx_mode_groups_per_exchange() {
    let stub = StubLookup::zone(vec![
        (
            "example.com",
            QueryKind::Mx,
            vec![mx(20, "mx2.example.com."), mx(10, "mx1.example.com.")],
        ),
        ("mx1.example.com", QueryKind::A, vec![addr("192.0.2.1")]),
        ("mx2.example.com", QueryKind::A, vec![addr("192.0.2.2"), addr("192.0.2.3")]),
    ]);
    let config = ResolverConfig::default();
    let resolver = NameResolver::new(&stub, &config);
    let mut options = CheckOptions::new("example.com", None);
    options.mx = true;
    let plan = options.plan().expect("plan");
    let mut report = StatusReport::new(false);

    let groups = TargetPlanner::new(&plan)
        .plan_targets(&resolver, &mut report)
        .expect("groups");
    let hostnames: Vec<&str> = groups.iter().map(|g| g.hostname.as_str()).collect();
    assert_eq!(hostnames, vec!["mx1.example.com", "mx2.example.com"]);
    assert_eq!(groups[1].targets.len(), 2);
    assert!(groups[1].targets.iter().all(|t| t.hostname == "mx2.example.com" && t.port == 25));
}

#[test]
fn ipv4_only_family_is_respected() {
    let stub = StubLookup::zone(vec![
        ("example.com", QueryKind::A, vec![addr("192.0.2.1")]),
        ("example.com", QueryKind::Aaaa, vec![addr("2001:db8::1")]),
    ]);
    let config = ResolverConfig::default();
    let resolver = NameResolver::new(&stub, &config);
    let mut options = CheckOptions::new("example.com", Some(443));
    options.family = AddressFamily::V4Only;
    let plan = options.plan().expect("plan");
    let mut report = StatusReport::new(false);

    let groups = TargetPlanner::new(&plan)
        .plan_targets(&resolver, &mut report)
        .expect("groups");
    assert_eq!(groups[0].targets.len(), 1);
    assert!(stub.queried(QueryKind::Aaaa).is_empty());
}

#[test]
fn unresolvable_host_halts_planning() {
    let stub = StubLookup::zone(Vec::new());
    let config = ResolverConfig::default();
    let resolver = NameResolver::new(&stub, &config);
    let plan = CheckOptions::new("example.com", Some(443)).plan().expect("plan");
    let mut report = StatusReport::new(false);

    assert!(TargetPlanner::new(&plan).plan_targets(&resolver, &mut report).is_err());
    assert_eq!(report.severity(), Severity::Critical);
}
