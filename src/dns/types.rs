use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use trust_dns_proto::rr::RecordType;

/// The record types this crate asks for.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    A,
    Aaaa,
    Mx,
    Tlsa,
}

impl QueryKind {
    pub fn record_type(self) -> RecordType {
        match self {
            QueryKind::A => RecordType::A,
            QueryKind::Aaaa => RecordType::AAAA,
            QueryKind::Mx => RecordType::MX,
            QueryKind::Tlsa => RecordType::TLSA,
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryKind::A => "A",
            QueryKind::Aaaa => "AAAA",
            QueryKind::Mx => "MX",
            QueryKind::Tlsa => "TLSA",
        })
    }
}

/// Certificate usage values defined by RFC 6698 §2.1.1.
pub const USAGE_PKIX_TA: u8 = 0;
pub const USAGE_PKIX_EE: u8 = 1;
pub const USAGE_DANE_TA: u8 = 2;
pub const USAGE_DANE_EE: u8 = 3;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TlsaRecord {
    pub usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub data: Vec<u8>,
}

impl TlsaRecord {
    pub fn new(usage: u8, selector: u8, matching_type: u8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            usage,
            selector,
            matching_type,
            data: data.into(),
        }
    }

    /// PKIX-TA and PKIX-EE records additionally require a trusted CA store.
    pub fn is_pkix(&self) -> bool {
        matches!(self.usage, USAGE_PKIX_TA | USAGE_PKIX_EE)
    }

    /// Presentation form of the RDATA, `"<usage> <selector> <mtype> <hex>"`.
    pub fn rrdata(&self) -> String {
        format!(
            "{} {} {} {}",
            self.usage,
            self.selector,
            self.matching_type,
            hex::encode(&self.data)
        )
    }
}

impl fmt::Display for TlsaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rrdata())
    }
}

/// Record payloads extracted from an answer section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    Address(IpAddr),
    Exchange { preference: u16, exchange: String },
    Tlsa(TlsaRecord),
}

/// Outcome of one query, whether or not the name exists.
///
/// `authenticated` mirrors the AD bit of the response that produced the
/// answer, including NXDOMAIN responses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Answer {
    pub records: Vec<RecordData>,
    pub authenticated: bool,
    pub exists: bool,
}

impl Answer {
    pub fn found(records: Vec<RecordData>, authenticated: bool) -> Self {
        Self {
            records,
            authenticated,
            exists: true,
        }
    }

    pub fn nxdomain(authenticated: bool) -> Self {
        Self {
            records: Vec::new(),
            authenticated,
            exists: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    #[default]
    Any,
    V4Only,
    V6Only,
}

impl AddressFamily {
    pub fn wants_v4(self) -> bool {
        !matches!(self, AddressFamily::V6Only)
    }

    pub fn wants_v6(self) -> bool {
        !matches!(self, AddressFamily::V4Only)
    }
}

/// Resolver settings, fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Per-query lifetime; `None` uses the resolver library default.
    pub timeout: Option<Duration>,
    pub nameserver: Option<IpAddr>,
    pub dnssec_required: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            nameserver: None,
            dnssec_required: true,
        }
    }
}
