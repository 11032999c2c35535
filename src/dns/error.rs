use thiserror::Error;
use trust_dns_client::error::ClientError;
use trust_dns_proto::error::ProtoError;
use trust_dns_proto::op::ResponseCode;

use super::QueryKind;

/// Errors raised by a [`DnsLookup`](super::DnsLookup) backend.
#[derive(Debug, Error)]
pub enum DnsError {
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
    #[error("no nameserver configured")]
    NoNameserver,
    #[error("invalid DNS name {name}: {source}")]
    InvalidName {
        name: String,
        #[source]
        source: ProtoError,
    },
    #[error("DNS query for {name} {kind} timed out")]
    Timeout { name: String, kind: QueryKind },
    #[error("DNS query for {name} {kind} failed: {source}")]
    Query {
        name: String,
        kind: QueryKind,
        #[source]
        source: ClientError,
    },
    #[error("DNS response for {name} {kind} truncated")]
    Truncated { name: String, kind: QueryKind },
    #[error("DNS query for {name} {kind} returned {code}")]
    Rcode {
        name: String,
        kind: QueryKind,
        code: ResponseCode,
    },
}

impl DnsError {
    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }

    pub(crate) fn invalid_name(name: impl Into<String>, source: ProtoError) -> Self {
        Self::InvalidName {
            name: name.into(),
            source,
        }
    }

    pub fn timeout(name: impl Into<String>, kind: QueryKind) -> Self {
        Self::Timeout {
            name: name.into(),
            kind,
        }
    }

    pub(crate) fn query(name: impl Into<String>, kind: QueryKind, source: ClientError) -> Self {
        Self::Query {
            name: name.into(),
            kind,
            source,
        }
    }

    pub fn truncated(name: impl Into<String>, kind: QueryKind) -> Self {
        Self::Truncated {
            name: name.into(),
            kind,
        }
    }

    pub fn rcode(name: impl Into<String>, kind: QueryKind, code: ResponseCode) -> Self {
        Self::Rcode {
            name: name.into(),
            kind,
            code,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
