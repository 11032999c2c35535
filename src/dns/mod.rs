//! DNS lookups for DANE checks.
//!
//! [`NameResolver`] is the entry point: it issues one query at a time through a
//! [`DnsLookup`] backend and enforces the DNSSEC requirement from
//! [`ResolverConfig`]. [`ClientLookup`] is the wire backend.

mod client;
mod error;
mod resolver;
mod types;

pub use client::{ClientLookup, DnsLookup};
pub use error::DnsError;
pub use resolver::{NameResolver, tlsa_name};
pub use types::{
    AddressFamily, Answer, QueryKind, RecordData, ResolverConfig, TlsaRecord, USAGE_DANE_EE,
    USAGE_DANE_TA, USAGE_PKIX_EE, USAGE_PKIX_TA,
};

#[cfg(test)]
pub(crate) mod tests;
