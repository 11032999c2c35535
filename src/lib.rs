#![forbid(unsafe_code)]
//! danecheck_lib — DANE/TLSA monitoring check (RFC 6698/7671)

pub mod check;
pub mod dane;
pub mod dns;
pub mod planner;
pub mod status;

pub use check::{check, run_check};
pub use dane::{DaneVerifier, OpensslValidator, Validator, ValidatorOptions};
pub use dns::{AddressFamily, ClientLookup, DnsError, DnsLookup, NameResolver, ResolverConfig};
pub use planner::{CheckOptions, CheckPlan, ConfigError, TargetPlanner};
pub use status::{CheckResult, Finding, Halt, Severity, StatusReport};
