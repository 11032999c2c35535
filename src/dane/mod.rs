//! DANE verification of a single target through an external validator.
//!
//! The validator is `openssl s_client` by default ([`OpensslValidator`]); its
//! exit status and diagnostic stream are reduced to one finding by
//! [`classify`].

mod classify;
mod options;
mod request;
mod runner;
mod verifier;

pub use classify::classify;
pub use options::{DEFAULT_PROGRAM, STARTTLS_PROTOCOLS, ValidatorOptions};
pub use request::{VerifyRequest, usable_records, validator_args};
pub use runner::{OpensslValidator, RunOutcome, Validator};
pub use verifier::DaneVerifier;
