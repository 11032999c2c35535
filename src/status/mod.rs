//! Result aggregation for a monitoring run.
//!
//! Every component reports into one [`StatusReport`] that is passed down by
//! `&mut`. A component that hits a condition making further checks pointless
//! records it with [`StatusReport::fatal`] and returns the [`Halt`] token.

mod finding;
mod report;
mod severity;

pub use finding::Finding;
pub use report::{CheckResult, DetailLine, Halt, PRODUCT, StatusReport};
pub use severity::Severity;
