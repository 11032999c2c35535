//! Run configuration and target planning.
//!
//! [`CheckOptions::plan`] validates the configuration into a [`CheckPlan`];
//! [`TargetPlanner`] then expands the plan into [`TargetGroup`]s, one per
//! DANE authentication name.

mod error;
mod host;
mod options;
mod targets;

pub use error::ConfigError;
pub use host::normalize_host;
pub use options::{CheckOptions, CheckPlan, MX_PORT, MX_STARTTLS, Mode};
pub use targets::{ConnectAddress, Target, TargetGroup, TargetPlanner};

#[cfg(test)]
mod tests;
