use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROGRAM: &str = "openssl";

/// Protocols `openssl s_client -starttls` understands.
pub const STARTTLS_PROTOCOLS: &[&str] = &[
    "smtp",
    "pop3",
    "imap",
    "ftp",
    "xmpp",
    "xmpp-server",
    "irc",
    "postgres",
    "mysql",
    "lmtp",
    "nntp",
    "sieve",
    "ldap",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub program: PathBuf,
    /// Wall-clock limit per invocation; `None` waits for the process.
    pub timeout: Option<Duration>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            timeout: None,
        }
    }
}
