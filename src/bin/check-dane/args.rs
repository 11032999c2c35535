use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum, value_parser};
use danecheck_lib::dane::DEFAULT_PROGRAM;
use danecheck_lib::{AddressFamily, CheckOptions, ResolverConfig, ValidatorOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// monitoring plugin output
    Nagios,
    /// JSON report (feature `with-serde`)
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "check-dane",
    version,
    about = "Checks that a TLS service is authenticated by its DANE/TLSA records"
)]
pub struct Cli {
    /// host name to authenticate (owner of the TLSA records)
    #[arg(short = 'H', long)]
    pub host: String,

    /// service port; defaults to 25 with --mx
    #[arg(short, long, value_parser = value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// connect to this address or host instead of the resolved addresses
    #[arg(long)]
    pub connect_host: Option<String>,

    /// connect to this port instead of --port
    #[arg(long, value_parser = value_parser!(u16).range(1..))]
    pub connect_port: Option<u16>,

    /// check every mail exchange of the host (implies --s2s, STARTTLS smtp, port 25)
    #[arg(long)]
    pub mx: bool,

    /// server-to-server policy: ignore PKIX-TA/PKIX-EE records
    #[arg(long)]
    pub s2s: bool,

    /// STARTTLS protocol passed to the validator (smtp, imap, xmpp, ...)
    #[arg(long)]
    pub starttls: Option<String>,

    /// query this nameserver instead of the system resolvers
    #[arg(long)]
    pub nameserver: Option<IpAddr>,

    /// timeout in seconds for each DNS query and validator run (0 = default)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// accept DNS answers without the authenticated-data bit
    #[arg(long)]
    pub no_dnssec: bool,

    /// only check IPv4 addresses
    #[arg(short = '4', long, conflicts_with = "ipv6_only")]
    pub ipv4_only: bool,

    /// only check IPv6 addresses
    #[arg(short = '6', long)]
    pub ipv6_only: bool,

    /// validator program (run as `<program> s_client ...`)
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    pub openssl: PathBuf,

    /// add debug lines to the output and enable debug logs on stderr
    #[arg(short, long)]
    pub debug: bool,

    /// output format
    #[arg(long, value_enum, default_value_t = Format::Nagios)]
    pub format: Format,
}

impl Cli {
    pub fn into_options(self) -> CheckOptions {
        let timeout = self
            .timeout
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let family = match (self.ipv4_only, self.ipv6_only) {
            (true, _) => AddressFamily::V4Only,
            (_, true) => AddressFamily::V6Only,
            _ => AddressFamily::Any,
        };

        CheckOptions {
            host: self.host,
            port: self.port,
            connect_host: self.connect_host,
            connect_port: self.connect_port,
            mx: self.mx,
            s2s: self.s2s,
            starttls: self.starttls,
            family,
            resolver: ResolverConfig {
                timeout,
                nameserver: self.nameserver,
                dnssec_required: !self.no_dnssec,
            },
            validator: ValidatorOptions {
                program: self.openssl,
                timeout,
            },
            debug: self.debug,
        }
    }
}
