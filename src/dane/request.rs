use crate::dns::TlsaRecord;
use crate::planner::Target;

/// Everything one validator invocation needs.
#[derive(Debug, Clone)]
pub struct VerifyRequest<'a> {
    pub target: &'a Target,
    pub records: &'a [TlsaRecord],
    pub starttls: Option<&'a str>,
    pub s2s: bool,
}

impl<'a> VerifyRequest<'a> {
    pub fn new(target: &'a Target, records: &'a [TlsaRecord]) -> Self {
        Self {
            target,
            records,
            starttls: None,
            s2s: false,
        }
    }

    pub fn with_starttls(mut self, protocol: Option<&'a str>) -> Self {
        self.starttls = protocol;
        self
    }

    pub fn with_s2s(mut self, s2s: bool) -> Self {
        self.s2s = s2s;
        self
    }
}

/// Records the validator may use. Server-to-server checks have no trusted
/// CA store, so PKIX-TA and PKIX-EE records are dropped.
pub fn usable_records(records: &[TlsaRecord], s2s: bool) -> Vec<&TlsaRecord> {
    records
        .iter()
        .filter(|record| !(s2s && record.is_pkix()))
        .collect()
}

/// `s_client` argument vector for one target and its usable records.
pub fn validator_args(request: &VerifyRequest<'_>, records: &[&TlsaRecord]) -> Vec<String> {
    let hostname = request.target.hostname.as_str();
    let destination = request.target.destination();
    let mut args: Vec<String> = [
        "s_client",
        "-brief",
        "-connect",
        destination.as_str(),
        "-servername",
        hostname,
        "-verify_return_error",
        "-x509_strict",
        "-purpose",
        "sslserver",
        "-verify_hostname",
        hostname,
        "-dane_tlsa_domain",
        hostname,
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect();

    for record in records {
        args.push("-dane_tlsa_rrdata".to_string());
        args.push(record.rrdata());
    }
    if request.s2s {
        args.push("-dane_ee_no_namechecks".to_string());
    }
    if let Some(protocol) = request.starttls {
        args.push("-starttls".to_string());
        args.push(protocol.to_string());
    }
    args
}
