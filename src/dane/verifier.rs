use crate::status::{CheckResult, Finding, Severity, StatusReport};

use super::{VerifyRequest, Validator, classify, usable_records, validator_args};

/// Verifies one target at a time against its host's TLSA records.
pub struct DaneVerifier<V> {
    validator: V,
}

impl<V: Validator> DaneVerifier<V> {
    pub fn new(validator: V) -> Self {
        Self { validator }
    }

    /// Records exactly one finding for the target. Anything but OK halts the
    /// run.
    pub fn verify(&self, report: &mut StatusReport, request: &VerifyRequest<'_>) -> CheckResult<()> {
        let target = request.target;
        let records = usable_records(request.records, request.s2s);
        if records.is_empty() {
            return Err(report.fatal(Finding::critical(format!(
                "no usable TLSA record for {}: PKIX usages are ignored for server-to-server checks",
                target.hostname
            ))));
        }

        report.debug(format!(
            "verifying {} at {} with {} TLSA record(s)",
            target.hostname,
            target.destination(),
            records.len()
        ));
        let args = validator_args(request, &records);
        let finding = classify(target, self.validator.run(&args));

        if finding.severity == Severity::Ok {
            report.record(finding);
            return Ok(());
        }
        let halt = report.fatal(finding);
        report.info(format!(
            "failed target: {} at {}",
            target.hostname,
            target.destination()
        ));
        Err(halt)
    }
}
