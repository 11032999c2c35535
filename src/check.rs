//! Run orchestration: plan, resolve, verify.

use crate::dane::{DaneVerifier, OpensslValidator, Validator, VerifyRequest};
use crate::dns::{ClientLookup, DnsLookup, NameResolver, ResolverConfig};
use crate::planner::{CheckOptions, CheckPlan, TargetPlanner};
use crate::status::{CheckResult, Finding, StatusReport};

/// Runs a complete check with the system resolver configuration and the
/// configured validator program.
pub fn check(options: &CheckOptions, report: &mut StatusReport) -> CheckResult<()> {
    let plan = plan(options, report)?;
    let lookup = ClientLookup::from_config(&options.resolver)
        .map_err(|err| report.fatal(Finding::unknown(err.to_string())))?;
    let validator = OpensslValidator::new(options.validator.clone());
    run_plan(&plan, &options.resolver, lookup, validator, report)
}

/// Same as [`check`] with caller-provided DNS and validator backends.
pub fn run_check<L: DnsLookup, V: Validator>(
    options: &CheckOptions,
    lookup: L,
    validator: V,
    report: &mut StatusReport,
) -> CheckResult<()> {
    let plan = plan(options, report)?;
    run_plan(&plan, &options.resolver, lookup, validator, report)
}

fn plan(options: &CheckOptions, report: &mut StatusReport) -> CheckResult<CheckPlan> {
    options
        .plan()
        .map_err(|err| report.fatal(Finding::unknown(err.to_string())))
}

fn run_plan<L: DnsLookup, V: Validator>(
    plan: &CheckPlan,
    config: &ResolverConfig,
    lookup: L,
    validator: V,
    report: &mut StatusReport,
) -> CheckResult<()> {
    let resolver = NameResolver::new(lookup, config);
    let verifier = DaneVerifier::new(validator);

    let groups = TargetPlanner::new(plan).plan_targets(&resolver, report)?;
    let mut verified = 0usize;
    for group in &groups {
        let records = resolver.resolve_tlsa(report, &group.hostname, group.port)?;
        for target in &group.targets {
            let request = VerifyRequest::new(target, &records)
                .with_starttls(plan.starttls.as_deref())
                .with_s2s(plan.s2s);
            verifier.verify(report, &request)?;
            verified += 1;
        }
    }

    tracing::debug!(verified, hosts = groups.len(), "check complete");
    report.info(format!("{verified} target(s) verified for {}", plan.host));
    Ok(())
}
