use crate::planner::Target;
use crate::status::Finding;

use super::RunOutcome;

const MATCH_MARKER: &str = "DANE TLSA";
const VERIFY_ERROR: &str = "verify error:";

/// Turns a validator outcome into exactly one finding for `target`.
pub fn classify(target: &Target, outcome: RunOutcome) -> Finding {
    match outcome {
        RunOutcome::Exited {
            code: Some(0),
            stderr,
        } => {
            let summary = match_summary(&String::from_utf8_lossy(&stderr)).map(str::to_string);
            match summary {
                Some(line) => Finding::ok(line),
                None => Finding::ok(format!(
                    "{} at {} verified",
                    target.hostname,
                    target.destination()
                ))
                .with_detail(stderr),
            }
        }
        RunOutcome::Exited { code, stderr } => {
            let text = String::from_utf8_lossy(&stderr).into_owned();
            let message = verify_error(&text)
                .or_else(|| first_line(&text))
                .map(str::to_string)
                .unwrap_or_else(|| match code {
                    Some(code) => format!("validator exited with status {code}"),
                    None => "validator terminated by signal".to_string(),
                });
            Finding::critical(message).with_detail(stderr)
        }
        RunOutcome::TimedOut { after, stderr } => Finding::critical(format!(
            "Timeout: validator did not finish within {}s for {}",
            after.as_secs_f64(),
            target.destination()
        ))
        .with_detail(stderr),
        RunOutcome::Failed { program, error } => {
            Finding::critical(format!("cannot run validator {program}: {error}"))
        }
    }
}

/// The validator's line naming the TLSA record that matched.
pub(crate) fn match_summary(stderr: &str) -> Option<&str> {
    stderr
        .lines()
        .find(|line| line.contains(MATCH_MARKER))
        .map(str::trim)
}

/// Message part of the first `verify error:<field>:<message>` line.
pub(crate) fn verify_error(stderr: &str) -> Option<&str> {
    stderr
        .lines()
        .filter(|line| line.contains(VERIFY_ERROR))
        .find_map(|line| {
            let start = line.find(VERIFY_ERROR)?;
            line[start..].splitn(3, ':').nth(2)
        })
        .map(str::trim)
        .filter(|message| !message.is_empty())
}

fn first_line(stderr: &str) -> Option<&str> {
    stderr.lines().map(str::trim).find(|line| !line.is_empty())
}
