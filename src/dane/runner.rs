use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::ValidatorOptions;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How one validator invocation ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// `code` is `None` when the process was terminated by a signal.
    Exited { code: Option<i32>, stderr: Vec<u8> },
    TimedOut { after: Duration, stderr: Vec<u8> },
    /// The process could not be started or waited on.
    Failed { program: String, error: io::Error },
}

/// External TLS/DANE validator.
pub trait Validator {
    fn run(&self, args: &[String]) -> RunOutcome;
}

impl<T: Validator + ?Sized> Validator for &T {
    fn run(&self, args: &[String]) -> RunOutcome {
        (**self).run(args)
    }
}

/// Runs the validator as a child process: stdin closed, stdout discarded,
/// stderr captured.
#[derive(Debug, Clone, Default)]
pub struct OpensslValidator {
    options: ValidatorOptions,
}

impl OpensslValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    fn program(&self) -> String {
        self.options.program.display().to_string()
    }
}

impl Validator for OpensslValidator {
    fn run(&self, args: &[String]) -> RunOutcome {
        tracing::debug!(program = %self.program(), ?args, "starting validator");
        let mut child = match Command::new(&self.options.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(error) => {
                return RunOutcome::Failed {
                    program: self.program(),
                    error,
                };
            }
        };

        // Drained on its own thread so a chatty child cannot block on a full pipe.
        let reader = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                if let Err(err) = pipe.read_to_end(&mut buf) {
                    tracing::warn!(error = %err, "reading validator stderr failed");
                }
                buf
            })
        });

        let waited = match self.options.timeout {
            Some(limit) => wait_with_deadline(&mut child, limit),
            None => child.wait().map(Some),
        };
        let stderr = reader
            .map(|handle| handle.join().unwrap_or_default())
            .unwrap_or_default();

        match waited {
            Ok(Some(status)) => {
                tracing::debug!(code = ?status.code(), "validator exited");
                RunOutcome::Exited {
                    code: status.code(),
                    stderr,
                }
            }
            Ok(None) => {
                let after = self.options.timeout.unwrap_or_default();
                tracing::debug!(?after, "validator timed out");
                RunOutcome::TimedOut { after, stderr }
            }
            Err(error) => RunOutcome::Failed {
                program: self.program(),
                error,
            },
        }
    }
}

/// `Ok(None)` once `limit` has passed; the child is killed and reaped.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            if let Err(err) = child.kill() {
                tracing::warn!(error = %err, "killing validator failed");
            }
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}
