use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::domain::config::DEFAULT_COMMAND_TIMEOUT_MS;
use crate::domain::DomainError;
use crate::ports::ProcessRunner;

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default upper bound for a single command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(DEFAULT_COMMAND_TIMEOUT_MS);

/// Runs programs directly (no shell) with a bounded wall-clock timeout.
///
/// A child still running at the deadline is killed and the call fails
/// with [`DomainError::CommandTimeout`].
#[derive(Debug, Clone)]
pub struct SystemProcessRunner {
    timeout: Duration,
}

impl SystemProcessRunner {
    /// Create a runner with the given timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

/// Kill a child that is being abandoned and collect its exit status.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl ProcessRunner for SystemProcessRunner {
    fn try_run(&self, program: &str, args: &[&str]) -> Result<String, DomainError> {
        let fail = |reason: String| DomainError::CommandExecution {
            program: program.to_string(),
            reason,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| fail(format!("failed to spawn: {}", e)))?;

        // Drain stdout concurrently so a chatty child cannot fill the pipe and stall.
        // The result comes back over a channel so the wait for EOF is bounded too:
        // a background descendant can hold the pipe open after the child exits.
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| fail("stdout was not captured".to_string()))?;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });

        let timed_out = || DomainError::CommandTimeout {
            program: program.to_string(),
            timeout_ms: self.timeout.as_millis() as u64,
        };

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    reap(&mut child);
                    return Err(timed_out());
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    reap(&mut child);
                    return Err(fail(format!("failed to wait: {}", e)));
                }
            }
        };

        let bytes = match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(read) => read.map_err(|e| fail(format!("failed to read stdout: {}", e)))?,
            Err(RecvTimeoutError::Timeout) => {
                warn!(program, "Command exited but its output pipe stayed open");
                return Err(timed_out());
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(fail("stdout reader panicked".to_string()))
            }
        };

        if !status.success() {
            return Err(fail(format!("exited with {}", status)));
        }

        let output = String::from_utf8(bytes).map_err(|e| fail(format!("invalid UTF-8: {}", e)))?;
        debug!(program, bytes = output.len(), "Command completed");
        Ok(output)
    }

    fn run(&self, program: &str, args: &[&str]) -> String {
        match self.try_run(program, args) {
            Ok(output) => output,
            Err(e) => {
                warn!(program, error = %e, "Command failed, treating output as empty");
                String::new()
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let runner = SystemProcessRunner::default();
        let output = runner.try_run("echo", &["hello", "world"]).unwrap();
        assert_eq!(output, "hello world\n");
    }

    #[test]
    fn test_args_are_not_shell_interpreted() {
        let runner = SystemProcessRunner::default();
        let output = runner.try_run("echo", &["$HOME | uniq"]).unwrap();
        assert_eq!(output.trim(), "$HOME | uniq");
    }

    #[test]
    fn test_missing_program_is_empty() {
        let runner = SystemProcessRunner::default();
        let err = runner.try_run("definitely-not-a-real-program-1234", &[]);
        assert!(matches!(err, Err(DomainError::CommandExecution { .. })));
        assert_eq!(runner.run("definitely-not-a-real-program-1234", &[]), "");
    }

    #[test]
    fn test_nonzero_exit_is_empty() {
        let runner = SystemProcessRunner::default();
        let err = runner.try_run("sh", &["-c", "echo partial; exit 3"]);
        assert!(matches!(err, Err(DomainError::CommandExecution { .. })));
        assert_eq!(runner.run("sh", &["-c", "echo partial; exit 3"]), "");
    }

    #[test]
    fn test_invalid_utf8_is_empty() {
        let runner = SystemProcessRunner::default();
        assert_eq!(runner.run("printf", &["\\377\\376"]), "");
    }

    #[test]
    fn test_default_timeout_matches_config() {
        let config = crate::domain::ProbeConfig::default();
        assert_eq!(SystemProcessRunner::default().timeout, config.command_timeout());
    }

    #[test]
    fn test_reap_collects_running_child() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        reap(&mut child);
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn test_timeout_kills_child() {
        let runner = SystemProcessRunner::new(Duration::from_millis(100));
        let started = Instant::now();
        let err = runner.try_run("sleep", &["5"]);

        assert!(matches!(
            err,
            Err(DomainError::CommandTimeout { timeout_ms: 100, .. })
        ));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_covers_descendants_holding_stdout() {
        let runner = SystemProcessRunner::new(Duration::from_millis(100));
        let started = Instant::now();
        let err = runner.try_run("sh", &["-c", "sleep 3 & echo hi"]);

        assert!(matches!(
            err,
            Err(DomainError::CommandTimeout { timeout_ms: 100, .. })
        ));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_fast_descendant_output_is_kept() {
        let runner = SystemProcessRunner::default();
        let output = runner.try_run("sh", &["-c", "(echo child) & wait; echo parent"]).unwrap();
        assert!(output.contains("child"));
        assert!(output.ends_with("parent\n"));
    }
}
