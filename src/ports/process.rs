use crate::domain::DomainError;

/// Port for running an external program and capturing its output.
///
/// Arguments are passed as argv; no shell is involved.
pub trait ProcessRunner: Send + Sync {
    /// Run `program` and return its stdout, or an error describing the failure.
    fn try_run(&self, program: &str, args: &[&str]) -> Result<String, DomainError>;

    /// Run `program` and return its stdout, or `""` on any failure.
    fn run(&self, program: &str, args: &[&str]) -> String {
        self.try_run(program, args).unwrap_or_default()
    }
}
