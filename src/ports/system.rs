/// Port for reading the machine's model information from the operating system.
///
/// Every probe is a side-effect-free read that runs once and never retries.
/// Failures are reported as `None`; implementations log the cause.
pub trait SystemIdentifierSource: Send + Sync {
    /// Raw value of the `hw.model` system property.
    fn raw_model_identifier(&self) -> Option<String>;

    /// Marketing name cached by System Profiler in the user's preferences.
    fn cpu_name_fallback(&self) -> Option<String>;

    /// Model line from the hardware-description file.
    fn hardware_file_model_line(&self) -> Option<String>;
}
