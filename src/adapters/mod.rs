pub mod config_store;
pub mod process_runner;
pub mod system_source;

pub use config_store::TomlConfigStore;
pub use process_runner::SystemProcessRunner;
pub use system_source::MacSystemSource;
