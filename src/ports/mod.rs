pub mod config;
pub mod process;
pub mod system;

pub use config::ConfigStore;
pub use process::ProcessRunner;
pub use system::SystemIdentifierSource;
