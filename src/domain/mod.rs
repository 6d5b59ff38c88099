pub mod catalog;
pub mod config;
pub mod error;
pub mod identifier;
pub mod resolution;

pub use catalog::{ModelCatalog, ModelRecord};
pub use config::{AppConfig, LoggingConfig, ProbeConfig};
pub use error::DomainError;
pub use identifier::{
    parse_model_identifier, MacType, GENERIC_PRODUCT_NAME, PREFERENCES_PROBE_EXEMPT_IDENTIFIER,
    UNKNOWN_IDENTIFIER,
};
pub use resolution::{AtomicResolverState, ResolvedModel, ResolverState};
