#![forbid(unsafe_code)]

//! Resolve a Mac's hardware model identifier (e.g. `MacBookPro16,1`) into a
//! product name and built-in display size.
//!
//! Resolution consults an embedded catalog first and falls back to OS probes
//! (System Profiler preferences or the hardware-description file) to refine
//! generic names. The result is computed once per process.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use app::{AppController, ModelResolver};
pub use domain::{DomainError, MacType, ModelCatalog, ModelRecord, ResolvedModel, ResolverState};

/// Entry point for the `macmodel` binary: resolve and print the model as JSON.
pub fn run() {
    let controller = match AppController::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    let model = controller.resolve();
    match serde_json::to_string_pretty(&model) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize resolved model: {}", e);
            std::process::exit(1);
        }
    }
}
