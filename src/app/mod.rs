pub mod controller;
pub mod resolver;

pub use controller::AppController;
pub use resolver::ModelResolver;
