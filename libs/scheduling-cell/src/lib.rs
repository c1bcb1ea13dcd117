pub mod error;
pub mod models;
pub mod services;

// Re-export the models and the pipeline surface for external use
pub use error::SchedulingError;
pub use models::*;
pub use services::*;
