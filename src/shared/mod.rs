// Shared kernel used by the feature modules

pub mod config; // Environment-driven settings
pub mod errors; // Shared error types
pub mod utils; // Logging helpers

pub use config::ImportApiConfig;
pub use errors::{AppError, AppResult};
