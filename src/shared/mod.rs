// Shared kernel used by every module

pub mod config; // Environment-driven settings
pub mod errors; // Shared error types
pub mod utils; // Logging helpers

pub use config::AppConfig;
pub use errors::{AppError, AppResult};
