pub mod analysis;
pub mod config;
pub mod error;
pub mod import;
pub mod telemetry;

pub use error::AppError;
