// Imagepress Library
// Image conversion, inspection and diagonal text watermarking

pub mod codec;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod logging;
pub mod operations;
pub mod watermark;

pub use context::ServiceContext;
pub use error::{ErrorCategory, ServiceError};
