//! Structured logging for the embedding host.

mod logging;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
