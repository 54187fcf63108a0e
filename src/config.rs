//! Host configuration loading from environment variables.
//!
//! All values come from `EMBER_HOST_*` environment variables with sensible
//! defaults. Invalid values fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `EMBER_HOST_LOG` | info | Log filter directive |
//! | `EMBER_HOST_LOG_FORMAT` | json | Log format (`json` or `pretty`) |
//! | `EMBER_HOST_EXTRA_ARGS` | (empty) | Extra engine command-line args, whitespace-separated |
//! | `EMBER_HOST_WIRE_FRAME_LIMIT` | 65536 | Max service notification frame (bytes) |

use crate::context::{HostContext, LaunchIntent};
use crate::download::wire::{decode_notification, WireError, DEFAULT_MAX_FRAME};
use crate::download::ServiceNotification;
use crate::telemetry::{LogConfig, LogFormat};

/// All host configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log: LogConfig,
    /// Extra command-line arguments appended when the engine is created.
    pub extra_args: Vec<String>,
    /// Cap on one service notification frame.
    pub wire_frame_limit: usize,
}

impl EnvConfig {
    /// Build the context a controller runs with, carrying the configured
    /// extra engine arguments alongside the launch intent.
    pub fn host_context(&self, intent: LaunchIntent) -> HostContext {
        HostContext {
            intent,
            extra_args: self.extra_args.clone(),
        }
    }

    /// Decode a service notification frame under the configured size cap.
    pub fn decode_notification(&self, bytes: &[u8]) -> Result<ServiceNotification, WireError> {
        decode_notification(bytes, self.wire_frame_limit)
    }
}

/// Parse a `usize` env var, returning `default` on missing or invalid.
fn parse_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.parse::<usize>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> EnvConfig {
    let level = std::env::var("EMBER_HOST_LOG").unwrap_or_else(|_| "info".to_string());
    let format = std::env::var("EMBER_HOST_LOG_FORMAT")
        .map(|v| LogFormat::parse(&v))
        .unwrap_or_default();
    let extra_args = std::env::var("EMBER_HOST_EXTRA_ARGS")
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    const MIN_FRAME: usize = 1024;
    let wire_frame_limit = parse_usize("EMBER_HOST_WIRE_FRAME_LIMIT", DEFAULT_MAX_FRAME);
    let wire_frame_limit = wire_frame_limit.max(MIN_FRAME);

    EnvConfig {
        log: LogConfig { format, level },
        extra_args,
        wire_frame_limit,
    }
}
