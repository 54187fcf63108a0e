//! Wire format for service notifications crossing the process boundary.
//!
//! Versioned JSON frames with a size guard. Malformed or oversized frames
//! are rejected with an error, never dropped silently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::service::ServiceNotification;

/// Frame version emitted by this build.
pub const CURRENT_WIRE_VERSION: u16 = 1;

/// Default cap on a single notification frame.
pub const DEFAULT_MAX_FRAME: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("unsupported wire version {0}")]
    UnsupportedVersion(u16),

    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Frame {
    version: u16,
    notification: ServiceNotification,
}

/// Encode a notification into a wire frame.
pub fn encode_notification(notification: &ServiceNotification) -> Result<Vec<u8>, WireError> {
    let frame = Frame {
        version: CURRENT_WIRE_VERSION,
        notification: notification.clone(),
    };
    Ok(serde_json::to_vec(&frame)?)
}

/// Decode a wire frame, enforcing `max_frame`.
pub fn decode_notification(
    bytes: &[u8],
    max_frame: usize,
) -> Result<ServiceNotification, WireError> {
    if bytes.len() > max_frame {
        return Err(WireError::FrameTooLarge { size: bytes.len(), max: max_frame });
    }
    let frame: Frame = serde_json::from_slice(bytes)?;
    if frame.version != CURRENT_WIRE_VERSION {
        return Err(WireError::UnsupportedVersion(frame.version));
    }
    Ok(frame.notification)
}
