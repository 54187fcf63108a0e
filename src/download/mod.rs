//! Expansion-asset download tracking.
//!
//! The download service runs in another process and owns the transfer; this
//! module only mirrors its reported state, derives the UI projections the
//! presentation layer needs, and tells the controller when to retry engine
//! initialization.

mod coordinator;
mod progress;
mod service;
mod state;
pub mod wire;

pub use coordinator::{DownloadCoordinator, DownloadEvent, DownloadSession};
pub use progress::{ProgressReport, ScaledProgress};
pub use service::{
    DownloadService, NotificationSender, ServiceError, ServiceNotification, StartResult,
};
pub use state::{DownloadState, UiProjection};
