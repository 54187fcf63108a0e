//! Interface to the out-of-process download service.
//!
//! The service owns the transfer and reports back asynchronously. Reports
//! are typed events pushed into an unbounded channel; the receiving side
//! drains them one at a time on the host's control task, so no notification
//! is ever processed concurrently with another or with an engine call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use super::progress::ProgressReport;
use crate::context::{HostContext, ResumeToken};

/// Client end the service pushes notifications into.
pub type NotificationSender = mpsc::UnboundedSender<ServiceNotification>;

/// Asynchronous report from the download service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServiceNotification {
    /// The service entered a new state. Carries the raw wire code; mapping
    /// to `DownloadState` happens on the receiving side.
    StateChanged { code: i32 },
    /// Periodic progress update, separate from state changes.
    Progress(ProgressReport),
}

/// Outcome of asking the service whether a download is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartResult {
    /// Assets are already present; no session was created.
    NoDownloadRequired,
    /// A download session started (or resumed); attach a client to track it.
    Started,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The service process could not be started or resolved.
    #[error("download service could not be resolved: {0}")]
    Unresolved(String),

    /// The service has no download metadata for this package.
    #[error("no download metadata for package {0}")]
    PackageMetadataNotFound(String),
}

/// The download service as the coordinator sees it.
///
/// `connect` and `disconnect` are both idempotent: connecting twice is a
/// no-op, and disconnecting without a session must not fail.
#[async_trait]
pub trait DownloadService: Send + Sync {
    /// Ask the service to start a download if the package needs one. The
    /// resume token lets the service relaunch the host once assets land.
    async fn start_if_required(
        &self,
        context: &HostContext,
        resume: &ResumeToken,
    ) -> Result<StartResult, ServiceError>;

    /// Register the client channel notifications are delivered into.
    /// Replaces any previously registered client.
    fn subscribe(&self, client: NotificationSender) -> Result<(), ServiceError>;

    /// Begin (or resume) delivery of notifications.
    async fn connect(&self) -> Result<(), ServiceError>;

    /// Stop delivery of notifications. Never fails, even with no session.
    async fn disconnect(&self);
}
