//! Tracks one expansion-asset download session.
//!
//! The coordinator is a passive responder: the service drives every state
//! transition, and the coordinator only mirrors the latest report, derives
//! UI projections, and surfaces completion so the controller can retry
//! engine initialization.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::progress::ProgressReport;
use super::service::{DownloadService, ServiceError, ServiceNotification};
use super::state::{DownloadState, UiProjection};

/// Mirror of the service-side download session.
#[derive(Debug, Clone)]
pub struct DownloadSession {
    id: Uuid,
    state: DownloadState,
    paused: bool,
    progress: ProgressReport,
    last_failure: Option<DownloadState>,
}

impl DownloadSession {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            // Until the service says otherwise it is only listening.
            state: DownloadState::Idle,
            paused: false,
            progress: ProgressReport::default(),
            last_failure: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> DownloadState {
        self.state
    }

    /// Pause-button state: set whenever the latest projection is paused.
    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn progress(&self) -> &ProgressReport {
        &self.progress
    }

    pub fn last_failure(&self) -> Option<DownloadState> {
        self.last_failure
    }
}

/// What a processed notification means for the owner.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    /// New state observed. `state` is `None` for unknown wire codes, in
    /// which case the fallback projection applies.
    StateChanged {
        state: Option<DownloadState>,
        projection: UiProjection,
    },
    /// Progress counters moved.
    Progress(ProgressReport),
    /// Download finished; the owner discards the session and retries
    /// engine initialization exactly once.
    Completed,
}

/// Owns the client side of a download session.
pub struct DownloadCoordinator {
    service: Arc<dyn DownloadService>,
    session: DownloadSession,
    rx: mpsc::UnboundedReceiver<ServiceNotification>,
    connected: bool,
}

impl DownloadCoordinator {
    /// Register with the service and begin receiving notifications.
    pub async fn attach(service: Arc<dyn DownloadService>) -> Result<Self, ServiceError> {
        let (tx, rx) = mpsc::unbounded_channel();
        service.subscribe(tx)?;
        service.connect().await?;
        let session = DownloadSession::new();
        info!(session_id = %session.id(), "download session attached");
        Ok(Self { service, session, rx, connected: true })
    }

    pub fn session(&self) -> &DownloadSession {
        &self.session
    }

    /// Next queued notification, in arrival order. `None` once the service
    /// side has gone away.
    pub async fn recv_notification(&mut self) -> Option<ServiceNotification> {
        self.rx.recv().await
    }

    /// Apply one notification to the session. Callers invoke this from the
    /// control task only, one notification at a time.
    pub fn handle(&mut self, notification: ServiceNotification) -> DownloadEvent {
        match notification {
            ServiceNotification::StateChanged { code } => self.handle_state_change(code),
            ServiceNotification::Progress(report) => {
                self.session.progress = report;
                debug!(
                    session_id = %self.session.id(),
                    percent = report.percent(),
                    "download progress"
                );
                DownloadEvent::Progress(report)
            }
        }
    }

    fn handle_state_change(&mut self, code: i32) -> DownloadEvent {
        let Some(state) = DownloadState::from_code(code) else {
            warn!(session_id = %self.session.id(), code, "unknown download state code");
            let projection = UiProjection::unknown();
            self.session.paused = projection.paused;
            return DownloadEvent::StateChanged { state: None, projection };
        };

        self.session.state = state;
        let projection = UiProjection::for_state(state);
        self.session.paused = projection.paused;

        if state.is_failure() {
            self.session.last_failure = Some(state);
            warn!(session_id = %self.session.id(), ?state, "download failed");
        } else {
            debug!(session_id = %self.session.id(), ?state, "download state changed");
        }

        if state == DownloadState::Completed {
            info!(session_id = %self.session.id(), "download completed");
            return DownloadEvent::Completed;
        }

        DownloadEvent::StateChanged { state: Some(state), projection }
    }

    /// Resume notification delivery. Safe to call when already connected.
    pub async fn connect(&mut self) -> Result<(), ServiceError> {
        if self.connected {
            return Ok(());
        }
        self.service.connect().await?;
        self.connected = true;
        Ok(())
    }

    /// Stop notification delivery. Safe to call repeatedly or with no
    /// session left on the service side.
    pub async fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.service.disconnect().await;
        self.connected = false;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
