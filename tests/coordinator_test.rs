//! Tests for the download coordinator and its session tracking.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use ember_host::context::{HostContext, ResumeToken};
use ember_host::download::{
    DownloadCoordinator, DownloadEvent, DownloadService, DownloadState, NotificationSender,
    ProgressReport, ServiceError, ServiceNotification, StartResult, UiProjection,
};

/// Service fake that records connects/disconnects and hands out the client
/// channel it was given.
#[derive(Default)]
struct FakeService {
    client: Mutex<Option<NotificationSender>>,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

impl FakeService {
    fn push(&self, notification: ServiceNotification) {
        let client = self.client.lock();
        client
            .as_ref()
            .expect("client subscribed")
            .send(notification)
            .expect("client receiver alive");
    }
}

#[async_trait]
impl DownloadService for FakeService {
    async fn start_if_required(
        &self,
        _context: &HostContext,
        _resume: &ResumeToken,
    ) -> Result<StartResult, ServiceError> {
        Ok(StartResult::Started)
    }

    fn subscribe(&self, client: NotificationSender) -> Result<(), ServiceError> {
        *self.client.lock() = Some(client);
        Ok(())
    }

    async fn connect(&self) -> Result<(), ServiceError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}

async fn attached() -> (Arc<FakeService>, DownloadCoordinator) {
    let service = Arc::new(FakeService::default());
    let coordinator = DownloadCoordinator::attach(service.clone() as Arc<dyn DownloadService>)
        .await
        .expect("attach succeeds");
    (service, coordinator)
}

#[tokio::test]
async fn attach_subscribes_and_connects() {
    let (service, coordinator) = attached().await;
    assert!(service.client.lock().is_some());
    assert_eq!(service.connects.load(Ordering::SeqCst), 1);
    assert!(coordinator.is_connected());
    assert_eq!(coordinator.session().state(), DownloadState::Idle);
}

#[tokio::test]
async fn state_change_updates_session_and_projects() {
    let (_service, mut coordinator) = attached().await;

    let event = coordinator.handle(ServiceNotification::StateChanged {
        code: DownloadState::Downloading.code(),
    });
    assert_eq!(
        event,
        DownloadEvent::StateChanged {
            state: Some(DownloadState::Downloading),
            projection: UiProjection::for_state(DownloadState::Downloading),
        }
    );
    assert_eq!(coordinator.session().state(), DownloadState::Downloading);
    assert!(!coordinator.session().paused());
}

#[tokio::test]
async fn failure_state_records_last_failure_and_pauses() {
    let (_service, mut coordinator) = attached().await;

    coordinator.handle(ServiceNotification::StateChanged {
        code: DownloadState::FailedUnlicensed.code(),
    });
    assert_eq!(
        coordinator.session().last_failure(),
        Some(DownloadState::FailedUnlicensed)
    );
    assert!(coordinator.session().paused());
}

#[tokio::test]
async fn unknown_code_keeps_state_and_projects_fallback() {
    let (_service, mut coordinator) = attached().await;

    coordinator.handle(ServiceNotification::StateChanged {
        code: DownloadState::Downloading.code(),
    });
    let event = coordinator.handle(ServiceNotification::StateChanged { code: 42 });

    assert_eq!(
        event,
        DownloadEvent::StateChanged { state: None, projection: UiProjection::unknown() }
    );
    // Previous state survives an unknown code.
    assert_eq!(coordinator.session().state(), DownloadState::Downloading);
    assert!(coordinator.session().paused());
}

#[tokio::test]
async fn completed_yields_completed_event() {
    let (_service, mut coordinator) = attached().await;

    let event = coordinator.handle(ServiceNotification::StateChanged {
        code: DownloadState::Completed.code(),
    });
    assert_eq!(event, DownloadEvent::Completed);
}

#[tokio::test]
async fn projection_depends_only_on_latest_state() {
    let (_service, mut coordinator) = attached().await;

    // Two different histories ending in the same state.
    for code in [2, 3, 4, 7] {
        coordinator.handle(ServiceNotification::StateChanged { code });
    }
    let a = coordinator.handle(ServiceNotification::StateChanged { code: 4 });

    let (_service2, mut fresh) = attached().await;
    let b = fresh.handle(ServiceNotification::StateChanged { code: 4 });

    assert_eq!(a, b);
}

#[tokio::test]
async fn progress_updates_session_counters() {
    let (_service, mut coordinator) = attached().await;

    let report = ProgressReport {
        downloaded_bytes: 50,
        total_bytes: 200,
        speed_bps: 2048.0,
        eta: Duration::from_secs(30),
    };
    let event = coordinator.handle(ServiceNotification::Progress(report));
    assert_eq!(event, DownloadEvent::Progress(report));
    assert_eq!(coordinator.session().progress().percent(), 25);
}

#[tokio::test]
async fn notifications_arrive_in_order_through_channel() {
    let (service, mut coordinator) = attached().await;

    service.push(ServiceNotification::StateChanged { code: 2 });
    service.push(ServiceNotification::StateChanged { code: 4 });

    let first = coordinator.recv_notification().await.unwrap();
    let second = coordinator.recv_notification().await.unwrap();
    assert_eq!(first, ServiceNotification::StateChanged { code: 2 });
    assert_eq!(second, ServiceNotification::StateChanged { code: 4 });
}

#[tokio::test]
async fn disconnect_is_idempotent() {
    let (service, mut coordinator) = attached().await;

    coordinator.disconnect().await;
    coordinator.disconnect().await;
    assert_eq!(service.disconnects.load(Ordering::SeqCst), 1);
    assert!(!coordinator.is_connected());
}

#[tokio::test]
async fn reconnect_after_disconnect_hits_service_once() {
    let (service, mut coordinator) = attached().await;

    coordinator.disconnect().await;
    coordinator.connect().await.unwrap();
    coordinator.connect().await.unwrap();
    assert_eq!(service.connects.load(Ordering::SeqCst), 2);
}
