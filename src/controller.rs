//! Engine lifecycle orchestration.
//!
//! Drives create → init-native-layer → init-render-view, adopting an
//! ancestor's engine when the chain already owns one. A missing-data
//! failure switches to the download fallback; completion of the download
//! retries initialization exactly once. Fatal failures always surface a
//! blocking alert before the process is terminated.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::context::HostContext;
use crate::download::{
    DownloadCoordinator, DownloadEvent, DownloadService, DownloadSession, ServiceError,
    ServiceNotification, StartResult,
};
use crate::engine::{EngineFactory, EngineHandle, ProcessControl, RenderSurface};
use crate::error::{EngineInitError, InitError};
use crate::host::Host;

const ALERT_TITLE: &str = "Engine setup error";

/// One-shot hook consumed by the next activity result before it reaches the
/// engine.
pub type ResultCallback = Box<dyn FnOnce(i32, i32, Option<String>) + Send>;

/// What `initialize` produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Engine is up; the owner presents this surface.
    Ready(RenderSurface),
    /// Expansion assets are downloading; the owner presents the download
    /// surface instead and feeds notifications back in.
    AwaitingDownload,
}

/// What processing a service notification produced.
#[derive(Debug)]
pub enum NotificationOutcome {
    /// UI-relevant download event; the session continues.
    Download(DownloadEvent),
    /// The download completed and initialization was retried.
    Initialized(InitOutcome),
}

enum Attempt {
    Done(InitOutcome),
    Retry,
}

/// Owns (or adopts) the engine handle for one host subtree.
pub struct EngineLifecycleController {
    factory: Arc<dyn EngineFactory>,
    service: Arc<dyn DownloadService>,
    process: Arc<dyn ProcessControl>,
    context: HostContext,
    engine: Option<EngineHandle>,
    owns_engine: bool,
    downloader: Option<DownloadCoordinator>,
    forced_retry_used: bool,
    result_callback: Option<ResultCallback>,
}

impl EngineLifecycleController {
    pub fn new(
        factory: Arc<dyn EngineFactory>,
        service: Arc<dyn DownloadService>,
        process: Arc<dyn ProcessControl>,
        context: HostContext,
    ) -> Self {
        Self {
            factory,
            service,
            process,
            context,
            engine: None,
            owns_engine: false,
            downloader: None,
            forced_retry_used: false,
            result_callback: None,
        }
    }

    /// The handle this subtree observes, once acquired.
    pub fn engine(&self) -> Option<&EngineHandle> {
        self.engine.as_ref()
    }

    /// Whether this controller created (and will destroy) the engine.
    pub fn owns_engine(&self) -> bool {
        self.owns_engine
    }

    /// The tracked download session, while the fallback is active.
    pub fn download_session(&self) -> Option<&DownloadSession> {
        self.downloader.as_ref().map(DownloadCoordinator::session)
    }

    pub fn has_active_download(&self) -> bool {
        self.downloader.is_some()
    }

    /// Bring the engine up for `host`.
    ///
    /// Adopts an ancestor-owned handle when one exists; otherwise creates
    /// one and runs the native-layer sequence. Returns `AwaitingDownload`
    /// when assets must be fetched first — the download session is then
    /// live and [`process_notification`](Self::process_notification) drives
    /// the rest.
    pub async fn initialize(&mut self, host: &Arc<dyn Host>) -> Result<InitOutcome, InitError> {
        let started = Instant::now();
        async {
            loop {
                match self.initialize_once(host).await? {
                    Attempt::Done(outcome) => {
                        if let InitOutcome::Ready(_) = outcome {
                            info!(
                                elapsed_ms = started.elapsed().as_millis() as u64,
                                "engine initialized"
                            );
                        }
                        return Ok(outcome);
                    }
                    // Bounded: the forced-retry flag flips before a retry
                    // is ever granted, and a second miss is an error.
                    Attempt::Retry => continue,
                }
            }
        }
        .instrument(info_span!("startup"))
        .await
    }

    async fn initialize_once(&mut self, host: &Arc<dyn Host>) -> Result<Attempt, InitError> {
        let adopted;
        let engine = if let Some(handle) = self.engine.clone() {
            adopted = !self.owns_engine;
            handle
        } else if let Some(handle) = host.parent().and_then(|p| p.engine()) {
            debug!(engine_id = %handle.id(), "adopting ancestor-owned engine");
            adopted = true;
            self.owns_engine = false;
            self.engine = Some(handle.clone());
            handle
        } else {
            let handle = self.factory.create_engine(&self.context);
            debug!(engine_id = %handle.id(), "created engine");
            adopted = false;
            self.owns_engine = true;
            self.engine = Some(handle.clone());
            handle
        };

        if !adopted {
            engine.create(host.clone());
            match engine.init_native_layer(host.clone()) {
                Ok(()) => {}
                Err(EngineInitError::MissingData) => {
                    debug!("native layer reported missing expansion assets");
                    return self.begin_download_fallback().await;
                }
                Err(EngineInitError::Fatal(message)) => {
                    return Err(self.fail_fatal(&engine, message));
                }
            }
        }

        match engine.init_render_view(host.clone()) {
            Ok(surface) => {
                self.forced_retry_used = false;
                Ok(Attempt::Done(InitOutcome::Ready(surface)))
            }
            Err(EngineInitError::Fatal(message)) => Err(self.fail_fatal(&engine, message)),
            Err(EngineInitError::MissingData) => {
                // The native layer already verified assets; missing data
                // here is an engine contract violation.
                Err(self.fail_fatal(&engine, "render view reported missing data".to_string()))
            }
        }
    }

    async fn begin_download_fallback(&mut self) -> Result<Attempt, InitError> {
        let resume = self.context.resume_token();
        match self.service.start_if_required(&self.context, &resume).await {
            Ok(StartResult::NoDownloadRequired) => {
                if self.forced_retry_used {
                    warn!("assets still missing although no download is required");
                    if let Some(engine) = self.engine.clone() {
                        self.alert_then_terminate(&engine, "Required data is missing and cannot be downloaded");
                    }
                    return Err(InitError::MissingDataExhausted);
                }
                debug!("no download required, retrying initialization once");
                self.forced_retry_used = true;
                Ok(Attempt::Retry)
            }
            Ok(StartResult::Started) => {
                let coordinator = match DownloadCoordinator::attach(self.service.clone()).await {
                    Ok(coordinator) => coordinator,
                    Err(err) => return Err(self.fail_service(err)),
                };
                info!(session_id = %coordinator.session().id(), "awaiting expansion download");
                self.downloader = Some(coordinator);
                Ok(Attempt::Done(InitOutcome::AwaitingDownload))
            }
            Err(ServiceError::PackageMetadataNotFound(package)) => {
                error!(%package, "unable to start download service: no package metadata");
                Err(InitError::PackageMetadataNotFound(package))
            }
            Err(err @ ServiceError::Unresolved(_)) => Err(self.fail_service(err)),
        }
    }

    fn fail_fatal(&self, engine: &EngineHandle, message: String) -> InitError {
        error!(engine_id = %engine.id(), %message, "engine initialization failed");
        self.alert_then_terminate(engine, &message);
        InitError::FatalEngine(message)
    }

    fn fail_service(&self, err: ServiceError) -> InitError {
        error!(%err, "download service unavailable");
        if let Some(engine) = &self.engine {
            self.alert_then_terminate(engine, &err.to_string());
        }
        InitError::ServiceUnavailable(err.to_string())
    }

    fn alert_then_terminate(&self, engine: &EngineHandle, message: &str) {
        let process = self.process.clone();
        engine.alert(message, ALERT_TITLE, Box::new(move || process.terminate()));
    }

    /// Next service notification, in arrival order. `None` when no download
    /// session is active or the service side has gone away.
    pub async fn recv_notification(&mut self) -> Option<ServiceNotification> {
        match self.downloader.as_mut() {
            Some(coordinator) => coordinator.recv_notification().await,
            None => None,
        }
    }

    /// Apply one service notification on the control task.
    ///
    /// On completion the session is discarded and `initialize` runs exactly
    /// once. Notifications arriving without a session are ignored.
    pub async fn process_notification(
        &mut self,
        host: &Arc<dyn Host>,
        notification: ServiceNotification,
    ) -> Result<Option<NotificationOutcome>, InitError> {
        let Some(coordinator) = self.downloader.as_mut() else {
            debug!("service notification without an active session, ignoring");
            return Ok(None);
        };

        match coordinator.handle(notification) {
            DownloadEvent::Completed => {
                if let Some(mut coordinator) = self.downloader.take() {
                    coordinator.disconnect().await;
                }
                let outcome = self.initialize(host).await?;
                Ok(Some(NotificationOutcome::Initialized(outcome)))
            }
            event => Ok(Some(NotificationOutcome::Download(event))),
        }
    }

    /// Host became visible. Routes to the engine once initialized, else
    /// reconnects the download client.
    pub async fn start(&mut self) {
        if let Some(engine) = self.initialized_engine() {
            engine.start();
            return;
        }
        self.reconnect_downloader().await;
    }

    /// Host gained focus.
    pub async fn resume(&mut self) {
        if let Some(engine) = self.initialized_engine() {
            engine.resume();
            return;
        }
        self.reconnect_downloader().await;
    }

    /// Host lost focus.
    pub async fn pause(&mut self) {
        if let Some(engine) = self.initialized_engine() {
            engine.pause();
            return;
        }
        if let Some(coordinator) = self.downloader.as_mut() {
            coordinator.disconnect().await;
        }
    }

    /// Host no longer visible.
    pub async fn stop(&mut self) {
        if let Some(engine) = self.initialized_engine() {
            engine.stop();
            return;
        }
        if let Some(coordinator) = self.downloader.as_mut() {
            coordinator.disconnect().await;
        }
    }

    /// Tear everything down. Destroys the engine exactly once, and only
    /// when this controller created it; adopted handles are left alone.
    /// Safe to call more than once.
    pub async fn teardown(&mut self) {
        if let Some(mut coordinator) = self.downloader.take() {
            coordinator.disconnect().await;
        }
        if let Some(engine) = self.engine.take() {
            if self.owns_engine {
                info!(engine_id = %engine.id(), "destroying engine");
                engine.destroy();
            }
            self.owns_engine = false;
        }
    }

    fn initialized_engine(&self) -> Option<&EngineHandle> {
        self.engine.as_ref().filter(|engine| engine.is_initialized())
    }

    async fn reconnect_downloader(&mut self) {
        if let Some(coordinator) = self.downloader.as_mut() {
            if let Err(err) = coordinator.connect().await {
                // Lifecycle routing never raises; the session just stays
                // disconnected until the next attempt.
                warn!(%err, "could not reconnect to download service");
            }
        }
    }

    /// Arm a one-shot callback consumed by the next activity result.
    pub fn set_result_callback(&mut self, callback: ResultCallback) {
        self.result_callback = Some(callback);
    }

    pub fn on_configuration_changed(&self) {
        if let Some(engine) = &self.engine {
            engine.on_configuration_changed();
        }
    }

    pub fn on_activity_result(&mut self, request: i32, result: i32, data: Option<String>) {
        if let Some(callback) = self.result_callback.take() {
            callback(request, result, data.clone());
        }
        if let Some(engine) = &self.engine {
            engine.on_activity_result(request, result, data);
        }
    }

    pub fn on_permissions_result(&self, request: i32, permissions: &[String], granted: &[bool]) {
        if let Some(engine) = &self.engine {
            engine.on_permissions_result(request, permissions, granted);
        }
    }

    pub fn on_back_pressed(&self) {
        if let Some(engine) = &self.engine {
            engine.on_back_pressed();
        }
    }
}
