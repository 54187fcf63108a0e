//! Embedding host for a native engine runtime.
//!
//! Brings a large native engine up inside an embedding application, covering
//! the case where the engine's expansion assets are not yet on-device and
//! must be fetched before the runtime can start.
//!
//! Three pieces compose top-down:
//!
//! - [`host::Host`] — a delegation chain of host nodes; capability calls
//!   answer locally or forward to the parent, and the root supplies
//!   defaults instead of errors.
//! - [`controller::EngineLifecycleController`] — owns (or adopts) the one
//!   engine handle for its subtree and drives create → init-native-layer →
//!   init-render-view, falling back to the download workflow when assets
//!   are missing.
//! - [`download::DownloadCoordinator`] — mirrors the external download
//!   service's asynchronous reports, projects UI state, and signals
//!   completion so initialization retries exactly once.
//!
//! # Threading
//!
//! All engine calls and chain delegation happen on one logical control
//! task; the engine API is not safe to call concurrently. Service
//! notifications arrive from another process through a channel and are
//! drained sequentially on that same task.

pub mod config;
pub mod context;
pub mod controller;
pub mod download;
pub mod engine;
pub mod error;
pub mod host;
pub mod telemetry;

pub use context::{HostContext, LaunchIntent, ResumeToken};
pub use controller::{EngineLifecycleController, InitOutcome, NotificationOutcome};
pub use download::{
    DownloadCoordinator, DownloadEvent, DownloadService, DownloadSession, DownloadState,
    ProgressReport, ServiceError, ServiceNotification, StartResult, UiProjection,
};
pub use engine::{Engine, EngineFactory, EngineHandle, ProcessControl, RenderSurface};
pub use error::{CapabilityError, EngineInitError, InitError};
pub use host::{Host, HostNode, HostPlugin, SignRequest};
