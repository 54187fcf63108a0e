//! Opaque interface to the native engine runtime.
//!
//! The engine itself lives outside this crate; the controller only needs the
//! calls below. None of them are safe to invoke concurrently — everything
//! goes through the single control task.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::EngineInitError;
use crate::host::Host;

/// Opaque render surface produced by `init_render_view`. The owning host
/// presents it; this crate never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSurface(u64);

impl RenderSurface {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Native engine runtime, as seen by the lifecycle controller.
pub trait Engine: Send + Sync {
    /// First contact. Binds the engine to the host that will own it.
    fn create(&self, host: Arc<dyn Host>);

    /// Bring up the native layer. `MissingData` means expansion assets are
    /// absent and the download fallback should run.
    fn init_native_layer(&self, host: Arc<dyn Host>) -> Result<(), EngineInitError>;

    /// Produce the surface the owner must present. Only fatal failures are
    /// expected here; assets were already verified by the native layer.
    fn init_render_view(&self, host: Arc<dyn Host>) -> Result<RenderSurface, EngineInitError>;

    /// Tear the engine down. Called exactly once, by the owner.
    fn destroy(&self);

    /// Whether the native layer finished initializing.
    fn is_initialized(&self) -> bool;

    fn pause(&self);
    fn resume(&self);
    fn start(&self);
    fn stop(&self);

    fn on_configuration_changed(&self);
    fn on_activity_result(&self, request: i32, result: i32, data: Option<String>);
    fn on_permissions_result(&self, request: i32, permissions: &[String], granted: &[bool]);
    fn on_back_pressed(&self);

    /// Blocking user-visible alert. `on_dismiss` runs once the user
    /// acknowledges; fatal paths use it to terminate the process.
    fn alert(&self, message: &str, title: &str, on_dismiss: Box<dyn FnOnce() + Send>);
}

/// Shared reference to one running engine instance.
///
/// Cloned freely down the host chain; created and destroyed only by the
/// topmost controller that built it.
#[derive(Clone)]
pub struct EngineHandle {
    id: Uuid,
    engine: Arc<dyn Engine>,
}

impl EngineHandle {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { id: Uuid::new_v4(), engine }
    }

    /// Stable identity for logs and adoption checks.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether two handles refer to the same engine instance.
    pub fn same_instance(&self, other: &EngineHandle) -> bool {
        self.id == other.id
    }
}

impl Deref for EngineHandle {
    type Target = dyn Engine;

    fn deref(&self) -> &Self::Target {
        self.engine.as_ref()
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle").field("id", &self.id).finish()
    }
}

/// Constructs engine instances for controllers that own their subtree.
pub trait EngineFactory: Send + Sync {
    fn create_engine(&self, context: &crate::context::HostContext) -> EngineHandle;
}

/// Process termination seam. Restart mechanics live outside this crate; the
/// controller only ever asks for termination, and only after the user has
/// dismissed a blocking alert.
pub trait ProcessControl: Send + Sync {
    fn terminate(&self);
}
