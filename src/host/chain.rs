//! Chain-of-responsibility over host capabilities.
//!
//! Every capability call is answered locally when the node has an
//! authoritative answer, otherwise forwarded unmodified to the parent. A
//! node without a parent is the root and supplies the documented default:
//! empty collection, `false`, `0`, `CapabilityError::Unavailable`, or a
//! no-op. Chain calls never fail from absence alone.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::engine::EngineHandle;
use crate::error::CapabilityError;

/// Package signing parameters forwarded up the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub keystore_path: PathBuf,
    pub keystore_user: String,
    pub keystore_password: String,
}

/// Capability plugin registered against a host node.
pub trait HostPlugin: Send + Sync {
    /// Unique plugin name; registration dedupes on it.
    fn name(&self) -> &str;
}

/// A participant in the delegation chain.
///
/// Only `parent` is required. Every other method has a provided body that
/// forwards to the parent or returns the root default, so an implementor
/// overrides exactly the capabilities it answers for. Parents are looked up
/// per call and held weakly — the chain never controls lifetimes.
pub trait Host: Send + Sync {
    /// The next node up, if any. The root returns `None`.
    fn parent(&self) -> Option<Arc<dyn Host>> {
        None
    }

    /// The engine instance owned by this node or an ancestor. Every level
    /// of the chain observes the same handle once one is acquired.
    fn engine(&self) -> Option<EngineHandle> {
        self.parent().and_then(|p| p.engine())
    }

    /// Command-line arguments for the engine.
    fn command_line(&self) -> Vec<String> {
        match self.parent() {
            Some(p) => p.command_line(),
            None => Vec::new(),
        }
    }

    /// Engine setup finished.
    fn on_setup_completed(&self) {
        if let Some(p) = self.parent() {
            p.on_setup_completed();
        }
    }

    /// Engine main loop started ticking.
    fn on_main_loop_started(&self) {
        if let Some(p) = self.parent() {
            p.on_main_loop_started();
        }
    }

    /// Engine asked for a forced quit. Returns whether the quit was handled.
    fn on_force_quit(&self, instance_id: Option<i32>) -> bool {
        match self.parent() {
            Some(p) => p.on_force_quit(instance_id),
            None => false,
        }
    }

    /// Engine asked for a restart of the host process.
    fn on_restart_requested(&self) {
        if let Some(p) = self.parent() {
            p.on_restart_requested();
        }
    }

    /// Engine asked for a second instance. Returns the new instance id, or
    /// `0` when nobody in the chain can spawn one.
    fn on_new_instance_requested(&self, args: &[String]) -> i32 {
        match self.parent() {
            Some(p) => p.on_new_instance_requested(args),
            None => 0,
        }
    }

    /// Plugins this subtree contributes to the given engine.
    fn host_plugins(&self, engine: &EngineHandle) -> Vec<Arc<dyn HostPlugin>> {
        match self.parent() {
            Some(p) => p.host_plugins(engine),
            None => Vec::new(),
        }
    }

    /// Sign a package on behalf of the engine.
    fn sign_package(&self, request: &SignRequest) -> Result<(), CapabilityError> {
        match self.parent() {
            Some(p) => p.sign_package(request),
            None => Err(CapabilityError::Unavailable),
        }
    }

    /// Verify a package's signature on behalf of the engine.
    fn verify_package(&self, package_path: &Path) -> Result<(), CapabilityError> {
        match self.parent() {
            Some(p) => p.verify_package(package_path),
            None => Err(CapabilityError::Unavailable),
        }
    }

    /// Whether some node in the chain supports a feature tag.
    fn supports_feature(&self, feature_tag: &str) -> bool {
        match self.parent() {
            Some(p) => p.supports_feature(feature_tag),
            None => false,
        }
    }
}

/// Ready-made chain node: weak parent link, command line, plugin and
/// feature registries. Embedders that need custom behavior implement `Host`
/// directly instead.
pub struct HostNode {
    parent: Option<Weak<dyn Host>>,
    command_line: Vec<String>,
    plugins: RwLock<Vec<Arc<dyn HostPlugin>>>,
    features: RwLock<HashSet<String>>,
}

impl HostNode {
    /// A root node with no parent.
    pub fn root(command_line: Vec<String>) -> Self {
        Self {
            parent: None,
            command_line,
            plugins: RwLock::new(Vec::new()),
            features: RwLock::new(HashSet::new()),
        }
    }

    /// A node chained under `parent`. The reference is weak; dropping the
    /// parent silently turns this node into a root.
    pub fn chained(parent: &Arc<dyn Host>, command_line: Vec<String>) -> Self {
        Self {
            parent: Some(Arc::downgrade(parent)),
            command_line,
            plugins: RwLock::new(Vec::new()),
            features: RwLock::new(HashSet::new()),
        }
    }

    /// Register a plugin; duplicates by name are ignored.
    pub fn register_plugin(&self, plugin: Arc<dyn HostPlugin>) {
        let mut plugins = self.plugins.write();
        if plugins.iter().any(|p| p.name() == plugin.name()) {
            return;
        }
        plugins.push(plugin);
    }

    /// Declare a feature tag this node answers for.
    pub fn register_feature(&self, feature_tag: impl Into<String>) {
        self.features.write().insert(feature_tag.into());
    }
}

impl Host for HostNode {
    fn parent(&self) -> Option<Arc<dyn Host>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    fn command_line(&self) -> Vec<String> {
        if !self.command_line.is_empty() {
            return self.command_line.clone();
        }
        match self.parent() {
            Some(p) => p.command_line(),
            None => Vec::new(),
        }
    }

    fn host_plugins(&self, engine: &EngineHandle) -> Vec<Arc<dyn HostPlugin>> {
        let local = self.plugins.read();
        if !local.is_empty() {
            return local.clone();
        }
        drop(local);
        match self.parent() {
            Some(p) => p.host_plugins(engine),
            None => Vec::new(),
        }
    }

    fn supports_feature(&self, feature_tag: &str) -> bool {
        if self.features.read().contains(feature_tag) {
            return true;
        }
        match self.parent() {
            Some(p) => p.supports_feature(feature_tag),
            None => false,
        }
    }
}
