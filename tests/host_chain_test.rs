//! Tests for host-chain delegation.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ember_host::engine::{Engine, EngineHandle, RenderSurface};
use ember_host::error::{CapabilityError, EngineInitError};
use ember_host::host::{Host, HostNode};

struct NullEngine;

impl Engine for NullEngine {
    fn create(&self, _host: Arc<dyn Host>) {}
    fn init_native_layer(&self, _host: Arc<dyn Host>) -> Result<(), EngineInitError> {
        Ok(())
    }
    fn init_render_view(&self, _host: Arc<dyn Host>) -> Result<RenderSurface, EngineInitError> {
        Ok(RenderSurface::new(1))
    }
    fn destroy(&self) {}
    fn is_initialized(&self) -> bool {
        true
    }
    fn pause(&self) {}
    fn resume(&self) {}
    fn start(&self) {}
    fn stop(&self) {}
    fn on_configuration_changed(&self) {}
    fn on_activity_result(&self, _request: i32, _result: i32, _data: Option<String>) {}
    fn on_permissions_result(&self, _request: i32, _permissions: &[String], _granted: &[bool]) {}
    fn on_back_pressed(&self) {}
    fn alert(&self, _message: &str, _title: &str, _on_dismiss: Box<dyn FnOnce() + Send>) {}
}

/// Root that optionally answers `supports_feature("x")` and may own an engine.
struct Root {
    feature_x: bool,
    engine: Option<EngineHandle>,
    restart_requested: AtomicBool,
}

impl Host for Root {
    fn engine(&self) -> Option<EngineHandle> {
        self.engine.clone()
    }

    fn supports_feature(&self, feature_tag: &str) -> bool {
        self.feature_x && feature_tag == "x"
    }

    fn on_restart_requested(&self) {
        self.restart_requested.store(true, Ordering::SeqCst);
    }
}

/// Pure forwarding node.
struct Mid {
    parent: Arc<dyn Host>,
}

impl Host for Mid {
    fn parent(&self) -> Option<Arc<dyn Host>> {
        Some(self.parent.clone())
    }
}

struct Leaf {
    parent: Arc<dyn Host>,
}

impl Host for Leaf {
    fn parent(&self) -> Option<Arc<dyn Host>> {
        Some(self.parent.clone())
    }
}

fn three_level_chain(feature_x: bool, engine: Option<EngineHandle>) -> (Arc<Root>, Leaf) {
    let root = Arc::new(Root {
        feature_x,
        engine,
        restart_requested: AtomicBool::new(false),
    });
    let mid: Arc<dyn Host> = Arc::new(Mid { parent: root.clone() });
    let leaf = Leaf { parent: mid };
    (root, leaf)
}

#[test]
fn feature_override_at_root_is_visible_from_leaf() {
    let (_root, leaf) = three_level_chain(true, None);
    assert!(leaf.supports_feature("x"));
    assert!(!leaf.supports_feature("y"));
}

#[test]
fn without_root_override_default_applies_at_every_level() {
    let (root, leaf) = three_level_chain(false, None);
    assert!(!root.supports_feature("x"));
    assert!(!leaf.supports_feature("x"));
}

#[test]
fn same_engine_handle_observed_at_every_level() {
    let handle = EngineHandle::new(Arc::new(NullEngine));
    let (root, leaf) = three_level_chain(false, Some(handle.clone()));

    let from_root = root.engine().unwrap();
    let from_leaf = leaf.engine().unwrap();
    assert!(from_root.same_instance(&handle));
    assert!(from_leaf.same_instance(&handle));
}

#[test]
fn chain_without_engine_yields_none_everywhere() {
    let (root, leaf) = three_level_chain(false, None);
    assert!(root.engine().is_none());
    assert!(leaf.engine().is_none());
}

#[test]
fn notifications_propagate_to_root() {
    let (root, leaf) = three_level_chain(false, None);
    leaf.on_restart_requested();
    assert!(root.restart_requested.load(Ordering::SeqCst));
}

#[test]
fn capability_absence_is_a_default_not_an_error() {
    let (_root, leaf) = three_level_chain(false, None);
    assert_eq!(
        leaf.verify_package(Path::new("/pkg.apk")),
        Err(CapabilityError::Unavailable)
    );
    assert_eq!(leaf.on_new_instance_requested(&["--second".into()]), 0);
    assert!(!leaf.on_force_quit(Some(3)));
    assert!(leaf.command_line().is_empty());
}

#[test]
fn host_node_answers_locally_then_forwards() {
    let root: Arc<dyn Host> = Arc::new({
        let node = HostNode::root(vec!["--from-root".into()]);
        node.register_feature("root-only");
        node
    });
    let leaf = HostNode::chained(&root, Vec::new());
    leaf.register_feature("leaf-only");

    assert!(leaf.supports_feature("leaf-only"));
    assert!(leaf.supports_feature("root-only"));
    assert!(!leaf.supports_feature("nowhere"));
    assert_eq!(leaf.command_line(), vec!["--from-root".to_string()]);
}
