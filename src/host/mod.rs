//! Host delegation chain.

mod chain;

pub use chain::{Host, HostNode, HostPlugin, SignRequest};
