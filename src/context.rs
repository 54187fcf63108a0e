//! Launch state passed down the host chain.
//!
//! The root host captures the intent it was launched with and hands it to
//! every descendant at construction time. There is no process-wide mutable
//! "current intent"; whoever needs the launch state receives it explicitly.

/// The intent a host process was launched with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchIntent {
    /// Component the process was asked to start (e.g. an activity class).
    pub component: String,
    /// Raw arguments attached to the launch.
    pub args: Vec<String>,
}

impl LaunchIntent {
    pub fn new(component: impl Into<String>, args: Vec<String>) -> Self {
        Self { component: component.into(), args }
    }
}

/// Relaunch intent handed to the download service so the process can be
/// brought back once the expansion assets land out-of-band.
///
/// Lives only as long as the process; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeToken {
    component: String,
    args: Vec<String>,
}

impl ResumeToken {
    /// Capture a relaunch token for the given launch intent.
    pub fn for_relaunch(intent: &LaunchIntent) -> Self {
        Self {
            component: intent.component.clone(),
            args: intent.args.clone(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Everything a controller needs to bring an engine up on behalf of a host.
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    /// Launch intent owned by the root host.
    pub intent: LaunchIntent,
    /// Extra command-line arguments for the engine, beyond what the chain
    /// supplies through `Host::command_line`.
    pub extra_args: Vec<String>,
}

impl HostContext {
    pub fn new(intent: LaunchIntent) -> Self {
        Self { intent, extra_args: Vec::new() }
    }

    /// Token the download service uses to relaunch this host.
    pub fn resume_token(&self) -> ResumeToken {
        ResumeToken::for_relaunch(&self.intent)
    }
}
