//! Error taxonomy for engine bring-up and the download fallback.
//!
//! Failure kinds are tagged values, not control flow: the controller decides
//! what to do from the variant, never from whether something threw.

use thiserror::Error;

/// Failure modes of engine-side initialization calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineInitError {
    /// Internal or unexpected engine failure. Unrecoverable.
    #[error("internal engine failure: {0}")]
    Fatal(String),

    /// Required expansion assets are not present on-device. Recoverable
    /// through the download fallback.
    #[error("required expansion assets are missing")]
    MissingData,
}

/// Top-level initialization outcome errors surfaced by the controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InitError {
    /// Engine or render-view setup failed internally. The user has been
    /// alerted; process termination follows dismissal.
    #[error("engine setup failed: {0}")]
    FatalEngine(String),

    /// Assets were missing twice in a row even though the download service
    /// reported nothing to download.
    #[error("expansion assets missing after forced retry")]
    MissingDataExhausted,

    /// The download service could not be started or resolved.
    #[error("download service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The download service could not find metadata for this package.
    #[error("package metadata not found: {0}")]
    PackageMetadataNotFound(String),
}

impl InitError {
    /// Whether this error ends the process (after the blocking alert).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::PackageMetadataNotFound(_))
    }
}

/// Absence of a chain capability at every level up to the root.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("capability unavailable")]
    Unavailable,
}
