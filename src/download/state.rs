//! Download-service state codes and their UI projections.

use serde::{Deserialize, Serialize};

/// States the download service reports, with its wire-level integer codes.
///
/// The coordinator never invents a transition; it only mirrors the latest
/// code received from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DownloadState {
    Idle,
    Connecting,
    FetchingUrl,
    Downloading,
    Completed,
    PausedByRequest,
    PausedWifiDisabledNeedPermission,
    PausedNeedPermission,
    PausedRoaming,
    PausedStorageUnavailable,
    FailedUnlicensed,
    FailedFetchingUrl,
    FailedCanceled,
    Failed,
}

impl DownloadState {
    /// Map a service state code. Unknown codes return `None`; the caller
    /// keeps its previous state and shows the fallback projection.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            1 => Self::Idle,
            2 => Self::Connecting,
            3 => Self::FetchingUrl,
            4 => Self::Downloading,
            5 => Self::Completed,
            7 => Self::PausedByRequest,
            8 => Self::PausedWifiDisabledNeedPermission,
            9 => Self::PausedNeedPermission,
            12 => Self::PausedRoaming,
            14 => Self::PausedStorageUnavailable,
            15 => Self::FailedUnlicensed,
            16 => Self::FailedFetchingUrl,
            18 => Self::FailedCanceled,
            19 => Self::Failed,
            _ => return None,
        })
    }

    /// The service's wire code for this state.
    pub fn code(&self) -> i32 {
        match self {
            Self::Idle => 1,
            Self::Connecting => 2,
            Self::FetchingUrl => 3,
            Self::Downloading => 4,
            Self::Completed => 5,
            Self::PausedByRequest => 7,
            Self::PausedWifiDisabledNeedPermission => 8,
            Self::PausedNeedPermission => 9,
            Self::PausedRoaming => 12,
            Self::PausedStorageUnavailable => 14,
            Self::FailedUnlicensed => 15,
            Self::FailedFetchingUrl => 16,
            Self::FailedCanceled => 18,
            Self::Failed => 19,
        }
    }

    /// Terminal failure family. The session stays put and nothing retries
    /// automatically; the user must resume or the host restarts.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Failed | Self::FailedCanceled | Self::FailedFetchingUrl | Self::FailedUnlicensed
        )
    }
}

/// What the presentation layer shows for the current download state.
///
/// A pure function of the latest state only — no history involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiProjection {
    /// Progress dashboard visible.
    pub show_dashboard: bool,
    /// Transfer not currently advancing (paused or failed).
    pub paused: bool,
    /// Progress amount unknown (spinner instead of a bar).
    pub indeterminate: bool,
    /// Ask the user to approve downloading over cellular data.
    pub show_cellular_prompt: bool,
}

impl UiProjection {
    /// Projection for a known service state.
    pub fn for_state(state: DownloadState) -> Self {
        use DownloadState::*;
        match state {
            Idle | Connecting | FetchingUrl => Self {
                show_dashboard: true,
                paused: false,
                indeterminate: true,
                show_cellular_prompt: false,
            },
            Downloading => Self {
                show_dashboard: true,
                paused: false,
                indeterminate: false,
                show_cellular_prompt: false,
            },
            PausedNeedPermission | PausedWifiDisabledNeedPermission => Self {
                show_dashboard: false,
                paused: true,
                indeterminate: false,
                show_cellular_prompt: true,
            },
            PausedByRequest | PausedRoaming | PausedStorageUnavailable => Self {
                show_dashboard: true,
                paused: true,
                indeterminate: false,
                show_cellular_prompt: false,
            },
            Failed | FailedCanceled | FailedFetchingUrl | FailedUnlicensed => Self {
                show_dashboard: false,
                paused: true,
                indeterminate: false,
                show_cellular_prompt: false,
            },
            Completed => Self {
                show_dashboard: false,
                paused: false,
                indeterminate: false,
                show_cellular_prompt: false,
            },
        }
    }

    /// Fallback for state codes this build does not know.
    pub fn unknown() -> Self {
        Self {
            show_dashboard: true,
            paused: true,
            indeterminate: true,
            show_cellular_prompt: false,
        }
    }
}
