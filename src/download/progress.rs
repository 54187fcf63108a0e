//! Overall transfer progress as reported by the download service.
//!
//! Session counters are kept at full 64-bit precision. Presentation layers
//! with 32-bit progress widgets get a separately scaled view; the lossy part
//! never leaks back into session state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One progress notification: cumulative bytes over the whole job plus the
/// service's speed and remaining-time estimates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressReport {
    pub downloaded_bytes: u64,
    pub total_bytes: u64,
    /// Instantaneous transfer speed, bytes per second.
    pub speed_bps: f64,
    /// Service's estimate of remaining transfer time.
    pub eta: Duration,
}

impl ProgressReport {
    /// Whole percentage, `floor(downloaded * 100 / total)`.
    ///
    /// A zero total reports 0%, never a division by zero. Computed in
    /// 128-bit so multi-exabyte totals cannot overflow.
    pub fn percent(&self) -> u8 {
        if self.total_bytes == 0 {
            return 0;
        }
        let pct = (self.downloaded_bytes as u128 * 100) / self.total_bytes as u128;
        pct.min(100) as u8
    }
}

/// Progress view for presentation widgets limited to 32-bit counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledProgress {
    pub progress: u32,
    pub max: u32,
    /// Right-shift that was applied to both counters.
    pub shift: u32,
}

impl ScaledProgress {
    /// Scale a report down with the minimal right-shift that fits the total
    /// in `u32`. Totals already in range pass through losslessly.
    pub fn from_report(report: &ProgressReport) -> Self {
        let shift = (64 - report.total_bytes.leading_zeros()).saturating_sub(32);
        Self {
            progress: (report.downloaded_bytes >> shift) as u32,
            max: (report.total_bytes >> shift) as u32,
            shift,
        }
    }
}
