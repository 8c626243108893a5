//! Headless frame driving and run reports.
//!
//! Frames are stamped on a logical clock so a run is reproducible: frame `n`
//! of a budget is stamped `start_ms + (n + 1) * tick_ms`.

use std::io::Write;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::config::RuntimeConfig;
use crate::views::Viewport;

/// A fixed run of frames on the logical clock
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameBudget {
    pub viewport: Viewport,
    pub frames: u32,
    pub tick_ms: u64,
}

impl Default for FrameBudget {
    fn default() -> Self {
        Self::from(&RuntimeConfig::default())
    }
}

impl From<&RuntimeConfig> for FrameBudget {
    fn from(runtime: &RuntimeConfig) -> Self {
        Self {
            viewport: Viewport::new(runtime.width, runtime.height),
            frames: 1,
            tick_ms: u64::from(runtime.tick_ms),
        }
    }
}

impl FrameBudget {
    pub fn with_frames(self, frames: u32) -> Self {
        Self { frames, ..self }
    }
}

/// Position of one frame inside a budget
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStamp {
    pub index: u32,
    pub now_ms: u64,
}

/// Call `on_frame` once per budgeted frame, starting after `start_ms`.
///
/// Returns the clock reading after the last frame.
pub fn drive_frames<F>(budget: FrameBudget, start_ms: u64, mut on_frame: F) -> Result<u64>
where
    F: FnMut(FrameStamp) -> Result<()>,
{
    let Viewport { width, height } = budget.viewport;
    ensure!(width > 0.0 && height > 0.0, "viewport {width}x{height} is empty");
    ensure!(budget.frames > 0, "frame budget is empty");
    ensure!(budget.tick_ms > 0, "tick must advance the clock");

    let mut now_ms = start_ms;
    for index in 0..budget.frames {
        now_ms = now_ms.saturating_add(budget.tick_ms);
        on_frame(FrameStamp { index, now_ms })?;
    }
    Ok(now_ms)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// The step that stopped a run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    pub index: usize,
    /// Step name as written in the scenario
    pub step: String,
    pub message: String,
}

/// Result of a scenario run, written as JSON for CI
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
    pub frames: u64,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn passed(frames: u64, elapsed_ms: u64) -> Self {
        Self {
            status: ReportStatus::Passed,
            failure: None,
            frames,
            elapsed_ms,
        }
    }

    pub fn failed(failure: StepFailure, frames: u64, elapsed_ms: u64) -> Self {
        Self {
            status: ReportStatus::Failed,
            failure: Some(failure),
            frames,
            elapsed_ms,
        }
    }

    /// Index of the failing step, if any
    pub fn failed_step(&self) -> Option<usize> {
        self.failure.as_ref().map(|failure| failure.index)
    }

    pub fn write_json<W: Write>(&self, mut out: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_are_stamped_after_start() {
        let mut stamps = Vec::new();
        let end = drive_frames(FrameBudget::default().with_frames(3), 100, |stamp| {
            stamps.push(stamp.now_ms);
            Ok(())
        })
        .unwrap();
        assert_eq!(stamps, vec![116, 132, 148]);
        assert_eq!(end, 148);
    }

    #[test]
    fn test_empty_budget_is_rejected() {
        assert!(drive_frames(FrameBudget::default().with_frames(0), 0, |_| Ok(())).is_err());

        let stalled = FrameBudget {
            tick_ms: 0,
            ..FrameBudget::default()
        };
        assert!(drive_frames(stalled, 0, |_| Ok(())).is_err());
    }

    #[test]
    fn test_frame_error_stops_the_run() {
        let mut seen = 0;
        let result = drive_frames(FrameBudget::default().with_frames(5), 0, |stamp| {
            seen += 1;
            anyhow::ensure!(stamp.index < 2, "frame {} failed", stamp.index);
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_report_json_shape() {
        let failure = StepFailure {
            index: 2,
            step: "assert_route".to_string(),
            message: "expected /gallery".to_string(),
        };
        let mut out = Vec::new();
        RunReport::failed(failure, 10, 160).write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["failure"]["index"], 2);

        let mut out = Vec::new();
        RunReport::passed(3, 48).write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value.get("failure").is_none());
    }
}
