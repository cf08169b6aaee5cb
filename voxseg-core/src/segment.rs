//! Speech segments and the frame-mask → interval conversion.
//!
//! Raw mask runs become `[start, end)` intervals in seconds, then get cleaned
//! up in one fixed-order pass: pad, drop short, merge close. The cleaned list
//! is what callers see — sorted, non-overlapping, with every surviving gap
//! strictly wider than the merge gap.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DetectorConfig;

/// One detected speech interval, in seconds from the start of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    /// Length of this segment in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }
}

/// Convert a smoothed frame mask into the final cleaned segment list.
///
/// `total_samples` is the length of the analyzed buffer; a mask run still
/// open at the last frame closes at the buffer end rather than at the frame
/// boundary.
pub fn build_segments(
    mask: &[bool],
    frame_len: usize,
    hop: usize,
    total_samples: usize,
    sample_rate: u32,
    config: &DetectorConfig,
) -> Vec<Segment> {
    let rate = sample_rate as f64;
    let total_secs = total_samples as f64 / rate;
    let raw = raw_segments(mask, frame_len, hop, total_secs, rate);
    let cleaned = clean_segments(&raw, total_secs, config);
    debug!(
        raw = raw.len(),
        kept = cleaned.len(),
        "segments built"
    );
    cleaned
}

fn raw_segments(
    mask: &[bool],
    frame_len: usize,
    hop: usize,
    total_secs: f64,
    rate: f64,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut run_start: Option<usize> = None;

    for (k, &marked) in mask.iter().enumerate() {
        match (marked, run_start) {
            (true, None) => run_start = Some(k),
            (false, Some(a)) => {
                segments.push(Segment {
                    start: a as f64 * hop as f64 / rate,
                    end: ((k - 1) * hop + frame_len) as f64 / rate,
                });
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(a) = run_start {
        // Run still open at end-of-signal: close at the buffer end.
        segments.push(Segment {
            start: a as f64 * hop as f64 / rate,
            end: total_secs,
        });
    }
    segments
}

/// Pad, drop short, merge close — in that order, one pass.
fn clean_segments(raw: &[Segment], total_secs: f64, config: &DetectorConfig) -> Vec<Segment> {
    let mut kept: Vec<Segment> = Vec::new();
    for seg in raw {
        let start = (seg.start - config.pad_secs).max(0.0);
        let end = (seg.end + config.pad_secs).min(total_secs);
        if end - start < config.min_duration_secs {
            continue;
        }
        match kept.last_mut() {
            Some(prev) if start - prev.end <= config.merge_gap_secs => {
                prev.end = prev.end.max(end);
            }
            _ => kept.push(Segment { start, end }),
        }
    }
    kept
}
