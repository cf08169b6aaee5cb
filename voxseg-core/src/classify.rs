//! Frame classification: adaptive energy threshold, 2-of-3 majority vote,
//! and debounce/hangover smoothing.
//!
//! The energy gate adapts to each recording's noise floor (a percentile of
//! the frame energies plus a margin) while an absolute floor keeps silent
//! recordings from gating on numerical noise. The vote is then smoothed by a
//! small state machine: `start_frames` consecutive votes open a speech run
//! (marked retroactively, so onsets are not delayed), and `hangover_frames`
//! silent frames are absorbed before the run closes.

use tracing::debug;

use crate::config::DetectorConfig;
use crate::features::FrameFeatures;

/// Adaptive energy threshold in dB over the given frame energies.
///
/// `percentile` selects the noise-floor estimate (index
/// `floor(percentile × (n−1))` of the sorted energies), `margin_db` is added
/// on top, and the result never drops below `floor_db`. Returns `floor_db`
/// for an empty input.
pub fn adaptive_threshold(
    log_energy_db: &[f64],
    percentile: f64,
    margin_db: f64,
    floor_db: f64,
) -> f64 {
    if log_energy_db.is_empty() {
        return floor_db;
    }
    let mut sorted = log_energy_db.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let idx = ((percentile * (sorted.len() - 1) as f64).floor() as usize).min(sorted.len() - 1);
    (sorted[idx] + margin_db).max(floor_db)
}

/// Classify all frames, returning the smoothed speech mask.
pub fn frame_mask(features: &FrameFeatures, config: &DetectorConfig) -> Vec<bool> {
    let threshold_db = adaptive_threshold(
        &features.log_energy_db,
        config.energy_percentile,
        config.energy_margin_db,
        config.energy_floor_db,
    );

    let raw: Vec<bool> = (0..features.len())
        .map(|k| {
            let mut votes = 0;
            if features.log_energy_db[k] > threshold_db {
                votes += 1;
            }
            if features.zcr[k] >= config.zcr_min && features.zcr[k] <= config.zcr_max {
                votes += 1;
            }
            if features.flatness[k] < config.flatness_max {
                votes += 1;
            }
            votes >= 2
        })
        .collect();

    debug!(
        threshold_db,
        frames = raw.len(),
        raw_speech = raw.iter().filter(|&&v| v).count(),
        "frames classified"
    );

    smooth_votes(&raw, config.start_frames, config.hangover_frames)
}

/// Debounce/hangover smoothing of the raw vote sequence.
///
/// Single forward pass. Entering speech requires `start_frames` consecutive
/// votes and marks that whole run; leaving speech happens only after
/// `hangover_frames` unvoted frames, all of which stay marked. On an unvoted
/// frame the hangover budget is decremented before the mark check, so exactly
/// `hangover_frames` trailing frames survive — this boundary is pinned by the
/// tests below.
pub fn smooth_votes(raw: &[bool], start_frames: usize, hangover_frames: usize) -> Vec<bool> {
    let start_need = start_frames.max(1);
    let mut mask = vec![false; raw.len()];
    let mut active = false;
    let mut run = 0usize;
    let mut hang_left = 0i64;

    for (k, &vote) in raw.iter().enumerate() {
        if !active {
            if vote {
                run += 1;
                if run >= start_need {
                    for m in &mut mask[k + 1 - start_need..=k] {
                        *m = true;
                    }
                    active = true;
                    hang_left = hangover_frames as i64;
                    run = 0;
                }
            } else {
                run = 0;
            }
        } else if vote {
            hang_left = hangover_frames as i64;
            mask[k] = true;
        } else {
            hang_left -= 1;
            if hang_left >= 0 {
                mask[k] = true;
            } else {
                active = false;
            }
        }
    }
    mask
}
