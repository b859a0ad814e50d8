use crate::sample::SampleAsset;

use super::grid::{StepGrid, SLICERS};
use super::slicer::SliceBank;

/// Clamped start positions stay at least this far from the buffer end
const START_GUARD_SECS: f64 = 0.01;

/// One "play this slice now" request, in seconds into the asset
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trigger {
    pub slicer: usize,
    pub start_secs: f64,
    pub duration_secs: f64,
}

/// Resolve a slicer's (start percent, duration ms) against the asset
/// length. The returned window always satisfies `start >= 0`,
/// `duration >= 0` and `start + duration <= asset_secs`, so playback can
/// never read past the buffer end.
pub fn slice_window(start_percent: f32, duration_ms: f32, asset_secs: f64) -> (f64, f64) {
    let requested_start = (start_percent as f64 / 100.0) * asset_secs;
    let requested_dur = duration_ms as f64 / 1000.0;

    let end = (requested_start + requested_dur).min(asset_secs);
    let start = requested_start
        .min(asset_secs - START_GUARD_SECS)
        .max(0.0);
    let duration = (end - start).max(0.0);
    (start, duration)
}

/// Collect the playback requests for one fired step: every slicer whose
/// row is active at `step`, resolved against the current asset. With no
/// asset loaded the step is silently skipped (the playhead still advances
/// in the clock; there is just nothing to play).
pub fn step_triggers(
    step: usize,
    grid: &StepGrid,
    bank: &SliceBank,
    asset: Option<&SampleAsset>,
) -> Vec<Trigger> {
    let Some(asset) = asset else {
        return Vec::new();
    };
    let asset_secs = asset.duration_seconds();

    let mut triggers = Vec::new();
    for slicer in 0..SLICERS {
        if grid.is_active(StepGrid::slicer_row(slicer), step) {
            let params = bank.get(slicer);
            let (start_secs, duration_secs) =
                slice_window(params.start_percent, params.duration_ms, asset_secs);
            triggers.push(Trigger {
                slicer,
                start_secs,
                duration_secs,
            });
        }
    }
    triggers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_second_asset() -> SampleAsset {
        // 2.0 s of silence at 1 kHz keeps the math easy to follow
        SampleAsset::from_frames(vec![0.0; 2000], 1000.0, "test")
    }

    #[test]
    fn test_window_default_slice_at_origin() {
        // bpm 120, default 30 ms duration, 2.0 s asset, start 0
        let (start, dur) = slice_window(0.0, 30.0, 2.0);
        assert_eq!(start, 0.0);
        assert!((dur - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_window_start_near_end_is_guarded() {
        let (start, dur) = slice_window(99.9, 30.0, 2.0);
        assert!((start - 1.99).abs() < 1e-9);
        assert!(dur >= 0.0);
        assert!(start + dur <= 2.0 + 1e-9);
    }

    #[test]
    fn test_window_duration_clipped_to_asset() {
        // 500 ms requested from 90% into a 2.0 s asset leaves only 200 ms
        let (start, dur) = slice_window(90.0, 500.0, 2.0);
        assert!((start - 1.8).abs() < 1e-9);
        assert!((dur - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_window_never_exceeds_bounds() {
        for start_percent in [0.0f32, 10.0, 50.0, 99.0, 99.9, 100.0] {
            for duration_ms in [1.0f32, 30.0, 250.0, 500.0, 1000.0] {
                for asset_secs in [0.005f64, 0.5, 2.0, 30.0] {
                    let (start, dur) =
                        slice_window(start_percent, duration_ms, asset_secs);
                    assert!(start >= 0.0);
                    assert!(dur >= 0.0);
                    assert!(
                        start + dur <= asset_secs + 1e-9,
                        "window ({start}, {dur}) leaves a {asset_secs}s asset"
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_asset_drops_every_trigger() {
        let mut grid = StepGrid::new();
        grid.toggle(1, 0);
        let bank = SliceBank::new(120.0);
        assert!(step_triggers(0, &grid, &bank, None).is_empty());
    }

    #[test]
    fn test_triggers_follow_active_rows() {
        let asset = two_second_asset();
        let mut grid = StepGrid::new();
        let mut bank = SliceBank::new(120.0);

        // slicers 0 and 3 fire on step 4
        grid.toggle(StepGrid::slicer_row(0), 4);
        grid.toggle(StepGrid::slicer_row(3), 4);
        bank.set_start(3, 50.0);

        let triggers = step_triggers(4, &grid, &bank, Some(&asset));
        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[0].slicer, 0);
        assert_eq!(triggers[0].start_secs, 0.0);
        assert_eq!(triggers[1].slicer, 3);
        assert!((triggers[1].start_secs - 1.0).abs() < 1e-9);

        // Nothing fires on a step with no active rows
        assert!(step_triggers(5, &grid, &bank, Some(&asset)).is_empty());
    }
}
