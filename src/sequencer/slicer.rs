use super::grid::SLICERS;

pub const DEFAULT_DURATION_MS: f32 = 30.0;
pub const MIN_DURATION_MS: f32 = 1.0;
/// Randomize draws both sliders from [0, 85) on their native scale
const RANDOM_SLIDER_MAX: f32 = 85.0;

/// One slicer's window into the loaded sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceParams {
    /// Start position, percent of the sample length (0-100 slider scale)
    pub start_percent: f32,
    /// Slice length in milliseconds, capped by the tempo ceiling
    pub duration_ms: f32,
}

impl Default for SliceParams {
    fn default() -> Self {
        Self {
            start_percent: 0.0,
            duration_ms: DEFAULT_DURATION_MS,
        }
    }
}

/// The five slicer configurations plus the tempo-derived duration ceiling.
///
/// The ceiling is the length of one full cycle at the current tempo; no
/// single slice may outlast it. Lowering the tempo ceiling clamps stored
/// durations down so they are never silently out of range.
pub struct SliceBank {
    slices: [SliceParams; SLICERS],
    duration_ceiling_ms: f32,
}

impl SliceBank {
    pub fn new(bpm: f32) -> Self {
        Self {
            slices: [SliceParams::default(); SLICERS],
            duration_ceiling_ms: Self::max_duration_ms(bpm),
        }
    }

    /// Ceiling for any single slice at this tempo: one cycle, in ms
    pub fn max_duration_ms(bpm: f32) -> f32 {
        (60.0 / bpm) * 1000.0
    }

    pub fn duration_ceiling_ms(&self) -> f32 {
        self.duration_ceiling_ms
    }

    pub fn get(&self, slicer: usize) -> SliceParams {
        self.slices[slicer.min(SLICERS - 1)]
    }

    pub fn slices(&self) -> &[SliceParams; SLICERS] {
        &self.slices
    }

    pub fn set_start(&mut self, slicer: usize, percent: f32) {
        if slicer < SLICERS {
            self.slices[slicer].start_percent = percent.clamp(0.0, 100.0);
        }
    }

    pub fn set_duration(&mut self, slicer: usize, ms: f32) {
        if slicer < SLICERS {
            self.slices[slicer].duration_ms =
                ms.clamp(MIN_DURATION_MS, self.duration_ceiling_ms);
        }
    }

    /// Recompute the ceiling for a new tempo and clamp stored durations
    /// down to it. Start positions are untouched.
    pub fn on_tempo_changed(&mut self, bpm: f32) {
        self.duration_ceiling_ms = Self::max_duration_ms(bpm);
        for slice in &mut self.slices {
            if slice.duration_ms > self.duration_ceiling_ms {
                slice.duration_ms = self.duration_ceiling_ms;
            }
        }
    }

    /// Re-roll every slicer's start and duration, matching the grid's own
    /// randomize density
    pub fn randomize(&mut self, rng: &mut fastrand::Rng) {
        for slice in &mut self.slices {
            slice.start_percent = rng.f32() * RANDOM_SLIDER_MAX;
            slice.duration_ms = (rng.f32() * RANDOM_SLIDER_MAX)
                .clamp(MIN_DURATION_MS, self.duration_ceiling_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_duration_formula() {
        assert_eq!(SliceBank::max_duration_ms(120.0), 500.0);
        assert_eq!(SliceBank::max_duration_ms(60.0), 1000.0);
        for bpm in [1.0f32, 33.3, 90.0, 120.0, 174.0, 300.0] {
            let got = SliceBank::max_duration_ms(bpm);
            assert!((got - (60.0 / bpm) * 1000.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_defaults() {
        let bank = SliceBank::new(120.0);
        for slicer in 0..SLICERS {
            assert_eq!(bank.get(slicer).start_percent, 0.0);
            assert_eq!(bank.get(slicer).duration_ms, DEFAULT_DURATION_MS);
        }
        assert_eq!(bank.duration_ceiling_ms(), 500.0);
    }

    #[test]
    fn test_setters_clamp_at_the_boundary() {
        let mut bank = SliceBank::new(120.0);

        bank.set_start(0, 150.0);
        assert_eq!(bank.get(0).start_percent, 100.0);
        bank.set_start(0, -5.0);
        assert_eq!(bank.get(0).start_percent, 0.0);

        bank.set_duration(0, 0.0);
        assert_eq!(bank.get(0).duration_ms, MIN_DURATION_MS);
        bank.set_duration(0, 10_000.0);
        assert_eq!(bank.get(0).duration_ms, 500.0);

        // Out-of-range slicer index is a no-op
        bank.set_start(SLICERS, 50.0);
        bank.set_duration(SLICERS, 50.0);
    }

    #[test]
    fn test_tempo_change_clamps_durations_down() {
        let mut bank = SliceBank::new(120.0);
        bank.set_start(2, 40.0);
        bank.set_duration(0, 500.0);
        bank.set_duration(1, 100.0);

        // Faster tempo, lower ceiling
        bank.on_tempo_changed(240.0);
        assert_eq!(bank.duration_ceiling_ms(), 250.0);
        assert_eq!(bank.get(0).duration_ms, 250.0);
        assert_eq!(bank.get(1).duration_ms, 100.0);
        // Starts untouched
        assert_eq!(bank.get(2).start_percent, 40.0);

        // Slower tempo raises the ceiling without touching stored values
        bank.on_tempo_changed(60.0);
        assert_eq!(bank.get(0).duration_ms, 250.0);

        for slicer in 0..SLICERS {
            assert!(bank.get(slicer).duration_ms <= bank.duration_ceiling_ms());
        }
    }

    #[test]
    fn test_randomize_stays_on_slider_scale() {
        let mut rng = fastrand::Rng::with_seed(99);
        let mut bank = SliceBank::new(120.0);
        for _ in 0..200 {
            bank.randomize(&mut rng);
            for slicer in 0..SLICERS {
                let p = bank.get(slicer);
                assert!((0.0..85.0).contains(&p.start_percent));
                assert!(p.duration_ms >= MIN_DURATION_MS);
                assert!(p.duration_ms < 85.0);
            }
        }
    }
}
