use crate::sample::SampleAsset;

/// One fire-and-forget playback of a slice window.
///
/// Voices are additive: a new trigger never cuts a still-sounding voice
/// on the same track. The engine keeps them in an unbounded Vec and prunes
/// inactive ones on its snapshot-sync cadence; nothing ever cancels a
/// voice from outside.
#[derive(Clone, Debug)]
pub struct Voice {
    /// Fractional frame position into the asset
    pos: f64,
    /// One past the last frame of the slice window
    end: f64,
    active: bool,
}

impl Voice {
    pub fn from_window(start_secs: f64, duration_secs: f64, sample_rate: f32) -> Self {
        let pos = start_secs * sample_rate as f64;
        Self {
            pos,
            end: pos + duration_secs * sample_rate as f64,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Linear-interpolated read at the current position, then advance one
    /// output frame. Returns 0.0 once the window or the buffer runs out.
    pub fn next_sample(&mut self, asset: &SampleAsset) -> f32 {
        if !self.active {
            return 0.0;
        }
        if self.pos >= self.end || self.pos >= asset.frame_count() as f64 {
            self.active = false;
            return 0.0;
        }

        let idx = self.pos as usize;
        let frac = (self.pos - idx as f64) as f32;
        let s0 = asset.sample_at(idx);
        let s1 = if idx + 1 < asset.frame_count() {
            asset.sample_at(idx + 1)
        } else {
            s0
        };

        self.pos += 1.0;
        s0 + (s1 - s0) * frac
    }
}
