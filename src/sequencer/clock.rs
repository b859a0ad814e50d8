use super::grid::STEPS;

pub const DEFAULT_BPM: f32 = 120.0;
pub const MIN_BPM: f32 = 1.0;
pub const MAX_BPM: f32 = 300.0;

/// Transport clock - generates step ticks on the audio thread.
///
/// One step is a quarter of a beat, so the 16-step cycle spans 4 beats.
/// The recurring "timer" is a sample counter advanced once per output
/// frame; re-priming it in start() doubles as the idempotency guard, so a
/// second concurrent tick stream is impossible.
pub struct Clock {
    bpm: f32,
    sample_rate: f32,
    samples_per_step: f32,
    sample_counter: f32,
    current_step: usize,
    playing: bool,
}

impl Clock {
    pub fn new(sample_rate: f32, bpm: f32) -> Self {
        let mut clock = Self {
            bpm: DEFAULT_BPM,
            sample_rate,
            samples_per_step: 0.0,
            sample_counter: 0.0,
            current_step: 0,
            playing: false,
        };
        clock.set_bpm(bpm);
        clock
    }

    fn recalculate_timing(&mut self) {
        // step interval = (60/bpm)*1000/4 ms, expressed in frames
        let samples_per_beat = self.sample_rate * 60.0 / self.bpm;
        self.samples_per_step = samples_per_beat / 4.0;
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Change tempo. While playing this is a full restart at the new
    /// interval (step back to 0), not a live reschedule.
    pub fn set_bpm(&mut self, bpm: f32) {
        self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
        self.recalculate_timing();
        if self.playing {
            self.restart();
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn samples_per_step(&self) -> f32 {
        self.samples_per_step
    }

    fn restart(&mut self) {
        self.current_step = 0;
        // Primed so the next tick fires step 0 immediately
        self.sample_counter = self.samples_per_step;
    }

    pub fn start(&mut self) {
        self.playing = true;
        self.restart();
    }

    /// Stop ticking. current_step keeps its last value; only start()
    /// resets it.
    pub fn stop(&mut self) {
        self.playing = false;
        self.sample_counter = 0.0;
    }

    /// Called once per output frame. Returns Some(step) when a step fires,
    /// then advances the cursor.
    pub fn tick(&mut self) -> Option<usize> {
        if !self.playing {
            return None;
        }

        self.sample_counter += 1.0;
        if self.sample_counter >= self.samples_per_step {
            self.sample_counter -= self.samples_per_step;
            let step = self.current_step;
            self.current_step = (self.current_step + 1) % STEPS;
            return Some(step);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    /// Run the clock for `frames` frames, collecting fired steps
    fn run(clock: &mut Clock, frames: usize) -> Vec<usize> {
        (0..frames).filter_map(|_| clock.tick()).collect()
    }

    #[test]
    fn test_step_interval_from_bpm() {
        let clock = Clock::new(SR, 120.0);
        // (60/120)/4 seconds per step
        assert_eq!(clock.samples_per_step(), SR * 60.0 / 120.0 / 4.0);
        assert_eq!(clock.samples_per_step(), 6000.0);
    }

    #[test]
    fn test_start_fires_step_zero_first() {
        let mut clock = Clock::new(SR, 120.0);
        clock.start();
        assert_eq!(clock.current_step(), 0);
        assert_eq!(clock.tick(), Some(0));
    }

    #[test]
    fn test_steps_advance_and_wrap() {
        let mut clock = Clock::new(SR, 120.0);
        clock.start();
        // 17 step intervals: 0..=15 then wrap back to 0
        let fired = run(&mut clock, 6000 * 16 + 1);
        assert_eq!(fired.len(), 17);
        assert_eq!(fired[0], 0);
        assert_eq!(fired[15], 15);
        assert_eq!(fired[16], 0);
    }

    #[test]
    fn test_stop_keeps_cursor_start_resets_it() {
        let mut clock = Clock::new(SR, 120.0);
        clock.start();
        run(&mut clock, 6000 * 5);
        let parked = clock.current_step();
        assert_ne!(parked, 0);

        clock.stop();
        assert!(!clock.is_playing());
        assert_eq!(clock.current_step(), parked);
        assert_eq!(clock.tick(), None);

        clock.start();
        assert_eq!(clock.current_step(), 0);
        assert_eq!(clock.tick(), Some(0));
    }

    #[test]
    fn test_set_bpm_while_playing_restarts() {
        let mut clock = Clock::new(SR, 120.0);
        clock.start();
        run(&mut clock, 6000 * 7);
        assert_ne!(clock.current_step(), 0);

        clock.set_bpm(240.0);
        assert_eq!(clock.current_step(), 0);
        assert_eq!(clock.samples_per_step(), 3000.0);
        // Restart fires step 0 immediately, then ticks at the new interval
        let fired = run(&mut clock, 3000 + 1);
        assert_eq!(fired, vec![0, 1]);
    }

    #[test]
    fn test_set_bpm_while_stopped_keeps_cursor() {
        let mut clock = Clock::new(SR, 120.0);
        clock.start();
        run(&mut clock, 6000 * 3);
        clock.stop();
        let parked = clock.current_step();

        clock.set_bpm(90.0);
        assert_eq!(clock.current_step(), parked);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_bpm_is_clamped() {
        let mut clock = Clock::new(SR, 120.0);
        clock.set_bpm(0.0);
        assert_eq!(clock.bpm(), MIN_BPM);
        clock.set_bpm(-10.0);
        assert_eq!(clock.bpm(), MIN_BPM);
        clock.set_bpm(1e6);
        assert_eq!(clock.bpm(), MAX_BPM);
    }

    #[test]
    fn test_second_start_reuses_the_tick_stream() {
        let mut clock = Clock::new(SR, 120.0);
        clock.start();
        run(&mut clock, 6000 * 2 + 100);
        // A second start while playing just re-primes the counter
        clock.start();
        let fired = run(&mut clock, 6000 + 1);
        assert_eq!(fired, vec![0, 1]);
    }
}
