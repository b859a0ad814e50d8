use std::sync::Arc;

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use parking_lot::RwLock;

use crate::command::{Command, CommandReceiver};
use crate::sample::SampleAsset;
use crate::sequencer::{step_triggers, Clock, SliceBank, SliceParams, StepGrid, DEFAULT_BPM, SLICERS};

use super::voice::Voice;

/// Snapshot of sequencer state shared with the UI thread
#[derive(Clone)]
pub struct SharedState {
    pub playing: bool,
    pub bpm: f32,
    pub current_step: usize,
    pub grid: StepGrid,
    pub slices: [SliceParams; SLICERS],
    pub duration_ceiling_ms: f32,
    pub sample_name: Option<String>,
    pub sample_secs: f64,
    pub peaks: Vec<(f32, f32)>,
    pub voice_count: usize,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            playing: false,
            bpm: DEFAULT_BPM,
            current_step: 0,
            grid: StepGrid::new(),
            slices: [SliceParams::default(); SLICERS],
            duration_ceiling_ms: SliceBank::max_duration_ms(DEFAULT_BPM),
            sample_name: None,
            sample_secs: 0.0,
            peaks: Vec::new(),
            voice_count: 0,
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

/// Audio engine managing the output stream and the sequencer.
///
/// The cpal callback is the single logical thread of control for all
/// sequencer state: it drains the command bus at the top of each buffer,
/// so user mutations interleave with clock ticks only at those
/// boundaries.
pub struct AudioEngine {
    _stream: Stream,
    pub state: Arc<RwLock<SharedState>>,
    sample_rate: f32,
}

impl AudioEngine {
    /// Initialize the audio engine with the default output device
    pub fn new(command_rx: CommandReceiver) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("No output device available")?;

        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0 as f32;
        let state = Arc::new(RwLock::new(SharedState::new()));

        let stream = match config.sample_format() {
            SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config.into(), command_rx, state.clone())?
            }
            SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config.into(), command_rx, state.clone())?
            }
            SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config.into(), command_rx, state.clone())?
            }
            format => anyhow::bail!("Unsupported sample format: {:?}", format),
        };

        stream.play()?;

        Ok(Self {
            _stream: stream,
            state,
            sample_rate,
        })
    }

    /// Rate of the output stream; sample decode targets this
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        command_rx: CommandReceiver,
        state: Arc<RwLock<SharedState>>,
    ) -> Result<Stream>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        // Authoritative sequencer state, owned by the audio thread
        let mut clock = Clock::new(sample_rate, DEFAULT_BPM);
        let mut grid = StepGrid::new();
        let mut bank = SliceBank::new(DEFAULT_BPM);
        let mut asset: Option<SampleAsset> = None;
        let mut voices: Vec<Voice> = Vec::new();
        let mut rng = fastrand::Rng::new();

        // For periodic state sync
        let mut sync_counter = 0usize;
        let sync_interval = (sample_rate / 60.0) as usize; // ~60 times per second

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Process commands from the command bus
                while let Some(cmd) = command_rx.try_recv() {
                    match cmd {
                        Command::TogglePlay => {
                            if clock.is_playing() {
                                clock.stop();
                            } else {
                                clock.start();
                            }
                            if let Some(mut state) = state.try_write() {
                                state.playing = clock.is_playing();
                                state.current_step = clock.current_step();
                            }
                        }
                        Command::SetBpm(bpm) => {
                            clock.set_bpm(bpm);
                            bank.on_tempo_changed(clock.bpm());
                            if let Some(mut state) = state.try_write() {
                                state.bpm = clock.bpm();
                                state.current_step = clock.current_step();
                                state.slices = *bank.slices();
                                state.duration_ceiling_ms = bank.duration_ceiling_ms();
                            }
                        }
                        Command::ToggleStep { row, step } => {
                            grid.toggle(row, step);
                            if let Some(mut state) = state.try_write() {
                                state.grid = grid.clone();
                            }
                        }
                        Command::ClearPattern => {
                            grid.clear();
                            if let Some(mut state) = state.try_write() {
                                state.grid = grid.clone();
                            }
                        }
                        Command::Randomize => {
                            grid.randomize(&mut rng);
                            bank.randomize(&mut rng);
                            if let Some(mut state) = state.try_write() {
                                state.grid = grid.clone();
                                state.slices = *bank.slices();
                            }
                        }
                        Command::SetSliceStart { slicer, percent } => {
                            bank.set_start(slicer, percent);
                            if let Some(mut state) = state.try_write() {
                                state.slices = *bank.slices();
                            }
                        }
                        Command::SetSliceDuration { slicer, ms } => {
                            bank.set_duration(slicer, ms);
                            if let Some(mut state) = state.try_write() {
                                state.slices = *bank.slices();
                            }
                        }
                        Command::LoadSample(new_asset) => {
                            // Old voices index into the old buffer; drop them
                            // along with it
                            voices.clear();
                            if let Some(mut state) = state.try_write() {
                                state.sample_name = Some(new_asset.name().to_string());
                                state.sample_secs = new_asset.duration_seconds();
                                state.peaks = new_asset.peaks().to_vec();
                            }
                            asset = Some(*new_asset);
                        }
                    }
                }

                // Generate audio
                for frame in data.chunks_mut(channels) {
                    if let Some(step) = clock.tick() {
                        // With no asset this yields nothing; the playhead
                        // still advances
                        for trigger in step_triggers(step, &grid, &bank, asset.as_ref()) {
                            voices.push(Voice::from_window(
                                trigger.start_secs,
                                trigger.duration_secs,
                                sample_rate,
                            ));
                        }
                    }

                    let mut mixed = 0.0f32;
                    if let Some(asset) = asset.as_ref() {
                        for voice in voices.iter_mut() {
                            mixed += voice.next_sample(asset);
                        }
                    }
                    let out = soft_clip(mixed * 0.8);

                    // Mono program on every output channel
                    for channel_sample in frame.iter_mut() {
                        *channel_sample = T::from_sample(out);
                    }

                    // Periodic sync (playhead for the UI) and voice pruning
                    sync_counter += 1;
                    if sync_counter >= sync_interval {
                        sync_counter = 0;
                        voices.retain(|v| v.is_active());
                        if let Some(mut state) = state.try_write() {
                            state.current_step = clock.current_step();
                            state.playing = clock.is_playing();
                            state.voice_count = voices.len();
                        }
                    }
                }
            },
            |err| {
                eprintln!("Audio stream error: {}", err);
            },
            None,
        )?;

        Ok(stream)
    }
}

/// Soft clipping to keep stacked voices from hard-clipping the output
fn soft_clip(x: f32) -> f32 {
    if x > 1.0 {
        1.0 - (-x + 1.0).exp() * 0.5
    } else if x < -1.0 {
        -1.0 + (x + 1.0).exp() * 0.5
    } else {
        x
    }
}
