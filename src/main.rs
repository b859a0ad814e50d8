mod app;
mod audio;
mod command;
mod event;
mod sample;
mod sequencer;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use app::App;
use audio::AudioEngine;
use command::CommandBus;
use sequencer::DEFAULT_BPM;

/// Slicebeat - terminal sample slicer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WAV file to slice (a bundled default sample is used when omitted)
    sample: Option<PathBuf>,

    /// Initial tempo in beats per minute
    #[arg(long, default_value_t = DEFAULT_BPM)]
    bpm: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let command_bus = CommandBus::new();
    let audio = AudioEngine::new(command_bus.receiver())?;

    let mut app = App::new(audio, command_bus.sender(), args.bpm, args.sample);
    app.run()
}
