use crate::sample::SampleAsset;

/// Commands dispatched from the TUI to the audio thread
#[derive(Debug, Clone)]
pub enum Command {
    // Transport
    TogglePlay,
    SetBpm(f32),

    // Pattern
    ToggleStep { row: usize, step: usize },
    ClearPattern,
    /// Re-rolls the whole grid and every slicer's start/duration
    Randomize,

    // Slicers
    SetSliceStart { slicer: usize, percent: f32 },
    SetSliceDuration { slicer: usize, ms: f32 },

    // Sample loading (decoded on the UI thread, swapped in by the engine)
    LoadSample(Box<SampleAsset>),
}

impl Command {
    /// Human-readable description for the status footer
    pub fn description(&self) -> String {
        match self {
            Command::TogglePlay => "Toggle playback".to_string(),
            Command::SetBpm(bpm) => format!("Set BPM to {:.0}", bpm),
            Command::ToggleStep { row, step } => {
                format!("Toggle row {} step {}", row, step + 1)
            }
            Command::ClearPattern => "Clear pattern".to_string(),
            Command::Randomize => "Randomize pattern and slicers".to_string(),
            Command::SetSliceStart { slicer, percent } => {
                format!("Slicer {} start {:.0}%", slicer + 1, percent)
            }
            Command::SetSliceDuration { slicer, ms } => {
                format!("Slicer {} duration {:.0}ms", slicer + 1, ms)
            }
            Command::LoadSample(asset) => format!("Load sample '{}'", asset.name()),
        }
    }
}
