use std::path::Path;

use anyhow::{bail, Context, Result};

/// Buckets in the min/max peak overview used by the waveform strip
pub const PEAK_BUCKETS: usize = 128;

/// The loaded sample: mono f32 frames at the engine rate.
///
/// Immutable once built; a new load replaces the whole asset. While no
/// asset is loaded every playback trigger is silently dropped.
#[derive(Clone, Debug)]
pub struct SampleAsset {
    data: Vec<f32>,
    sample_rate: f32,
    name: String,
    peaks: Vec<(f32, f32)>,
}

impl SampleAsset {
    pub fn from_frames(data: Vec<f32>, sample_rate: f32, name: &str) -> Self {
        let peaks = compute_peaks(&data, PEAK_BUCKETS);
        Self {
            data,
            sample_rate,
            name: name.to_string(),
            peaks,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.data.len()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.data.len() as f64 / self.sample_rate as f64
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frame at `index`, 0.0 past the end
    pub fn sample_at(&self, index: usize) -> f32 {
        self.data.get(index).copied().unwrap_or(0.0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Min/max amplitude per bucket, for drawing the overview
    pub fn peaks(&self) -> &[(f32, f32)] {
        &self.peaks
    }
}

fn compute_peaks(data: &[f32], buckets: usize) -> Vec<(f32, f32)> {
    if data.is_empty() {
        return Vec::new();
    }
    let bucket_len = data.len().div_ceil(buckets).max(1);
    data.chunks(bucket_len)
        .map(|chunk| {
            let mut min = f32::MAX;
            let mut max = f32::MIN;
            for &s in chunk {
                min = min.min(s);
                max = max.max(s);
            }
            (min, max)
        })
        .collect()
}

/// Fallback sample used when no file is given on the command line
const DEFAULT_SAMPLE_WAV: &[u8] = include_bytes!("../assets/default.wav");

/// Decode a WAV file into a SampleAsset at the target rate: int or float
/// samples, mono mixdown, linear resample.
pub fn load_wav(path: &Path, target_sr: f32) -> Result<SampleAsset> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    decode_wav(reader, target_sr, &name)
}

/// Decode the bundled default sample
pub fn default_sample(target_sr: f32) -> Result<SampleAsset> {
    let reader = hound::WavReader::new(std::io::Cursor::new(DEFAULT_SAMPLE_WAV))
        .context("Bundled sample is not a valid WAV")?;
    decode_wav(reader, target_sr, "default.wav")
}

fn decode_wav<R: std::io::Read>(
    reader: hound::WavReader<R>,
    target_sr: f32,
    name: &str,
) -> Result<SampleAsset> {
    let spec = reader.spec();
    let channels = spec.channels as usize;
    let wav_sr = spec.sample_rate as f32;

    // A sample that fails to read mid-file is a decode error, not a
    // silently shortened asset
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1u32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()
        }
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect(),
    }
    .with_context(|| format!("Corrupt sample data in {}", name))?;

    if samples.is_empty() {
        bail!("WAV file is empty: {}", name);
    }

    // Mix down to mono (average channels)
    let mono: Vec<f32> = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    // Resample if needed (linear interpolation)
    let frames = if (wav_sr - target_sr).abs() > 1.0 {
        let ratio = wav_sr as f64 / target_sr as f64;
        let new_len = (mono.len() as f64 / ratio) as usize;
        let mut resampled = Vec::with_capacity(new_len);
        for i in 0..new_len {
            let pos = i as f64 * ratio;
            let idx = pos as usize;
            let frac = (pos - idx as f64) as f32;
            let s0 = mono.get(idx).copied().unwrap_or(0.0);
            let s1 = mono.get(idx + 1).copied().unwrap_or(s0);
            resampled.push(s0 + (s1 - s0) * frac);
        }
        resampled
    } else {
        mono
    };

    Ok(SampleAsset::from_frames(frames, target_sr, name))
}
